#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod coordinator;
pub use coordinator::{Coordinator, EVENT_CHANNEL_CAPACITY};

mod lifecycle;
pub use lifecycle::Transition;

mod cascade;
pub use cascade::CascadeCursor;

mod scheduler;
pub use scheduler::TickReport;

mod admin;
pub use admin::PauseState;

mod records;

mod config;
pub use config::load_config;

mod errors;
pub use errors::{CoordinatorError, CoordinatorResult, ErrorKind};
