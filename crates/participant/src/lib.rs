#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod trace;
pub use trace::ExecutionTrace;
pub(crate) use trace::TracedBlock;

mod action;
pub use action::Action;

mod defender;
pub use defender::Defender;

mod challenger;
pub use challenger::Challenger;

mod errors;
pub use errors::{ParticipantError, ParticipantResult};
