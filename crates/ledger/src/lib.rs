#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod ledger;
pub use ledger::OutputLedger;

mod view;
pub use view::FinalityView;

mod reads;

mod errors;
pub use errors::{LedgerError, LedgerResult, OutputLookup};
