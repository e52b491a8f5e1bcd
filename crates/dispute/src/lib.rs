#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod game;
pub use game::{max_rounds, DisputeGame, GameParams, GamePhase, OneStepTarget, RoundRecord};

mod stakes;
pub use stakes::{settle, Payout, Stakes};

mod errors;
pub use errors::{DisputeError, DisputeResult};

pub use verdict_primitives::{Half, Resolution, Verdict};
