#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod block;
pub use block::{compute_block_hash, Block, BlockProposal, BlockStatus};

mod output;
pub use output::{compute_output_root, OutputRecord, OUTPUT_ROOT_VERSION};

mod genesis;
pub use genesis::GenesisAnchor;

mod ids;
pub use ids::{ClaimId, GameId, OutputIndex, Party};

mod constants;
pub use constants::{
    BPS_DENOMINATOR, DEFAULT_CASCADE_BATCH_SIZE, DEFAULT_CHALLENGE_PERIOD, DEFAULT_ROUND_TIMEOUT,
    MIN_CHALLENGE_PERIOD,
};

mod config;
pub use config::{ProtocolConfig, StakeSplit};

mod game;
pub use game::{Half, Resolution, Verdict};

mod events;
pub use events::ProtocolEvent;

mod errors;
pub use errors::{ConfigError, ConfigResult};
