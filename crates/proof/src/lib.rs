#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod merkle;
pub use merkle::{transactions_root, tree_depth, MerkleProof};

mod traits;
pub use traits::ReexecutionOracle;

mod claim;
pub use claim::{ChallengerWinReason, ClaimOutcome, FraudProofClaim, OneStepProof};

mod verifier;
pub use verifier::FraudProofVerifier;

mod errors;
pub use errors::{ProofError, ProofResult};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
