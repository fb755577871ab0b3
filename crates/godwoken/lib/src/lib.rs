mod logging;
pub use logging::*;

pub mod error;

mod hash;
pub use hash::*;

/// Canonical molecule encoding of the rollup's data structures.
pub mod molecule;

pub mod types;

mod message;
pub use message::*;

mod signer;
pub use signer::*;

mod account;
pub use account::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
