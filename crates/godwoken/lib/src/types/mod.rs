use alloy_primitives::{Bytes, B256};

mod script;
pub use script::*;

mod meta_contract;
pub use meta_contract::*;

mod transaction;
pub use transaction::*;

mod withdrawal;
pub use withdrawal::*;

mod fee_config;
pub use fee_config::*;

pub type L2TransactionHash = B256;

/// A signed payload submitted to the node as canonical molecule bytes.
pub trait RollupTx {
    fn tx_bytes(&self) -> &Bytes;

    fn into_tx_bytes(self) -> Bytes;

    /// Hash the node reports for the payload, which covers the unsigned part only.
    fn tx_hash(&self) -> L2TransactionHash;
}
