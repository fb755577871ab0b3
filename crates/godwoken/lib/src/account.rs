use alloy_primitives::{Address, Bytes, FixedBytes, B256};
use serde::{Deserialize, Serialize};

use crate::types::{HashType, Script};

/// First 20 bytes of an account script hash, used to address balances.
pub type ShortAddress = FixedBytes<20>;

pub fn short_address(script_hash: &B256) -> ShortAddress {
    ShortAddress::from_slice(&script_hash[..20])
}

/// Layer 2 lock script of an Ethereum account: the eth account lock, with the rollup type hash
/// and the eth address as args.
pub fn eth_account_script(
    eth_account_lock_hash: &B256,
    rollup_type_hash: &B256,
    eth_address: &Address,
) -> Script {
    let mut args = Vec::with_capacity(32 + 20);
    args.extend_from_slice(rollup_type_hash.as_slice());
    args.extend_from_slice(eth_address.as_slice());
    Script::new(*eth_account_lock_hash, HashType::Type, Bytes::from(args))
}

/// How an account is addressed on layer 2. The numeric account id is assigned by the node once
/// the account exists and is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub script_hash: B256,
    pub short_address: ShortAddress,
}

impl AccountIdentity {
    pub fn from_script_hash(script_hash: B256) -> Self {
        Self {
            script_hash,
            short_address: short_address(&script_hash),
        }
    }

    pub fn from_script(script: &Script) -> Self {
        Self::from_script_hash(script.hash())
    }

    /// Identity of the layer 2 account controlled by `eth_address`.
    pub fn for_eth_address(
        eth_account_lock_hash: &B256,
        rollup_type_hash: &B256,
        eth_address: &Address,
    ) -> Self {
        Self::from_script(&eth_account_script(
            eth_account_lock_hash,
            rollup_type_hash,
            eth_address,
        ))
    }
}
