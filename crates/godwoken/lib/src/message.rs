use std::fmt;

use alloy_primitives::B256;
use serde::Serialize;

use crate::{
    eth_personal_message_hash,
    molecule::MoleculeEncode,
    types::{RawL2Transaction, RawWithdrawalRequest},
    CkbHasher,
};

/// Final digest handed to the signer.
///
/// It can only be built by wrapping a rollup digest in the Ethereum personal message envelope, so
/// a bare rollup digest can never be signed by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SigningMessage(B256);

impl SigningMessage {
    pub fn from_rollup_digest(rollup_digest: &B256) -> Self {
        Self(eth_personal_message_hash(rollup_digest))
    }

    pub fn as_b256(&self) -> &B256 {
        &self.0
    }

    pub fn into_inner(self) -> B256 {
        self.0
    }
}

impl fmt::Display for SigningMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// First stage digest of a layer 2 transaction: the rollup type hash, the sender and receiver
/// script hashes and the molecule encoded raw transaction, hashed with the CKB hasher.
pub fn transaction_rollup_digest(
    raw: &RawL2Transaction,
    sender_script_hash: &B256,
    receiver_script_hash: &B256,
    rollup_type_hash: &B256,
) -> B256 {
    CkbHasher::new()
        .update(rollup_type_hash)
        .update(sender_script_hash)
        .update(receiver_script_hash)
        .update(raw.molecule_bytes())
        .finalize()
}

pub fn generate_transaction_message(
    raw: &RawL2Transaction,
    sender_script_hash: &B256,
    receiver_script_hash: &B256,
    rollup_type_hash: &B256,
) -> SigningMessage {
    let digest = transaction_rollup_digest(
        raw,
        sender_script_hash,
        receiver_script_hash,
        rollup_type_hash,
    );
    SigningMessage::from_rollup_digest(&digest)
}

pub fn withdrawal_rollup_digest(raw: &RawWithdrawalRequest, rollup_type_hash: &B256) -> B256 {
    CkbHasher::new()
        .update(rollup_type_hash)
        .update(raw.molecule_bytes())
        .finalize()
}

pub fn generate_withdrawal_message(
    raw: &RawWithdrawalRequest,
    rollup_type_hash: &B256,
) -> SigningMessage {
    SigningMessage::from_rollup_digest(&withdrawal_rollup_digest(raw, rollup_type_hash))
}
