use std::sync::OnceLock;

use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

use super::{Fee, L2TransactionHash, RollupTx};
use crate::{
    ckb_hash,
    molecule::{
        read_fixed, read_u128, read_u32, read_u64, MoleculeDecode, MoleculeDecodeError,
        MoleculeEncode,
    },
    L2Signature,
};

const RAW_WITHDRAWAL_REQUEST_SIZE: usize = 4 + 8 + 16 + 32 + 32 + 16 + 8 + 32 + 32 + 20;
const WITHDRAWAL_REQUEST_SIZE: usize = RAW_WITHDRAWAL_REQUEST_SIZE + 65;

/// Unsigned withdrawal of CKB and optionally a sudt from a layer 2 account back to layer 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWithdrawalRequest {
    #[serde(with = "alloy_serde::quantity")]
    pub nonce: u32,
    /// CKB amount
    #[serde(with = "alloy_serde::quantity")]
    pub capacity: u64,
    /// SUDT amount
    #[serde(with = "alloy_serde::quantity")]
    pub amount: u128,
    pub sudt_script_hash: B256,
    /// layer 2 account script hash
    pub account_script_hash: B256,
    /// A buyer can pay `sell_amount` and `sell_capacity` to unlock the withdrawal.
    #[serde(with = "alloy_serde::quantity")]
    pub sell_amount: u128,
    #[serde(with = "alloy_serde::quantity")]
    pub sell_capacity: u64,
    /// layer 1 lock to withdraw to after the challenge period
    pub owner_lock_hash: B256,
    /// layer 1 lock receiving the payment, must exist on chain
    pub payment_lock_hash: B256,
    pub fee: Fee,
}

impl RawWithdrawalRequest {
    pub fn builder() -> RawWithdrawalRequestBuilder {
        RawWithdrawalRequestBuilder::default()
    }

    pub fn hash(&self) -> L2TransactionHash {
        ckb_hash(self.molecule_bytes())
    }
}

impl MoleculeEncode for RawWithdrawalRequest {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        out.reserve(RAW_WITHDRAWAL_REQUEST_SIZE);
        out.extend_from_slice(&self.nonce.to_le_bytes());
        out.extend_from_slice(&self.capacity.to_le_bytes());
        out.extend_from_slice(&self.amount.to_le_bytes());
        out.extend_from_slice(self.sudt_script_hash.as_slice());
        out.extend_from_slice(self.account_script_hash.as_slice());
        out.extend_from_slice(&self.sell_amount.to_le_bytes());
        out.extend_from_slice(&self.sell_capacity.to_le_bytes());
        out.extend_from_slice(self.owner_lock_hash.as_slice());
        out.extend_from_slice(self.payment_lock_hash.as_slice());
        self.fee.encode_molecule(out);
    }
}

impl MoleculeDecode for RawWithdrawalRequest {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        let bytes = read_fixed::<RAW_WITHDRAWAL_REQUEST_SIZE>("RawWithdrawalRequest", bytes)?;
        let mut rest = &bytes[..];
        let mut next = |len: usize| take(&mut rest, len);

        Ok(Self {
            nonce: read_u32("RawWithdrawalRequest.nonce", next(4))?,
            capacity: read_u64("RawWithdrawalRequest.capacity", next(8))?,
            amount: read_u128("RawWithdrawalRequest.amount", next(16))?,
            sudt_script_hash: B256::from_slice(next(32)),
            account_script_hash: B256::from_slice(next(32)),
            sell_amount: read_u128("RawWithdrawalRequest.sell_amount", next(16))?,
            sell_capacity: read_u64("RawWithdrawalRequest.sell_capacity", next(8))?,
            owner_lock_hash: B256::from_slice(next(32)),
            payment_lock_hash: B256::from_slice(next(32)),
            fee: Fee::decode_molecule(next(20))?,
        })
    }
}

fn take<'a>(bytes: &mut &'a [u8], len: usize) -> &'a [u8] {
    let (head, tail) = bytes.split_at(len);
    *bytes = tail;
    head
}

#[derive(thiserror::Error, Debug)]
#[error("withdrawal request builder error: {msg}")]
pub struct RawWithdrawalRequestBuilderError {
    pub msg: &'static str,
}

impl RawWithdrawalRequestBuilderError {
    fn new(msg: &'static str) -> Self {
        Self { msg }
    }
}

#[derive(Debug, Default)]
pub struct RawWithdrawalRequestBuilder {
    nonce: Option<u32>,
    capacity: Option<u64>,
    amount: u128,
    sudt_script_hash: B256,
    account_script_hash: Option<B256>,
    sell_amount: u128,
    sell_capacity: u64,
    owner_lock_hash: Option<B256>,
    payment_lock_hash: B256,
    fee: Fee,
}

impl RawWithdrawalRequestBuilder {
    pub fn nonce(mut self, nonce: u32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Withdraws `amount` of the sudt identified by `sudt_script_hash` along with the capacity.
    pub fn sudt(mut self, sudt_script_hash: B256, amount: u128) -> Self {
        self.sudt_script_hash = sudt_script_hash;
        self.amount = amount;
        self
    }

    pub fn account_script_hash(mut self, account_script_hash: B256) -> Self {
        self.account_script_hash = Some(account_script_hash);
        self
    }

    /// Offers the withdrawal for sale, payable to `payment_lock_hash` on layer 1.
    pub fn sell(mut self, sell_capacity: u64, sell_amount: u128, payment_lock_hash: B256) -> Self {
        self.sell_capacity = sell_capacity;
        self.sell_amount = sell_amount;
        self.payment_lock_hash = payment_lock_hash;
        self
    }

    pub fn owner_lock_hash(mut self, owner_lock_hash: B256) -> Self {
        self.owner_lock_hash = Some(owner_lock_hash);
        self
    }

    pub fn fee(mut self, fee: Fee) -> Self {
        self.fee = fee;
        self
    }

    pub fn build(self) -> Result<RawWithdrawalRequest, RawWithdrawalRequestBuilderError> {
        let nonce = self
            .nonce
            .ok_or(RawWithdrawalRequestBuilderError::new("nonce is required"))?;
        let capacity = self
            .capacity
            .ok_or(RawWithdrawalRequestBuilderError::new("capacity is required"))?;
        let account_script_hash = self.account_script_hash.ok_or(
            RawWithdrawalRequestBuilderError::new("account_script_hash is required"),
        )?;
        let owner_lock_hash = self.owner_lock_hash.ok_or(
            RawWithdrawalRequestBuilderError::new("owner_lock_hash is required"),
        )?;

        if self.amount > 0 && self.sudt_script_hash.is_zero() {
            return Err(RawWithdrawalRequestBuilderError::new(
                "sudt amount requires a sudt script hash",
            ));
        }
        let is_for_sale = self.sell_amount > 0 || self.sell_capacity > 0;
        if is_for_sale && self.payment_lock_hash.is_zero() {
            return Err(RawWithdrawalRequestBuilderError::new(
                "sale terms require a payment lock hash",
            ));
        }

        Ok(RawWithdrawalRequest {
            nonce,
            capacity,
            amount: self.amount,
            sudt_script_hash: self.sudt_script_hash,
            account_script_hash,
            sell_amount: self.sell_amount,
            sell_capacity: self.sell_capacity,
            owner_lock_hash,
            payment_lock_hash: self.payment_lock_hash,
            fee: self.fee,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    raw: RawWithdrawalRequest,
    signature: L2Signature,

    #[serde(skip)]
    tx_bytes: OnceLock<Bytes>,
}

impl WithdrawalRequest {
    pub fn new(raw: RawWithdrawalRequest, signature: L2Signature) -> Self {
        Self {
            raw,
            signature,
            tx_bytes: OnceLock::new(),
        }
    }

    pub fn raw(&self) -> &RawWithdrawalRequest {
        &self.raw
    }

    pub fn signature(&self) -> &L2Signature {
        &self.signature
    }
}

impl PartialEq for WithdrawalRequest {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.signature == other.signature
    }
}

impl Eq for WithdrawalRequest {}

impl MoleculeEncode for WithdrawalRequest {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        self.raw.encode_molecule(out);
        out.extend_from_slice(self.signature.as_slice());
    }
}

impl MoleculeDecode for WithdrawalRequest {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        let bytes = read_fixed::<WITHDRAWAL_REQUEST_SIZE>("WithdrawalRequest", bytes)?;
        let (raw, signature) = bytes.split_at(RAW_WITHDRAWAL_REQUEST_SIZE);
        Ok(Self::new(
            RawWithdrawalRequest::decode_molecule(raw)?,
            read_fixed::<65>("WithdrawalRequest.signature", signature)?.into(),
        ))
    }
}

impl RollupTx for WithdrawalRequest {
    fn tx_bytes(&self) -> &Bytes {
        self.tx_bytes.get_or_init(|| self.molecule_bytes())
    }

    fn into_tx_bytes(self) -> Bytes {
        let _ = self.tx_bytes(); // initializes self.tx_bytes
        self.tx_bytes.into_inner().unwrap_or_default()
    }

    fn tx_hash(&self) -> L2TransactionHash {
        self.raw.hash()
    }
}
