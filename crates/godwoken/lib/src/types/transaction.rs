use std::sync::OnceLock;

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use super::{L2TransactionHash, MetaContractArgs, RollupTx, META_CONTRACT_ACCOUNT_ID};
use crate::{
    ckb_hash,
    molecule::{
        read_bytes, read_fixed, read_table, read_u32, write_bytes, write_table, MoleculeDecode,
        MoleculeDecodeError, MoleculeEncode,
    },
    L2Signature,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawL2Transaction {
    #[serde(with = "alloy_serde::quantity")]
    pub from_id: u32,
    #[serde(with = "alloy_serde::quantity")]
    pub to_id: u32,
    #[serde(with = "alloy_serde::quantity")]
    pub nonce: u32,
    pub args: Bytes,
}

impl RawL2Transaction {
    /// Builds a call to the meta contract.
    pub fn meta_contract_call(from_id: u32, nonce: u32, args: &MetaContractArgs) -> Self {
        Self {
            from_id,
            to_id: META_CONTRACT_ACCOUNT_ID,
            nonce,
            args: args.molecule_bytes(),
        }
    }

    pub fn hash(&self) -> L2TransactionHash {
        ckb_hash(self.molecule_bytes())
    }
}

impl MoleculeEncode for RawL2Transaction {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        let mut args = Vec::with_capacity(4 + self.args.len());
        write_bytes(&mut args, &self.args);
        write_table(
            out,
            &[
                &self.from_id.to_le_bytes()[..],
                &self.to_id.to_le_bytes()[..],
                &self.nonce.to_le_bytes()[..],
                &args[..],
            ],
        );
    }
}

impl MoleculeDecode for RawL2Transaction {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        let fields = read_table("RawL2Transaction", bytes, 4)?;
        Ok(Self {
            from_id: read_u32("RawL2Transaction.from_id", fields[0])?,
            to_id: read_u32("RawL2Transaction.to_id", fields[1])?,
            nonce: read_u32("RawL2Transaction.nonce", fields[2])?,
            args: Bytes::copy_from_slice(read_bytes("RawL2Transaction.args", fields[3])?),
        })
    }
}

/// A signed layer 2 transaction. Immutable once built: a different nonce or payload needs a new
/// signature and therefore a new value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct L2Transaction {
    raw: RawL2Transaction,
    signature: L2Signature,

    #[serde(skip)]
    tx_bytes: OnceLock<Bytes>,
    #[serde(skip)]
    tx_hash: OnceLock<L2TransactionHash>,
}

impl L2Transaction {
    pub fn new(raw: RawL2Transaction, signature: L2Signature) -> Self {
        Self {
            raw,
            signature,
            tx_bytes: OnceLock::new(),
            tx_hash: OnceLock::new(),
        }
    }

    pub fn raw(&self) -> &RawL2Transaction {
        &self.raw
    }

    pub fn signature(&self) -> &L2Signature {
        &self.signature
    }
}

impl PartialEq for L2Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.signature == other.signature
    }
}

impl Eq for L2Transaction {}

impl MoleculeEncode for L2Transaction {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        let raw = self.raw.molecule_bytes();
        write_table(out, &[&raw[..], self.signature.as_slice()]);
    }
}

impl MoleculeDecode for L2Transaction {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        let fields = read_table("L2Transaction", bytes, 2)?;
        let raw = RawL2Transaction::decode_molecule(fields[0])?;
        let signature = read_fixed::<65>("L2Transaction.signature", fields[1])?;
        Ok(Self::new(raw, signature.into()))
    }
}

impl RollupTx for L2Transaction {
    fn tx_bytes(&self) -> &Bytes {
        self.tx_bytes.get_or_init(|| self.molecule_bytes())
    }

    fn into_tx_bytes(self) -> Bytes {
        let _ = self.tx_bytes(); // initializes self.tx_bytes
        self.tx_bytes.into_inner().unwrap_or_default()
    }

    fn tx_hash(&self) -> L2TransactionHash {
        *self.tx_hash.get_or_init(|| self.raw.hash())
    }
}

/// Settlement status reported by the node. Ordered by progress: a transaction only moves from
/// `Pending` to `Committed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Committed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2TransactionWithStatus {
    pub transaction: L2Transaction,
    pub status: TransactionStatus,
}
