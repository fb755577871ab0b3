use serde::{Deserialize, Serialize};

use super::Script;
use crate::molecule::{
    read_fixed, read_table, read_u128, read_u32, read_union, write_table, write_u32,
    MoleculeDecode, MoleculeDecodeError, MoleculeEncode,
};

/// Account id of the meta contract, which handles account management calls.
pub const META_CONTRACT_ACCOUNT_ID: u32 = 0;

const FEE_SIZE: usize = 4 + 16;

/// Fee paid to the block producer, denominated in the given sudt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fee {
    #[serde(with = "alloy_serde::quantity")]
    pub sudt_id: u32,
    #[serde(with = "alloy_serde::quantity")]
    pub amount: u128,
}

impl Fee {
    pub fn new(sudt_id: u32, amount: u128) -> Self {
        Self { sudt_id, amount }
    }
}

impl MoleculeEncode for Fee {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        write_u32(out, self.sudt_id);
        out.extend_from_slice(&self.amount.to_le_bytes());
    }
}

impl MoleculeDecode for Fee {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        let bytes = read_fixed::<FEE_SIZE>("Fee", bytes)?;
        Ok(Self {
            sudt_id: read_u32("Fee.sudt_id", &bytes[..4])?,
            amount: read_u128("Fee.amount", &bytes[4..])?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccount {
    pub script: Script,
    pub fee: Fee,
}

impl MoleculeEncode for CreateAccount {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        let script = self.script.molecule_bytes();
        let fee = self.fee.molecule_bytes();
        write_table(out, &[&script[..], &fee[..]]);
    }
}

impl MoleculeDecode for CreateAccount {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        let fields = read_table("CreateAccount", bytes, 2)?;
        Ok(Self {
            script: Script::decode_molecule(fields[0])?,
            fee: Fee::decode_molecule(fields[1])?,
        })
    }
}

/// Call payload of a transaction sent to the meta contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaContractArgs {
    CreateAccount(CreateAccount),
}

impl MetaContractArgs {
    pub fn item_id(&self) -> u32 {
        match self {
            MetaContractArgs::CreateAccount(_) => 0,
        }
    }
}

impl MoleculeEncode for MetaContractArgs {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        write_u32(out, self.item_id());
        match self {
            MetaContractArgs::CreateAccount(create_account) => {
                create_account.encode_molecule(out)
            }
        }
    }
}

impl MoleculeDecode for MetaContractArgs {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        match read_union("MetaContractArgs", bytes)? {
            (0, item) => Ok(MetaContractArgs::CreateAccount(
                CreateAccount::decode_molecule(item)?,
            )),
            (item_id, _) => Err(MoleculeDecodeError::UnknownUnionItem {
                type_name: "MetaContractArgs",
                item_id,
            }),
        }
    }
}
