use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::{
    ckb_hash,
    molecule::{
        read_bytes, read_fixed, read_table, write_bytes, write_table, MoleculeDecode,
        MoleculeDecodeError, MoleculeEncode,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum HashType {
    Data = 0,
    Type = 1,
    Data1 = 2,
}

impl TryFrom<u8> for HashType {
    type Error = MoleculeDecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HashType::Data),
            1 => Ok(HashType::Type),
            2 => Ok(HashType::Data1),
            other => Err(MoleculeDecodeError::UnknownHashType(other)),
        }
    }
}

/// A CKB script. On layer 2 the hash of an account's lock script is the account's address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script {
    pub code_hash: B256,
    pub hash_type: HashType,
    pub args: Bytes,
}

impl Script {
    pub fn new(code_hash: B256, hash_type: HashType, args: Bytes) -> Self {
        Self {
            code_hash,
            hash_type,
            args,
        }
    }

    pub fn hash(&self) -> B256 {
        ckb_hash(self.molecule_bytes())
    }
}

impl MoleculeEncode for Script {
    fn encode_molecule(&self, out: &mut Vec<u8>) {
        let mut args = Vec::with_capacity(4 + self.args.len());
        write_bytes(&mut args, &self.args);
        write_table(
            out,
            &[
                self.code_hash.as_slice(),
                &[self.hash_type as u8][..],
                &args[..],
            ],
        );
    }
}

impl MoleculeDecode for Script {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError> {
        let fields = read_table("Script", bytes, 3)?;
        let code_hash = read_fixed::<32>("Script.code_hash", fields[0])?;
        let [hash_type] = read_fixed::<1>("Script.hash_type", fields[1])?;
        let args = read_bytes("Script.args", fields[2])?;
        Ok(Self {
            code_hash: code_hash.into(),
            hash_type: HashType::try_from(hash_type)?,
            args: Bytes::copy_from_slice(args),
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, Bytes};
    use hex_literal::hex;

    use super::*;
    use crate::test_utils::{ETH_ACCOUNT_LOCK_HASH, ROLLUP_TYPE_HASH};

    fn target_script() -> Script {
        let eth_address = Address::new(hex!("a9b2e1a8b4e6b2cf3b9e4f5c1e0d62b3a4c5d6e7"));
        Script::new(
            ETH_ACCOUNT_LOCK_HASH,
            HashType::Type,
            Bytes::from([ROLLUP_TYPE_HASH.as_slice(), eth_address.as_slice()].concat()),
        )
    }

    #[test]
    fn test_script_molecule_and_hash() -> eyre::Result<()> {
        let script = target_script();
        let encoded = script.molecule_bytes();
        assert_eq!(
            &encoded[..],
            hex!(
                "69000000100000003000000031000000"
                "deec13a7b8e100579541384ccaf4b5223733e4a5483c3aec95ddc4c1d5ea5b22"
                "01"
                "34000000"
                "40d73f0d3c561fcaae330eabc030d8d96a9d0af36d0c5114883658a350cb9e3b"
                "a9b2e1a8b4e6b2cf3b9e4f5c1e0d62b3a4c5d6e7"
            )
        );
        assert_eq!(
            script.hash(),
            B256::new(hex!(
                "a91165a33f95b723dc2b3a7328e2578fef1deddc34b03d14c7ab43d150c3e049"
            ))
        );
        assert_eq!(Script::decode_molecule(&encoded)?, script);
        Ok(())
    }

    #[test]
    fn test_unknown_hash_type_is_rejected() {
        let mut encoded = target_script().molecule_bytes().to_vec();
        // hash_type sits right after the 16 byte header and the 32 byte code hash
        encoded[48] = 7;
        assert_eq!(
            Script::decode_molecule(&encoded),
            Err(MoleculeDecodeError::UnknownHashType(7))
        );
    }

    #[test]
    fn test_hash_type_json() -> eyre::Result<()> {
        assert_eq!(serde_json::to_string(&HashType::Data1)?, "\"data1\"");
        assert_eq!(
            serde_json::from_str::<HashType>("\"type\"")?,
            HashType::Type
        );
        Ok(())
    }
}
