//! Fixed vectors shared by the unit tests of this crate and of the client crate.

use alloy_primitives::{Address, B256};
use hex_literal::hex;

use crate::{
    eth_account_script,
    types::{CreateAccount, Fee, MetaContractArgs, RawL2Transaction, RawWithdrawalRequest},
    L2Signature, L2Signer,
};

pub const ROLLUP_TYPE_HASH: B256 = B256::new(hex!(
    "40d73f0d3c561fcaae330eabc030d8d96a9d0af36d0c5114883658a350cb9e3b"
));
pub const ETH_ACCOUNT_LOCK_HASH: B256 = B256::new(hex!(
    "deec13a7b8e100579541384ccaf4b5223733e4a5483c3aec95ddc4c1d5ea5b22"
));

pub const TEST_PRIVATE_KEY: B256 = B256::new(hex!(
    "dd50cac37ec6dd12539a968c1a2cbedda75bd8724f7bcad486548eaabb87fc8b"
));
/// Script hash of the account controlled by [`TEST_PRIVATE_KEY`].
pub const SENDER_SCRIPT_HASH: B256 = B256::new(hex!(
    "2bffabe47521e4a567ce2a3e0916a5d88f6ecb71a291be88f86865213f7e55fc"
));
pub const SENDER_ACCOUNT_ID: u32 = 3;

pub const META_CONTRACT_SCRIPT_HASH: B256 = B256::new(hex!(
    "e241d2d7dd681601fb2c53b9299a94930995d3d0e4e7042ce0ee6a65819e16f3"
));

pub const TARGET_ETH_ADDRESS: Address =
    Address::new(hex!("a9b2e1a8b4e6b2cf3b9e4f5c1e0d62b3a4c5d6e7"));
pub const TARGET_SCRIPT_HASH: B256 = B256::new(hex!(
    "a91165a33f95b723dc2b3a7328e2578fef1deddc34b03d14c7ab43d150c3e049"
));

pub const CREATE_ACCOUNT_FEE: Fee = Fee {
    sudt_id: 1,
    amount: 0x91d,
};

/// Signing message of [`create_account_raw_tx`] sent by [`SENDER_SCRIPT_HASH`] to the meta
/// contract.
pub const CREATE_ACCOUNT_MESSAGE: B256 = B256::new(hex!(
    "652f67f2ba9ae750a971f8a5433e2c3e3ec30d282035b3ed63dea45724b7a9cf"
));
pub const CREATE_ACCOUNT_SIGNATURE: L2Signature = L2Signature::new(hex!(
    "47b0a89a8ba7f496765d8ad997103d6405309e2633e56fef9c51343aca3f81fe"
    "61430bd9138d4b0c44ea7043237eb63aff17f4b0435cc3a8a6feb91eab3ead80"
    "01"
));

pub const OWNER_LOCK_HASH: B256 = B256::new(hex!(
    "81bedb9018087a04dda3b4e756145ac1102fbe7616fe6812fe615cb0319718dc"
));
pub const WITHDRAWAL_MESSAGE: B256 = B256::new(hex!(
    "3c95fe5dc3653fb53c6754fa88c1a24e2ff5edad1607204469891d72fa94c743"
));
pub const WITHDRAWAL_SIGNATURE: L2Signature = L2Signature::new(hex!(
    "f9363a54009b4e81740916bf5b8a1801c41a904ffe24bb6557ef50b42f95cfd0"
    "67299483d7b10f581c3406b1e9b3f7e0fa33a58525a11c837ef95e2c41fe5bae"
    "00"
));

pub fn test_signer() -> L2Signer {
    L2Signer::from_bytes(&TEST_PRIVATE_KEY).expect("test key is valid")
}

/// Creates the account of [`TARGET_ETH_ADDRESS`] from account 3 at nonce 0.
pub fn create_account_raw_tx() -> RawL2Transaction {
    let args = MetaContractArgs::CreateAccount(CreateAccount {
        script: eth_account_script(&ETH_ACCOUNT_LOCK_HASH, &ROLLUP_TYPE_HASH, &TARGET_ETH_ADDRESS),
        fee: CREATE_ACCOUNT_FEE,
    });
    RawL2Transaction::meta_contract_call(SENDER_ACCOUNT_ID, 0, &args)
}

/// Withdraws 400 CKB from the test account to [`OWNER_LOCK_HASH`].
pub fn withdrawal_raw_request() -> RawWithdrawalRequest {
    RawWithdrawalRequest::builder()
        .nonce(1)
        .capacity(40_000_000_000)
        .account_script_hash(SENDER_SCRIPT_HASH)
        .owner_lock_hash(OWNER_LOCK_HASH)
        .fee(Fee::new(1, 0))
        .build()
        .expect("withdrawal request is complete")
}
