use std::str::FromStr;

use alloy_primitives::{Address, FixedBytes, PrimitiveSignature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::{
    error::ValidationError,
    generate_transaction_message, generate_withdrawal_message,
    types::{L2Transaction, RawL2Transaction, RawWithdrawalRequest, WithdrawalRequest},
    SigningMessage,
};

/// `r ‖ s ‖ v` where `v` is the raw recovery id (0 or 1), not the Electrum 27/28 form.
pub type L2Signature = FixedBytes<65>;

/// secp256k1 signer for layer 2 payloads. Signatures are RFC 6979 deterministic with a low `s`.
#[derive(Clone, Debug)]
pub struct L2Signer {
    inner: PrivateKeySigner,
}

impl L2Signer {
    pub fn from_bytes(private_key: &B256) -> Result<Self, ValidationError> {
        PrivateKeySigner::from_bytes(private_key)
            .map(|inner| Self { inner })
            .map_err(|err| ValidationError::InvalidPrivateKey(err.to_string()))
    }

    pub fn random() -> Self {
        Self {
            inner: PrivateKeySigner::random(),
        }
    }

    pub fn eth_address(&self) -> Address {
        self.inner.address()
    }

    pub fn sign_message(&self, message: &SigningMessage) -> Result<L2Signature, ValidationError> {
        let signature = self.inner.sign_hash_sync(message.as_b256())?;
        Ok(encode_signature(&signature))
    }

    pub fn sign_transaction(
        &self,
        raw: RawL2Transaction,
        sender_script_hash: &B256,
        receiver_script_hash: &B256,
        rollup_type_hash: &B256,
    ) -> Result<L2Transaction, ValidationError> {
        let message = generate_transaction_message(
            &raw,
            sender_script_hash,
            receiver_script_hash,
            rollup_type_hash,
        );
        let signature = self.sign_message(&message)?;
        Ok(L2Transaction::new(raw, signature))
    }

    pub fn sign_withdrawal(
        &self,
        raw: RawWithdrawalRequest,
        rollup_type_hash: &B256,
    ) -> Result<WithdrawalRequest, ValidationError> {
        let message = generate_withdrawal_message(&raw, rollup_type_hash);
        let signature = self.sign_message(&message)?;
        Ok(WithdrawalRequest::new(raw, signature))
    }
}

impl FromStr for L2Signer {
    type Err = ValidationError;

    /// Parses a hex encoded private key, with or without the `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let private_key = B256::from_str(s.trim())
            .map_err(|err| ValidationError::InvalidPrivateKey(err.to_string()))?;
        Self::from_bytes(&private_key)
    }
}

fn encode_signature(signature: &PrimitiveSignature) -> L2Signature {
    let mut bytes = [0u8; 65];
    bytes[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    bytes[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    bytes[64] = signature.v() as u8;
    bytes.into()
}

pub fn recover_address(
    message: &SigningMessage,
    signature: &L2Signature,
) -> Result<Address, ValidationError> {
    let parity = match signature[64] {
        0 => false,
        1 => true,
        other => return Err(ValidationError::InvalidRecoveryId(other)),
    };
    PrimitiveSignature::from_bytes_and_parity(&signature[..64], parity)
        .recover_address_from_prehash(message.as_b256())
        .map_err(|err| ValidationError::SignatureRecoveryFailed(err.to_string()))
}

pub fn verify_signature(
    message: &SigningMessage,
    signature: &L2Signature,
    signer: Address,
) -> bool {
    recover_address(message, signature).is_ok_and(|recovered| recovered == signer)
}
