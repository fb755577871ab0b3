use thiserror::Error;

/// Malformed input handed to the library: key material, signatures or structured values that
/// cannot be used as given. These are never retried, the caller must fix the input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("invalid signature recovery id {0}, expected 0 or 1")]
    InvalidRecoveryId(u8),
    #[error("signature recovery failed: {0}")]
    SignatureRecoveryFailed(String),
    #[error("signing failed: {0}")]
    SigningFailed(#[from] alloy_signer::Error),
    #[error(transparent)]
    InvalidWithdrawal(#[from] crate::types::RawWithdrawalRequestBuilderError),
    #[error("molecule decode failed: {0}")]
    Decode(#[from] crate::molecule::MoleculeDecodeError),
}
