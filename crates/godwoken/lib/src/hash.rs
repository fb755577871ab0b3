use alloy_primitives::{keccak256, B256};

/// Personalization of the blake2b-256 hasher used across CKB and Godwoken.
pub const CKB_HASH_PERSONALIZATION: &[u8] = b"ckb-default-hash";

/// Envelope prepended to a 32 byte digest before it is handed to an Ethereum wallet.
pub const ETH_PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Incremental blake2b-256 hasher with the CKB personalization.
pub struct CkbHasher {
    state: blake2b_simd::State,
}

impl CkbHasher {
    pub fn new() -> Self {
        let state = blake2b_simd::Params::new()
            .hash_length(32)
            .personal(CKB_HASH_PERSONALIZATION)
            .to_state();
        Self { state }
    }

    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.state.update(data.as_ref());
        self
    }

    pub fn finalize(&self) -> B256 {
        B256::from_slice(self.state.finalize().as_bytes())
    }
}

impl Default for CkbHasher {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ckb_hash(data: impl AsRef<[u8]>) -> B256 {
    CkbHasher::new().update(data).finalize()
}

/// Wraps a raw digest in the Ethereum personal message envelope and hashes it with keccak256.
///
/// The envelope covers the 32 raw bytes of `digest`, not their hex text.
pub fn eth_personal_message_hash(digest: &B256) -> B256 {
    let mut buf = Vec::with_capacity(ETH_PERSONAL_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(ETH_PERSONAL_MESSAGE_PREFIX);
    buf.extend_from_slice(digest.as_slice());
    keccak256(buf)
}
