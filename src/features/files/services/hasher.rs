use sha2::{Digest, Sha256};

/// Chunk size for feeding buffered payloads through the streaming path
const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Incremental SHA-256 content fingerprinter. Identical byte sequences
/// always produce identical digests regardless of how the input is split
/// across `update` calls.
#[derive(Default)]
pub struct ContentHasher {
    inner: Sha256,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    /// Consume the hasher and render the digest as lowercase hex.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.inner.finalize())
    }

    /// One-shot digest of an in-memory payload, fed through the streaming
    /// path in fixed-size chunks. The caller keeps ownership of the bytes,
    /// so they stay re-readable for the physical write.
    pub fn digest_hex(data: &[u8]) -> String {
        let mut hasher = Self::new();
        for chunk in data.chunks(HASH_CHUNK_SIZE) {
            hasher.update(chunk);
        }
        hasher.finalize_hex()
    }
}
