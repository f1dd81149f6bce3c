//! Salted digest transform

use crate::anonymization::config::HashAlgorithm;
use blake2::{Blake2b512, Blake2s256};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// Replaces each value with `hex(digest(value + salt))`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTransform {
    algorithm: HashAlgorithm,
    salt: String,
}

impl HashTransform {
    pub fn new(algorithm: HashAlgorithm, salt: impl Into<String>) -> Self {
        Self {
            algorithm,
            salt: salt.into(),
        }
    }

    /// Lowercase hex digest of the value with the salt appended
    pub fn hash_str(&self, value: &str) -> String {
        let mut input = String::with_capacity(value.len() + self.salt.len());
        input.push_str(value);
        input.push_str(&self.salt);

        let bytes = input.as_bytes();
        match self.algorithm {
            HashAlgorithm::Md5 => hex_digest::<Md5>(bytes),
            HashAlgorithm::Sha1 => hex_digest::<Sha1>(bytes),
            HashAlgorithm::Sha224 => hex_digest::<Sha224>(bytes),
            HashAlgorithm::Sha256 => hex_digest::<Sha256>(bytes),
            HashAlgorithm::Sha384 => hex_digest::<Sha384>(bytes),
            HashAlgorithm::Sha512 => hex_digest::<Sha512>(bytes),
            HashAlgorithm::Sha512_224 => hex_digest::<Sha512_224>(bytes),
            HashAlgorithm::Sha512_256 => hex_digest::<Sha512_256>(bytes),
            HashAlgorithm::Sha3_224 => hex_digest::<Sha3_224>(bytes),
            HashAlgorithm::Sha3_256 => hex_digest::<Sha3_256>(bytes),
            HashAlgorithm::Sha3_384 => hex_digest::<Sha3_384>(bytes),
            HashAlgorithm::Sha3_512 => hex_digest::<Sha3_512>(bytes),
            HashAlgorithm::Blake2b => hex_digest::<Blake2b512>(bytes),
            HashAlgorithm::Blake2s => hex_digest::<Blake2s256>(bytes),
        }
    }
}

fn hex_digest<D: Digest>(bytes: &[u8]) -> String {
    hex::encode(D::digest(bytes))
}
