use sha2::{Digest, Sha256};

/// One-way digest of an account PIN, stored in place of the PIN itself.
///
/// Plain unsalted SHA-256 rendered as lowercase hex. Short numeric PINs can be
/// recovered from it by enumeration; it only guarantees that equal digests
/// mean equal PINs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDigest(String);

impl CredentialDigest {
    pub fn compute(pin: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(pin.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn verify(&self, supplied_pin: &str) -> bool {
        Self::compute(supplied_pin) == *self
    }
}
