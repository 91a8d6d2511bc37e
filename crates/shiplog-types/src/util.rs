use sha1::{Digest, Sha1};

/// SHA-1 of `input` as 40 lowercase hex characters
pub fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}
