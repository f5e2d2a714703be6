use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256, the form the server compares uploads against.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
