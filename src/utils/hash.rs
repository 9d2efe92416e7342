use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of an access code's UTF-8 bytes
pub fn hash_access_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}
