//! Local ids of compiled types
//!
//! A type inside a compiled binary is addressed by the first four bytes,
//! little-endian, of the MD4 digest of `"s\0\0\0" + namespace + name`.

use md4::{Digest, Md4};

const PREFIX: &[u8] = b"s\0\0\0";

/// Local id of the compiled type `namespace.name`
pub fn compiled_file_id(namespace: &str, name: &str) -> i64 {
    let mut hasher = Md4::new();
    hasher.update(PREFIX);
    hasher.update(namespace.as_bytes());
    hasher.update(name.as_bytes());
    i64::from(digest_prefix(&hasher.finalize()))
}

fn digest_prefix(digest: &[u8]) -> i32 {
    i32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}
