//! SHA-256 hashing for pinned archive verification.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Hash a file in chunks so multi-hundred-megabyte archives never sit in memory.
///
/// Returns the lowercase hex digest.
pub fn hash_file(path: &Path) -> io::Result<String> {
  let mut file = File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buf = [0u8; 64 * 1024];
  loop {
    let n = file.read(&mut buf)?;
    if n == 0 {
      break;
    }
    hasher.update(&buf[..n]);
  }
  Ok(hex::encode(hasher.finalize()))
}

/// Compare two hex digests, ignoring case.
pub fn digest_matches(expected: &str, actual: &str) -> bool {
  expected.trim().eq_ignore_ascii_case(actual)
}
