//! Document fingerprint.
//!
//! A SHA-256 over the normalized lines, so rescans that differ only in
//! whitespace or quote style hash the same.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `lines` joined with `\n`.
pub fn document_hash<S: AsRef<str>>(lines: &[S]) -> String {
  let mut hasher = Sha256::new();
  for (i, line) in lines.iter().enumerate() {
    if i > 0 {
      hasher.update(b"\n");
    }
    hasher.update(line.as_ref().as_bytes());
  }
  hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::normalize;

  #[test]
  fn whitespace_noise_does_not_change_hash() {
    let a = normalize("ABRIL 2026\n17/04 festivo nacional\n");
    let b = normalize("  ABRIL\u{00A0}2026\r\n\n17/04   festivo nacional");
    assert_eq!(document_hash(&a), document_hash(&b));
  }

  #[test]
  fn content_changes_hash() {
    let a = normalize("17/04 festivo");
    let b = normalize("18/04 festivo");
    assert_ne!(document_hash(&a), document_hash(&b));
    assert_eq!(document_hash(&a).len(), 64);
  }

  #[test]
  fn empty_document_hashes_empty_string() {
    assert_eq!(
      document_hash::<&str>(&[]),
      "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
  }
}
