//! Command integrity verification.
//!
//! A telecommand may carry a SHA-256 digest of its own canonical bytes —
//! the device-id prefix through the closing paren, inclusive. When the
//! "require signed commands" flag is set, a command without a digest is
//! rejected outright.

use sha2::{Digest, Sha256};

use crate::error::IntegrityError;

/// Length of the command digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Outcome of a successful verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    /// A digest was present and matched the canonical bytes.
    Verified,
    /// No digest was present and none was required.
    Unsigned,
}

/// Verify `provided` against the digest of `canonical`.
///
/// `canonical` must be the exact byte range from the device-id prefix
/// through the closing `)` inclusive.
pub fn verify_digest(
    canonical: &[u8],
    provided: Option<&[u8; DIGEST_LEN]>,
    require_signed: bool,
) -> Result<SignatureStatus, IntegrityError> {
    match provided {
        None if require_signed => Err(IntegrityError::MissingSignature),
        None => Ok(SignatureStatus::Unsigned),
        Some(expected) => {
            let computed = Sha256::digest(canonical);
            if computed.as_slice() == expected {
                Ok(SignatureStatus::Verified)
            } else {
                Err(IntegrityError::SignatureMismatch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(bytes: &[u8]) -> [u8; DIGEST_LEN] {
        Sha256::digest(bytes).into()
    }

    #[test]
    fn matching_digest_verifies() {
        let canonical = b"CTS1+hello_world()";
        let digest = digest_of(canonical);
        assert_eq!(
            verify_digest(canonical, Some(&digest), false),
            Ok(SignatureStatus::Verified)
        );
        assert_eq!(
            verify_digest(canonical, Some(&digest), true),
            Ok(SignatureStatus::Verified)
        );
    }

    #[test]
    fn mismatched_digest_fails() {
        let canonical = b"CTS1+hello_world()";
        let mut digest = digest_of(canonical);
        digest[0] ^= 0x01;
        assert_eq!(
            verify_digest(canonical, Some(&digest), false),
            Err(IntegrityError::SignatureMismatch)
        );
    }

    #[test]
    fn digest_of_different_bytes_fails() {
        let digest = digest_of(b"CTS1+set_power(1)");
        assert_eq!(
            verify_digest(b"CTS1+set_power(2)", Some(&digest), false),
            Err(IntegrityError::SignatureMismatch)
        );
    }

    #[test]
    fn absent_digest_skips_when_not_required() {
        assert_eq!(
            verify_digest(b"CTS1+hello_world()", None, false),
            Ok(SignatureStatus::Unsigned)
        );
    }

    #[test]
    fn absent_digest_fails_when_required() {
        assert_eq!(
            verify_digest(b"CTS1+hello_world()", None, true),
            Err(IntegrityError::MissingSignature)
        );
    }
}
