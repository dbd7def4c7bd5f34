//! Container file signature and format version.

use crate::error::FormatError;

/// Magic bytes at offset 0 of every container file.
pub const SIGNATURE: [u8; 8] = *b"\x89SDC\r\n\x1a\n";

/// The only format version this implementation reads and writes.
pub const FORMAT_VERSION: u8 = 1;

/// Verify the signature and version byte at the start of `data`.
///
/// Returns the offset of the first byte after the version on success.
pub fn check_signature(data: &[u8]) -> Result<usize, FormatError> {
    if data.len() < SIGNATURE.len() + 1 {
        return Err(FormatError::UnexpectedEof {
            expected: SIGNATURE.len() + 1,
            available: data.len(),
        });
    }
    if data[..SIGNATURE.len()] != SIGNATURE {
        return Err(FormatError::SignatureNotFound);
    }
    let version = data[SIGNATURE.len()];
    if version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }
    Ok(SIGNATURE.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_current_version() {
        let mut data = SIGNATURE.to_vec();
        data.push(FORMAT_VERSION);
        assert_eq!(check_signature(&data).unwrap(), 9);
    }

    #[test]
    fn rejects_bad_magic() {
        let data = vec![0u8; 16];
        assert!(matches!(
            check_signature(&data),
            Err(FormatError::SignatureNotFound)
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut data = SIGNATURE.to_vec();
        data.push(99);
        assert!(matches!(
            check_signature(&data),
            Err(FormatError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(matches!(
            check_signature(&SIGNATURE[..4]),
            Err(FormatError::UnexpectedEof { .. })
        ));
    }
}
