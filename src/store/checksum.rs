//! CRC32 line checksums
//!
//! Every stored line is prefixed by the checksum of its payload; every read
//! validates it.

use crc32fast::Hasher;

pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Renders `<crc as 8 hex digits> <payload>`.
pub fn seal_line(payload: &str) -> String {
    format!("{:08x} {}", compute_checksum(payload.as_bytes()), payload)
}

/// Splits a sealed line and verifies it.
///
/// Returns the payload, or `None` if the prefix is missing, malformed, or
/// does not match.
pub fn open_line(line: &str) -> Option<&str> {
    let (prefix, payload) = line.split_once(' ')?;
    if prefix.len() != 8 {
        return None;
    }
    let expected = u32::from_str_radix(prefix, 16).ok()?;
    (compute_checksum(payload.as_bytes()) == expected).then_some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = b"select * from t";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_seal_and_open() {
        let line = seal_line("{\"a\":1}");
        assert_eq!(line.len(), 8 + 1 + 7);
        assert_eq!(open_line(&line), Some("{\"a\":1}"));
    }

    #[test]
    fn test_open_rejects_tampering() {
        let line = seal_line("{\"a\":1}");
        let tampered = line.replace("1}", "2}");
        assert_eq!(open_line(&tampered), None);
        assert_eq!(open_line("not-a-sealed-line"), None);
        assert_eq!(open_line("zzzzzzzz {}"), None);
    }
}
