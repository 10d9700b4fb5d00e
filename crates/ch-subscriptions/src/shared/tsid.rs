//! TSID Generator
//!
//! Time-sorted identifiers rendered as 13-character Crockford Base32 strings.
//! Used for subscription ids and caller execution ids.

use std::sync::atomic::{AtomicU16, Ordering};

use chrono::Utc;

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const ENCODED_LEN: usize = 13;

static COUNTER: AtomicU16 = AtomicU16::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new TSID, e.g. "0HZXEQ5Y8JY5Z".
    ///
    /// Layout (64 bits): 42 bits of milliseconds since the epoch, 10 random
    /// bits, then a 12-bit counter.
    pub fn generate() -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) as u64;
        let random = rand::random::<u16>() as u64 & 0x3FF;

        let tsid = ((millis & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | (counter & 0xFFF);
        encode_crockford(tsid)
    }
}

fn encode_crockford(mut value: u64) -> String {
    let mut encoded = [b'0'; ENCODED_LEN];
    for slot in encoded.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }
    encoded.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_shape() {
        let id = TsidGenerator::generate();
        assert_eq!(id.len(), ENCODED_LEN);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(TsidGenerator::generate()), "Duplicate TSID generated");
        }
    }

    #[test]
    fn test_sortability() {
        let first = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TsidGenerator::generate();
        assert!(first < second, "TSIDs should be lexicographically sortable");
    }

    #[test]
    fn test_encoding_is_fixed_width() {
        assert_eq!(encode_crockford(0), "0000000000000");
        assert_eq!(encode_crockford(31), "000000000000Z");
        assert_eq!(encode_crockford(32), "0000000000010");
    }
}
