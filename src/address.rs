//! Spreadsheet-style column addresses (`A`, `B`, ..., `Z`, `AA`, ...).
//!
//! Addresses are bijective base-26 numerals over `A..=Z` mapping to 0-based column indexes.
//! Both directions are pure and total:
//!
//! - [`encode_column`] never fails and never wraps.
//! - [`decode_column`] is case-insensitive, returns `0` for any input containing a non-letter
//!   (including the empty string), and clamps to `u64::MAX` instead of overflowing.
//!
//! ```rust
//! use csv_graph_reducer::address::{decode_column, encode_column};
//!
//! assert_eq!(encode_column(26), "AA");
//! assert_eq!(decode_column("bb"), 53);
//! assert_eq!(decode_column("A1"), 0);
//! ```

use std::fmt;

const DIGITS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode a 0-based column index as its letter address.
pub fn encode_column(mut index: u64) -> String {
    // u64::MAX needs 14 letters.
    let mut buf = Vec::with_capacity(14);
    loop {
        buf.push(DIGITS[(index % 26) as usize]);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

/// Decode a letter address into a 0-based column index.
///
/// Returns `0` when `address` is empty or contains anything other than ASCII letters.
pub fn decode_column(address: &str) -> u64 {
    let mut n: u64 = 0;
    for (i, b) in address.bytes().enumerate() {
        let d = match b.to_ascii_uppercase() {
            c @ b'A'..=b'Z' => u64::from(c - b'A'),
            _ => return 0,
        };
        if i == 0 {
            n = d;
            continue;
        }
        n = match n
            .checked_add(1)
            .and_then(|v| v.checked_mul(26))
            .and_then(|v| v.checked_add(d))
        {
            Some(v) => v,
            None => u64::MAX,
        };
    }
    n
}

/// A column address as written in configuration (`"C"`, `"ab"`, ...).
///
/// The raw text is kept for diagnostics; [`ColumnAddress::index`] applies the permissive
/// decode, so an unset or malformed address resolves to column `A`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ColumnAddress(String);

impl ColumnAddress {
    /// Wrap raw address text.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The canonical address of a 0-based index.
    pub fn from_index(index: u64) -> Self {
        Self(encode_column(index))
    }

    /// Raw address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolved 0-based column index.
    pub fn index(&self) -> u64 {
        decode_column(&self.0)
    }
}

impl fmt::Display for ColumnAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ColumnAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_column, encode_column, ColumnAddress};

    #[test]
    fn encode_literals() {
        let cases = [
            (0, "A"),
            (1, "B"),
            (25, "Z"),
            (26, "AA"),
            (27, "AB"),
            (51, "AZ"),
            (52, "BA"),
            (53, "BB"),
            (675, "YZ"),
            (676, "ZA"),
            (701, "ZZ"),
            (702, "AAA"),
            (703, "AAB"),
            (728, "ABA"),
            (729, "ABB"),
        ];
        for (index, want) in cases {
            assert_eq!(encode_column(index), want, "encode_column({index})");
        }
    }

    #[test]
    fn decode_literals() {
        let cases = [
            ("A", 0),
            ("B", 1),
            ("Z", 25),
            ("AA", 26),
            ("AZ", 51),
            ("BA", 52),
            ("BB", 53),
            ("ZZ", 701),
            ("AAA", 702),
            ("ABA", 728),
            ("ABB", 729),
        ];
        for (address, want) in cases {
            assert_eq!(decode_column(address), want, "decode_column({address:?})");
        }
    }

    #[test]
    fn decode_is_case_insensitive() {
        assert_eq!(decode_column("aba"), 728);
        assert_eq!(decode_column("aBa"), 728);
        assert_eq!(decode_column("z"), 25);
    }

    #[test]
    fn decode_falls_back_to_zero_on_non_letters() {
        assert_eq!(decode_column(""), 0);
        assert_eq!(decode_column("1"), 0);
        assert_eq!(decode_column("0"), 0);
        assert_eq!(decode_column("A1"), 0);
        assert_eq!(decode_column(" B"), 0);
        assert_eq!(decode_column("Ä"), 0);
    }

    #[test]
    fn decode_clamps_instead_of_wrapping() {
        let huge = "Z".repeat(40);
        assert_eq!(decode_column(&huge), u64::MAX);
    }

    #[test]
    fn encode_handles_full_width() {
        let s = encode_column(u64::MAX);
        assert!(s.bytes().all(|b| b.is_ascii_uppercase()));
        assert_eq!(decode_column(&s), u64::MAX);
        assert_eq!(decode_column(&encode_column(u64::MAX - 1)), u64::MAX - 1);
    }

    #[test]
    fn round_trip_exhaustive() {
        for n in 0..100_000u64 {
            assert_eq!(decode_column(&encode_column(n)), n);
        }
    }

    #[test]
    fn encode_is_injective_and_ordered_by_length() {
        // Bijective numerals: every address of length k precedes every address of length k + 1.
        let mut prev = encode_column(0);
        for n in 1..20_000u64 {
            let cur = encode_column(n);
            assert!(
                cur.len() > prev.len() || (cur.len() == prev.len() && cur > prev),
                "{prev} !< {cur}"
            );
            prev = cur;
        }
    }

    #[cfg(feature = "deep_tests")]
    #[test]
    fn round_trip_deep() {
        for n in 0..5_000_000u64 {
            assert_eq!(decode_column(&encode_column(n)), n);
        }
        for n in (u64::MAX - 10_000)..=u64::MAX {
            assert_eq!(decode_column(&encode_column(n)), n);
        }
    }

    #[test]
    fn column_address_resolves_permissively() {
        assert_eq!(ColumnAddress::new("C").index(), 2);
        assert_eq!(ColumnAddress::default().index(), 0);
        assert_eq!(ColumnAddress::from_index(53).as_str(), "BB");
        assert_eq!(ColumnAddress::from("x9").index(), 0);
    }
}
