//! Symbol conversions.
//!
//! The graph's data model treats strings as sequences of 16-bit code units
//! (see the module-level docs in `lib.rs`), not as Unicode scalar values.
//! These helpers are the only place `&str` <-> `[Symbol]` conversion happens.

/// A single transition label: a 16-bit code unit.
pub type Symbol = u16;

/// Split a string into its UTF-16 code units.
pub fn to_symbols(s: &str) -> Vec<Symbol> {
    s.encode_utf16().collect()
}

/// Reassemble a symbol sequence into a `String`.
///
/// Every symbol sequence stored in the graph originated from `to_symbols`
/// applied to a valid `&str`, so this can never encounter an invalid
/// UTF-16 sequence in practice -- that is an internal invariant of how
/// this crate populates the graph, not a property of `u16` slices in
/// general.
pub fn to_string(symbols: &[Symbol]) -> String {
    String::from_utf16(symbols).expect("symbol sequences always originate from valid str input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let s = "hello, world";
        assert_eq!(to_string(&to_symbols(s)), s);
    }

    #[test]
    fn round_trip_empty() {
        assert_eq!(to_string(&to_symbols("")), "");
    }
}
