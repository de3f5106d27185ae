//! nucleotide encoding of aligned sequences.
//!
//! A raw sequence is lower-cased and kept as one byte code per alignment position.
//! Anything that is not a canonical base (and, optionally, not a gap) becomes the
//! fill value so that ambiguity codes, N runs and stray symbols are all treated
//! uniformly as masked downstream.

/// default code for a masked position ('n')
pub const DEFAULT_FILL_VALUE: u8 = b'n';

/// code kept for an alignment gap when gaps are not filled
pub const GAP: u8 = b'-';

/// returns true for the 4 canonical lower case base codes
#[inline]
pub fn is_canonical_base(c: u8) -> bool {
    matches!(c, b'a' | b'c' | b'g' | b't')
} // end of is_canonical_base

/// encodes a raw nucleotide sequence into one code per position.
/// Bytes are lower-cased first. A byte that is not a canonical base becomes fill_value,
/// except a gap when fill_gaps is false, which is preserved as a distinct code.
/// Pure and deterministic; length equality across sequences is checked by the
/// variant set builder, not here.
pub fn encode_sequence(raw: &[u8], fill_value: u8, fill_gaps: bool) -> Vec<u8> {
    let mut encoded = Vec::<u8>::with_capacity(raw.len());
    for c in raw {
        let c = c.to_ascii_lowercase();
        if is_canonical_base(c) || (!fill_gaps && c == GAP) {
            encoded.push(c);
        } else {
            encoded.push(fill_value);
        }
    }
    encoded
} // end of encode_sequence

// end of mod tests
