//! sparse variant representation of aligned sequences against a shared consensus.
//!
//! For each sequence we only keep the alignment positions where it differs from the
//! consensus and is not masked, plus the list of its masked positions. For closely
//! related genomes both lists are tiny compared to the alignment length, which is what
//! makes the distance computation cheap.

use std::sync::Arc;

use crate::encode::encode_sequence;
use crate::error::PriorityError;

/// The encoded reference sequence defining the alignment coordinate system.
/// It is shared read-only (Arc) by every variant set built against it and never mutated.
#[derive(Clone)]
pub struct Consensus {
    /// one code per alignment position
    encoded: Arc<Vec<u8>>,
    /// code standing for a masked position
    fill_value: u8,
    /// whether gaps were folded into the fill value at encoding time
    fill_gaps: bool,
}

impl Consensus {
    /// encodes a raw reference sequence. The same fill_value / fill_gaps choice is
    /// then applied to every sequence encoded against this consensus.
    pub fn new(raw: &[u8], fill_value: u8, fill_gaps: bool) -> Self {
        let encoded = encode_sequence(raw, fill_value, fill_gaps);
        Consensus {
            encoded: Arc::new(encoded),
            fill_value,
            fill_gaps,
        }
    } // end of new

    /// number of alignment positions
    pub fn alignment_length(&self) -> usize {
        self.encoded.len()
    }

    /// the code standing for a masked position
    pub fn fill_value(&self) -> u8 {
        self.fill_value
    }

    pub(crate) fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// true if both consensus share the same underlying encoded array
    pub(crate) fn same_as(&self, other: &Consensus) -> bool {
        Arc::ptr_eq(&self.encoded, &other.encoded)
    }
} // end of impl Consensus

//====================================================================

/// Sparse view of one ordered collection of sequences against a shared consensus.
/// Built once per input set (focal, context) and only read afterwards.
pub struct VariantSet {
    /// sequence ids, in input order
    names: Vec<String>,
    /// per sequence, sorted (position, code) pairs where it differs from the
    /// consensus and is not masked
    variants: Vec<Vec<(u32, u8)>>,
    /// per sequence, sorted positions carrying the fill value
    masked: Vec<Vec<u32>>,
    /// shared reference
    consensus: Consensus,
} // end of VariantSet

impl VariantSet {
    /// Builds the sparse representation of an ordered collection of (id, raw sequence)
    /// pairs. Every sequence must have the consensus length, otherwise we get an
    /// [PriorityError::InputLength] naming the offending id and no partial set is returned.
    /// An empty collection is an [PriorityError::EmptyInput].
    pub fn build(
        which: &'static str,
        sequences: &[(String, String)],
        consensus: &Consensus,
    ) -> Result<Self, PriorityError> {
        if sequences.is_empty() {
            return Err(PriorityError::EmptyInput { which });
        }
        let align_length = consensus.alignment_length();
        let fill = consensus.fill_value();
        let cons = consensus.encoded();
        //
        let mut names = Vec::<String>::with_capacity(sequences.len());
        let mut variants = Vec::<Vec<(u32, u8)>>::with_capacity(sequences.len());
        let mut masked = Vec::<Vec<u32>>::with_capacity(sequences.len());
        //
        for (id, raw) in sequences {
            let encoded = encode_sequence(raw.as_bytes(), fill, consensus.fill_gaps);
            if encoded.len() != align_length {
                return Err(PriorityError::InputLength {
                    id: id.clone(),
                    got: encoded.len(),
                    expected: align_length,
                });
            }
            // positions are scanned in order so both lists come out sorted
            let mut seq_variants = Vec::<(u32, u8)>::new();
            let mut seq_masked = Vec::<u32>::new();
            for (pos, &code) in encoded.iter().enumerate() {
                if code == fill {
                    seq_masked.push(pos as u32);
                } else if code != cons[pos] {
                    seq_variants.push((pos as u32, code));
                }
            }
            log::trace!(
                "sequence {} : {} variants, {} masked positions",
                id,
                seq_variants.len(),
                seq_masked.len()
            );
            names.push(id.clone());
            variants.push(seq_variants);
            masked.push(seq_masked);
        }
        log::debug!(
            "built variant set for {} : {} sequences, {} variants in all",
            which,
            names.len(),
            variants.iter().map(|v| v.len()).sum::<usize>()
        );
        //
        Ok(VariantSet {
            names,
            variants,
            masked,
            consensus: consensus.clone(),
        })
    } // end of build

    /// number of sequences in the set
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// sequence ids in input order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, i: usize) -> &str {
        &self.names[i]
    }

    /// sorted (position, code) variant pairs of sequence i
    pub fn variants(&self, i: usize) -> &[(u32, u8)] {
        &self.variants[i]
    }

    /// sorted masked positions of sequence i
    pub fn masked(&self, i: usize) -> &[u32] {
        &self.masked[i]
    }

    /// number of recorded variants of sequence i
    pub fn variant_count(&self, i: usize) -> usize {
        self.variants[i].len()
    }

    /// number of masked positions of sequence i
    pub fn masked_count(&self, i: usize) -> usize {
        self.masked[i].len()
    }

    /// masked position counts for the whole set, in input order
    pub fn mask_counts(&self) -> Vec<usize> {
        self.masked.iter().map(|m| m.len()).collect()
    }

    pub fn consensus(&self) -> &Consensus {
        &self.consensus
    }

    pub fn alignment_length(&self) -> usize {
        self.consensus.alignment_length()
    }
} // end of impl VariantSet

//====================================================================

// end of mod tests
