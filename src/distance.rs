//! masking-aware pairwise distances between two variant sets.
//!
//! The naive way of comparing every query sequence to every reference sequence over
//! the whole alignment is O(n·m·L). Both sets being sparse views against the same
//! consensus, a pair can instead be compared by merge walks over its sorted variant
//! and masked lists, which is O(n·m·k) with k the typical number of variants per
//! sequence, far below L for closely related genomes.

use cpu_time::ProcessTime;
use rayon::prelude::*;
use std::time::SystemTime;

use crate::encode::GAP;
use crate::variants::VariantSet;

/// Dense matrix of informative-site distances, one row per query sequence and one
/// column per reference-side sequence. Produced once and read-only afterwards.
pub struct DistanceMatrix {
    nb_rows: usize,
    nb_cols: usize,
    /// row major
    values: Vec<u32>,
} // end of DistanceMatrix

impl DistanceMatrix {
    pub fn nb_rows(&self) -> usize {
        self.nb_rows
    }

    pub fn nb_cols(&self) -> usize {
        self.nb_cols
    }

    /// distance between query sequence i and reference-side sequence j
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.values[i * self.nb_cols + j]
    }

    /// row of distances of query sequence i
    pub fn row(&self, i: usize) -> &[u32] {
        &self.values[i * self.nb_cols..(i + 1) * self.nb_cols]
    }
} // end of impl DistanceMatrix

//====================================================================

// number of variant positions of a falling on masked positions of b
fn variants_on_masked(variants: &[(u32, u8)], masked: &[u32]) -> usize {
    let mut count = 0;
    let (mut iv, mut im) = (0, 0);
    while iv < variants.len() && im < masked.len() {
        match variants[iv].0.cmp(&masked[im]) {
            std::cmp::Ordering::Less => iv += 1,
            std::cmp::Ordering::Greater => im += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                iv += 1;
                im += 1;
            }
        }
    }
    count
} // end of variants_on_masked

/// distance between one query sequence and one reference-side sequence, both given
/// as sorted sparse lists against the same consensus.
///
/// The counted quantity is the number of informative sites at which the two sequences
/// disagree : positions where both carry a variant with a different base, or where
/// exactly one carries a variant and the other matches the consensus. Positions masked
/// in either sequence never count. The masking correction of the underlying formula
/// (mask_i + mask_j - 2·shared_masked) only bites at positions carried by either
/// sparse support : shared-masked positions cancel out of it entirely and a masked
/// position facing a consensus call contributes nothing, so the correction reduces to
/// discounting variants of one sequence falling on masked positions of the other.
/// Every position then contributes 0 or 1 and the distance can never go negative.
fn pair_distance(
    q_variants: &[(u32, u8)],
    q_masked: &[u32],
    r_variants: &[(u32, u8)],
    r_masked: &[u32],
) -> u32 {
    // merge walk over the two variant lists : overlap of supports and matching base calls
    let mut overlap = 0usize;
    let mut matching = 0usize;
    let (mut iq, mut ir) = (0, 0);
    while iq < q_variants.len() && ir < r_variants.len() {
        let (q_pos, q_code) = q_variants[iq];
        let (r_pos, r_code) = r_variants[ir];
        match q_pos.cmp(&r_pos) {
            std::cmp::Ordering::Less => iq += 1,
            std::cmp::Ordering::Greater => ir += 1,
            std::cmp::Ordering::Equal => {
                overlap += 1;
                // only canonical base agreement counts as a match, two kept gaps do not
                if q_code == r_code && q_code != GAP {
                    matching += 1;
                }
                iq += 1;
                ir += 1;
            }
        }
    }
    // variants of one sequence on masked positions of the other are not informative
    let masked_out =
        variants_on_masked(q_variants, r_masked) + variants_on_masked(r_variants, q_masked);
    //
    (q_variants.len() + r_variants.len() - overlap - matching - masked_out) as u32
} // end of pair_distance

/// Computes the dense distance matrix between a query set and a reference-side set
/// sharing the same consensus. Rows are partitioned across rayon workers, each
/// writing its own disjoint row range.
pub fn compute_distance_matrix(query: &VariantSet, reference: &VariantSet) -> DistanceMatrix {
    assert_eq!(
        query.alignment_length(),
        reference.alignment_length(),
        "variant sets built against consensus of different lengths"
    );
    debug_assert!(
        query.consensus().same_as(reference.consensus()),
        "variant sets built against different consensus"
    );
    //
    let start_t = SystemTime::now();
    let cpu_start = ProcessTime::now();
    //
    let nb_rows = query.len();
    let nb_cols = reference.len();
    let mut values = vec![0u32; nb_rows * nb_cols];
    values
        .par_chunks_mut(nb_cols)
        .enumerate()
        .for_each(|(i, row)| {
            let q_variants = query.variants(i);
            let q_masked = query.masked(i);
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = pair_distance(q_variants, q_masked, reference.variants(j), reference.masked(j));
            }
        });
    //
    log::info!(
        "distance matrix {} x {} computed, sys time {:?}, cpu time {:?}",
        nb_rows,
        nb_cols,
        start_t.elapsed().unwrap_or_default(),
        cpu_start.elapsed()
    );
    //
    DistanceMatrix {
        nb_rows,
        nb_cols,
        values,
    }
} // end of compute_distance_matrix

//====================================================================

// end of mod tests
