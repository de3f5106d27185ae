//! converts a distance matrix into a deterministic priority ranking.
//!
//! Each context sequence is matched to its nearest focal sequence, context sequences
//! sharing a nearest focal are ranked within the group, and the rank discounts the
//! score so that many context sequences crowding the same focal sequence lose
//! marginal value. Ranking is reproducible for a given seed.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::distance::DistanceMatrix;
use crate::error::PriorityError;

/// score discount per rank within a focal group : 10 extra sequences close to the
/// same focal sequence weigh as much as one mutation
const RANK_PENALTY: f64 = 0.1;

/// Priority of one context sequence. Emitted in the original context order,
/// consumed by the output writer.
#[derive(Debug, Clone)]
pub struct PriorityRecord {
    pub context_id: String,
    pub nearest_focal_id: String,
    /// uncorrected distance to the nearest focal sequence
    pub raw_distance: u32,
    /// 0-based rank among the context sequences sharing this nearest focal
    pub rank_within_group: usize,
    /// higher (less negative) means more informative about the focal neighbourhood
    pub score: f64,
} // end of PriorityRecord

/// Assigns a priority to every context sequence of the distance matrix.
///
/// Nearest focal selection penalizes heavily masked focal columns by a fractional
/// mask_count/alignment_length term, ties going to the lowest column index. Within a
/// group the members are shuffled with the seeded rng, then stably sorted on
/// raw_distance + mask_count_context/alignment_length, so that residual ties get a
/// reproducible but non input-order-favoring rank. The two fractional penalties are
/// asymmetric on purpose : focal-side masking steers the matching, context-side
/// masking only demotes the rank.
pub fn assign_priorities(
    distances: &DistanceMatrix,
    focal_ids: &[String],
    context_ids: &[String],
    focal_mask_counts: &[usize],
    context_mask_counts: &[usize],
    alignment_length: usize,
    rng_seed: u64,
) -> Result<Vec<PriorityRecord>, PriorityError> {
    if focal_ids.is_empty() {
        return Err(PriorityError::EmptyInput { which: "focal" });
    }
    if context_ids.is_empty() {
        return Err(PriorityError::EmptyInput { which: "context" });
    }
    debug_assert_eq!(distances.nb_rows(), context_ids.len());
    debug_assert_eq!(distances.nb_cols(), focal_ids.len());
    debug_assert_eq!(focal_mask_counts.len(), focal_ids.len());
    debug_assert_eq!(context_mask_counts.len(), context_ids.len());
    //
    let length = alignment_length as f64;
    //
    // nearest focal column per context row, focal-side masking as fractional penalty
    let mut nearest = Vec::<usize>::with_capacity(context_ids.len());
    for i in 0..context_ids.len() {
        let mut best: Option<(usize, f64)> = None;
        for (j, &d) in distances.row(i).iter().enumerate() {
            let adjusted = d as f64 + focal_mask_counts[j] as f64 / length;
            match best {
                Some((_, best_adjusted)) if adjusted >= best_adjusted => {}
                _ => best = Some((j, adjusted)),
            }
        }
        match best {
            Some((j, _)) => nearest.push(j),
            None => {
                return Err(PriorityError::InternalInvariant {
                    context_id: context_ids[i].clone(),
                })
            }
        }
    }
    //
    // explicit multimap : focal column -> context rows, in first-encounter order so
    // that one seeded rng gives reproducible shuffles across groups
    let mut groups = IndexMap::<usize, Vec<usize>>::new();
    for (i, &j) in nearest.iter().enumerate() {
        groups.entry(j).or_insert_with(Vec::new).push(i);
    }
    log::debug!(
        "{} context sequences matched to {} focal sequences",
        context_ids.len(),
        groups.len()
    );
    //
    let mut rng = StdRng::seed_from_u64(rng_seed);
    let mut ranks = vec![0usize; context_ids.len()];
    for (&focal, members) in groups.iter_mut() {
        members.shuffle(&mut rng);
        // stable sort : equal keys keep the shuffled order
        members.sort_by(|&a, &b| {
            let key_a = distances.get(a, focal) as f64 + context_mask_counts[a] as f64 / length;
            let key_b = distances.get(b, focal) as f64 + context_mask_counts[b] as f64 / length;
            key_a.total_cmp(&key_b)
        });
        for (rank, &member) in members.iter().enumerate() {
            ranks[member] = rank;
        }
    }
    //
    // emit in the original context order
    let mut records = Vec::<PriorityRecord>::with_capacity(context_ids.len());
    for (i, context_id) in context_ids.iter().enumerate() {
        let focal = nearest[i];
        let raw_distance = distances.get(i, focal);
        let rank = ranks[i];
        let score = -(raw_distance as f64) - RANK_PENALTY * rank as f64;
        records.push(PriorityRecord {
            context_id: context_id.clone(),
            nearest_focal_id: focal_ids[focal].clone(),
            raw_distance,
            rank_within_group: rank,
            score,
        });
    }
    //
    Ok(records)
} // end of assign_priorities

//====================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::distance::compute_distance_matrix;
    use crate::encode::DEFAULT_FILL_VALUE;
    use crate::variants::{Consensus, VariantSet};

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn matrix(context: &[&str], focal: &[&str], consensus: &str) -> DistanceMatrix {
        let consensus = Consensus::new(consensus.as_bytes(), DEFAULT_FILL_VALUE, true);
        let context = context
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("c{}", i), s.to_string()))
            .collect::<Vec<_>>();
        let focal = focal
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("f{}", i), s.to_string()))
            .collect::<Vec<_>>();
        let context = VariantSet::build("context", &context, &consensus).unwrap();
        let focal = VariantSet::build("focal", &focal, &consensus).unwrap();
        compute_distance_matrix(&context, &focal)
    }

    #[test]
    fn nearest_focal_ties_go_to_lowest_column() {
        // both focal sequences are at distance 1 of the context sequence, no masking
        let d = matrix(&["TCGT"], &["GCGT", "CCGT"], "ACGT");
        let records = assign_priorities(
            &d,
            &owned(&["f0", "f1"]),
            &owned(&["c0"]),
            &[0, 0],
            &[0],
            4,
            0,
        )
        .unwrap();
        assert_eq!(records[0].nearest_focal_id, "f0");
        assert_eq!(records[0].raw_distance, 1);
    }

    #[test]
    fn focal_masking_steers_the_match() {
        // f0 and f1 are both at distance 1, f0 is heavily masked elsewhere
        let d = matrix(&["TCGTACGT"], &["GCGTNNNN", "CCGTACGT"], "ACGTACGT");
        let records = assign_priorities(
            &d,
            &owned(&["f0", "f1"]),
            &owned(&["c0"]),
            &[4, 0],
            &[0],
            8,
            0,
        )
        .unwrap();
        assert_eq!(records[0].nearest_focal_id, "f1");
    }

    #[test]
    fn scores_decrease_with_rank_within_a_group() {
        // three context sequences all at distance 2 of the single focal sequence
        let d = matrix(
            &["TTGTACGT", "ACAAACGT", "ACGTACAA"],
            &["ACGTACGT"],
            "ACGTACGT",
        );
        let records = assign_priorities(
            &d,
            &owned(&["f0"]),
            &owned(&["c0", "c1", "c2"]),
            &[0],
            &[0, 0, 0],
            8,
            7,
        )
        .unwrap();
        let mut scores = records.iter().map(|r| r.score).collect::<Vec<_>>();
        scores.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(scores, vec![-2.0, -2.1, -2.2]);
        // ranks form a permutation of 0..3
        let mut ranks = records.iter().map(|r| r.rank_within_group).collect::<Vec<_>>();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn same_seed_reproduces_the_ranking() {
        let d = matrix(
            &["TTGTACGT", "ACAAACGT", "ACGTACAA"],
            &["ACGTACGT"],
            "ACGTACGT",
        );
        let run = |seed| {
            assign_priorities(
                &d,
                &owned(&["f0"]),
                &owned(&["c0", "c1", "c2"]),
                &[0],
                &[0, 0, 0],
                8,
                seed,
            )
            .unwrap()
            .iter()
            .map(|r| r.rank_within_group)
            .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn context_masking_demotes_the_rank() {
        // equal distances, c1 carries masked positions so it must rank after c0
        let d = matrix(&["TCGTACGT", "GCGTNNGT"], &["ACGTACGT"], "ACGTACGT");
        let records = assign_priorities(
            &d,
            &owned(&["f0"]),
            &owned(&["c0", "c1"]),
            &[0],
            &[0, 2],
            8,
            11,
        )
        .unwrap();
        assert_eq!(records[0].rank_within_group, 0);
        assert_eq!(records[1].rank_within_group, 1);
    }

    #[test]
    fn empty_focal_set_is_an_error() {
        let d = matrix(&["TCGT"], &["ACGT"], "ACGT");
        let res = assign_priorities(&d, &[], &owned(&["c0"]), &[], &[0], 4, 0);
        assert!(matches!(res, Err(PriorityError::EmptyInput { which: "focal" })));
    }
} // end of mod tests
