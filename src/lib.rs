//! seqprior selects, among a large pool of context sequences, those genetically
//! closest to a focal sequence set and assigns each context sequence a priority.
//!
//! The pipeline is : encode aligned sequences ([encode]), build a sparse per-sequence
//! variant view against a shared consensus ([variants]), compute a masking-aware
//! distance matrix between the two sets ([distance]) and turn distances into a
//! deterministic ranking ([priority]). All inputs are assumed already aligned to the
//! same reference; this crate neither aligns nor infers phylogenies.

pub mod answer;
pub mod distance;
pub mod encode;
pub mod error;
pub mod priority;
pub mod utils;
pub mod variants;
