//! error taxonomy of the priority engine.
//!
//! All of these are fatal at the engine boundary : the computation is one batch
//! pass with no partial-success semantics, so a caller gets either a complete
//! result or one of these.

use thiserror::Error;

/// maximum number of missing strain ids listed in a [PriorityError::MissingStrains] message
pub const MAX_MISSING_LISTED: usize = 10;

#[derive(Error, Debug)]
pub enum PriorityError {
    /// a sequence does not have the alignment length defined by the reference
    #[error("sequence {id} has length {got}, the alignment length is {expected}")]
    InputLength {
        id: String,
        got: usize,
        expected: usize,
    },

    /// a focal or context set came in empty
    #[error("{which} sequence set is empty")]
    EmptyInput { which: &'static str },

    /// strains listed in an input were not retrievable from the sequence source
    #[error("{nb_missing} strains not found in {src}, first missing : {}", .listed.join(", "))]
    MissingStrains {
        // named `src` rather than `source` because thiserror treats a field
        // named `source` as the error's source, which a String cannot be
        src: String,
        nb_missing: usize,
        listed: Vec<String>,
    },

    /// a context sequence got no nearest focal assignment. This is a bug, not an input error
    #[error("internal invariant violated : no nearest focal match for context sequence {context_id}")]
    InternalInvariant { context_id: String },
} // end of PriorityError

impl PriorityError {
    /// builds a [PriorityError::MissingStrains], keeping at most
    /// [MAX_MISSING_LISTED] ids in the message
    pub fn missing_strains(source: &str, missing: Vec<String>) -> Self {
        let nb_missing = missing.len();
        let listed = missing
            .into_iter()
            .take(MAX_MISSING_LISTED)
            .collect::<Vec<String>>();
        PriorityError::MissingStrains {
            src: source.to_string(),
            nb_missing,
            listed,
        }
    } // end of missing_strains
} // end of impl PriorityError

// end of mod tests
