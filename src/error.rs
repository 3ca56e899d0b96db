use crate::symbol::SymbolId;
use thiserror::Error;

/// Failure modes of the compression core.
///
/// Both variants signal corrupted internal state rather than bad input:
/// either the incremental digram statistics have drifted from the working
/// sequence, or a rule references a symbol that was not defined before it.
/// The driver surfaces them immediately instead of continuing on a grammar
/// it can no longer trust.
#[derive(Error, Debug)]
pub enum RepairError {
    /// The digram statistics disagree with the working sequence.
    #[error("digram index inconsistency: {0}")]
    IndexInconsistency(String),

    /// A rule references a non-terminal that is not defined before it.
    #[error("rule {rule} references undefined symbol {reference}")]
    ForwardReference { rule: SymbolId, reference: SymbolId },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RepairError>;
