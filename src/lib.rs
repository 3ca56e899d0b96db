//! # RePair - Recursive Pairing Grammar Compression
//!
//! A Rust implementation of the RePair algorithm for offline grammar
//! compression.
//!
//! RePair loads the whole input, then repeatedly replaces the most frequent
//! pair of adjacent symbols with a fresh non-terminal until no pair occurs
//! twice. Every replacement is recorded as a rule, so the output is a
//! straight-line grammar: the compressed sequence plus the ordered rule log
//! regenerate the input exactly.
//!
//! ## Example
//!
//! ```
//! use repair_rs::Repair;
//!
//! # fn main() -> repair_rs::Result<()> {
//! let mut repair = Repair::new();
//! repair.extend("abcabcabc".chars());
//! repair.compress()?;
//!
//! // Reconstructs the original sequence
//! let reconstructed: String = repair.iter().collect();
//! assert_eq!(reconstructed, "abcabcabc");
//!
//! println!("Created {} rules", repair.rules().len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance
//!
//! - Pair selection is deterministic: highest raw count first, ties broken
//!   towards the smallest `(left, right)` id pair
//! - Digram statistics are maintained incrementally across replacements; the
//!   sequence is scanned once, not once per rule
//! - Memory-efficient sequence rewriting using generational indices (SlotMap)

mod digram;
mod error;
mod expand;
mod hierarchy;
mod iter;
mod repair;
mod rewrite;
mod rule;
mod sequence;
mod symbol;

#[cfg(test)]
mod tests;

pub use error::{RepairError, Result};
pub use hierarchy::{render_png, Hierarchy};
pub use iter::RepairIter;
pub use repair::{compress, Repair, RepairConfig, RepairStats};
pub use rule::{Rule, RuleLog};
pub use symbol::{SymbolId, SymbolTable};
