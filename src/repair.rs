//! RePair grammar compression.
//!
//! RePair is a greedy grammar-based compression algorithm: it repeatedly
//! replaces the most frequent pair of adjacent symbols with a freshly
//! minted non-terminal until no pair occurs twice. The result is a
//! straight-line grammar, the final sequence plus an ordered rule log that
//! regenerate the input exactly.
//!
//! RePair is a batch algorithm; the whole input is loaded before the
//! replacement loop starts.
//!
//! # Example
//!
//! ```
//! use repair_rs::Repair;
//!
//! # fn main() -> repair_rs::Result<()> {
//! let mut repair = Repair::new();
//! repair.extend("abcabcabcabc".chars());
//! repair.compress()?;
//!
//! // Reconstructs the original sequence
//! let reconstructed: String = repair.iter().collect();
//! assert_eq!(reconstructed, "abcabcabcabc");
//! # Ok(())
//! # }
//! ```

use crate::digram::DigramIndex;
use crate::error::Result;
use crate::rule::{Rule, RuleLog};
use crate::sequence::Sequence;
use crate::symbol::{SymbolId, SymbolTable};
use std::hash::Hash;
use tracing::debug;

/// Tuning knobs for a [`Repair`] run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepairConfig {
    /// Stop after this many rules. The grammar is left exactly as
    /// consistent as a natural halt, just less compressed. `None` runs
    /// until no pair repeats.
    pub max_rules: Option<usize>,
}

/// Main RePair data structure.
///
/// Collects input symbols, then compresses them by repeatedly replacing
/// the most frequent adjacent pair with a new rule.
pub struct Repair<T> {
    /// Maps between caller values and dense symbol ids.
    pub(crate) table: SymbolTable<T>,

    /// The working sequence being rewritten in place.
    pub(crate) sequence: Sequence,

    /// Incremental digram statistics; rebuilt from scratch only once, when
    /// compression starts.
    pub(crate) index: DigramIndex,

    /// Replacement steps in creation order.
    pub(crate) rules: RuleLog,

    config: RepairConfig,

    /// Number of values added.
    length: usize,

    /// Whether compression has been performed.
    compressed: bool,
}

impl<T: Hash + Eq + Clone> Repair<T> {
    /// Creates a new empty instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(RepairConfig::default())
    }

    /// Creates a new empty instance with explicit tuning knobs.
    pub fn with_config(config: RepairConfig) -> Self {
        Self {
            table: SymbolTable::new(),
            sequence: Sequence::new(),
            index: DigramIndex::new(),
            rules: RuleLog::new(),
            config,
            length: 0,
            compressed: false,
        }
    }

    /// Adds a value to the sequence.
    ///
    /// Must be called before `compress()`.
    pub fn push(&mut self, value: T) {
        assert!(
            !self.compressed,
            "Cannot add values after compression has been performed"
        );
        let id = self.table.intern(value);
        self.sequence.push_back(id);
        self.length += 1;
    }

    /// Extends the sequence with multiple values.
    ///
    /// Must be called before `compress()`.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }

    /// Runs the replacement loop to completion.
    ///
    /// Each pass selects the most frequent adjacent pair (raw count, ties
    /// broken towards the smallest pair), mints a rule for it, and rewrites
    /// every non-overlapping occurrence. The loop halts when no pair occurs
    /// twice, or earlier when the configured rule limit is hit.
    ///
    /// Calling this twice is a no-op. An error means the incremental
    /// statistics disagreed with the sequence; the grammar must not be
    /// used after that.
    pub fn compress(&mut self) -> Result<()> {
        if self.compressed {
            return Ok(());
        }
        if self.length < 2 {
            self.compressed = true;
            return Ok(());
        }

        self.index = DigramIndex::build(&self.sequence);

        loop {
            if let Some(limit) = self.config.max_rules {
                if self.rules.len() >= limit {
                    debug!(target: "repair", rules = self.rules.len(), "rule limit reached, stopping early");
                    break;
                }
            }

            let Some((digram, count)) = self.index.most_frequent() else {
                break;
            };
            if count < 2 {
                break;
            }

            let rule_id = self.table.mint_rule_id();
            let replaced = self.replace_pair(digram, rule_id)?;
            debug!(
                target: "repair",
                %digram,
                count,
                replaced,
                rule = %rule_id,
                remaining = self.sequence.len(),
                "replaced most frequent pair"
            );
            debug_assert!(
                self.index.consistent_with(&self.sequence),
                "digram index drifted from the sequence"
            );

            self.rules.push(Rule {
                id: rule_id,
                left: digram.left,
                right: digram.right,
                occurrences: count,
                snapshot: self.sequence.to_vec(),
            });
        }

        self.compressed = true;
        Ok(())
    }

    /// Returns the number of values added to the sequence.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if no values have been added.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns whether compression has been performed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The working sequence as symbol ids: the raw input before
    /// compression, the compressed remainder after.
    pub fn final_sequence(&self) -> Vec<SymbolId> {
        self.sequence.to_vec()
    }

    /// The recorded rules, in creation order.
    pub fn rules(&self) -> &RuleLog {
        &self.rules
    }

    /// The symbol table mapping ids back to input values.
    pub fn table(&self) -> &SymbolTable<T> {
        &self.table
    }

    /// Returns compression statistics.
    pub fn stats(&self) -> RepairStats {
        let final_length = self.sequence.len();
        RepairStats {
            input_length: self.length,
            final_length,
            grammar_symbols: final_length + 2 * self.rules.len(),
            num_rules: self.rules.len(),
            compressed: self.compressed,
        }
    }
}

impl<T: Hash + Eq + Clone> Default for Repair<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience: interns `input`, runs the replacement loop to
/// completion, and returns the finished compressor for inspection.
pub fn compress<T, I>(input: I) -> Result<Repair<T>>
where
    T: Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut repair = Repair::new();
    repair.extend(input);
    repair.compress()?;
    Ok(repair)
}

/// Statistics about a RePair run.
#[derive(Debug, Clone, Copy)]
pub struct RepairStats {
    /// Number of input symbols added
    pub input_length: usize,
    /// Length of the compressed sequence
    pub final_length: usize,
    /// Total symbols in the grammar: the final sequence plus both sides of
    /// every rule
    pub grammar_symbols: usize,
    /// Number of rules created
    pub num_rules: usize,
    /// Whether compression has been performed
    pub compressed: bool,
}

impl RepairStats {
    /// Returns the compression ratio as a percentage.
    ///
    /// Lower is better. 100% means no compression.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_length == 0 {
            0.0
        } else {
            (self.grammar_symbols as f64 / self.input_length as f64) * 100.0
        }
    }
}
