//! Grammar expansion: resolving non-terminals back to input values.

use crate::error::{RepairError, Result};
use crate::repair::Repair;
use crate::symbol::SymbolId;
use ahash::AHashMap as HashMap;
use std::fmt;
use std::hash::Hash;

impl<T: Hash + Eq + Clone> Repair<T> {
    /// Fully expands every rule to the terminal values it stands for.
    ///
    /// Rules are processed in creation order, and a rule only ever
    /// references non-terminals minted before it, so each reference
    /// resolves against an expansion that is already complete. A reference
    /// that breaks that order fails fast.
    pub fn expansions(&self) -> Result<HashMap<SymbolId, Vec<T>>> {
        let mut expanded: HashMap<SymbolId, Vec<T>> = HashMap::default();
        for rule in self.rules.iter() {
            let mut terminals = Vec::new();
            for side in [rule.left, rule.right] {
                if let Some(value) = self.table.terminal(side) {
                    terminals.push(value.clone());
                } else if let Some(inner) = expanded.get(&side) {
                    terminals.extend(inner.iter().cloned());
                } else {
                    return Err(RepairError::ForwardReference {
                        rule: rule.id,
                        reference: side,
                    });
                }
            }
            expanded.insert(rule.id, terminals);
        }
        Ok(expanded)
    }

    /// Expands an id sequence (a snapshot, or the final sequence) back to
    /// the input values it represents.
    pub fn expand_ids(&self, ids: &[SymbolId]) -> Result<Vec<T>> {
        let expanded = self.expansions()?;
        let mut out = Vec::new();
        for &id in ids {
            if let Some(value) = self.table.terminal(id) {
                out.push(value.clone());
            } else if let Some(inner) = expanded.get(&id) {
                out.extend(inner.iter().cloned());
            } else {
                return Err(RepairError::IndexInconsistency(format!(
                    "sequence references undefined symbol {id}"
                )));
            }
        }
        Ok(out)
    }
}

impl<T: Hash + Eq + Clone + fmt::Display> Repair<T> {
    /// Renders each rule's expansion as a space-separated phrase, in rule
    /// order.
    pub fn expanded_phrases(&self) -> Result<Vec<(SymbolId, String)>> {
        let expanded = self.expansions()?;
        Ok(self
            .rules
            .iter()
            .map(|rule| {
                let terminals = expanded
                    .get(&rule.id)
                    .expect("every recorded rule has an expansion");
                let phrase = terminals
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                (rule.id, phrase)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::compress;

    #[test]
    fn test_rule_expansions_reach_terminals() {
        // (a, b) is replaced first, then (R2, c); the second rule must
        // expand through the first.
        let repair = compress("abcabc".chars()).unwrap();
        let expanded = repair.expansions().unwrap();

        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[&SymbolId::new(3)], vec!['a', 'b']);
        assert_eq!(expanded[&SymbolId::new(4)], vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_expand_final_sequence_recovers_input() {
        let input = "the cat sat on the mat and the cat sat still";
        let repair = compress(input.chars()).unwrap();

        let expanded = repair.expand_ids(&repair.final_sequence()).unwrap();
        let recovered: String = expanded.into_iter().collect();
        assert_eq!(recovered, input);
    }

    #[test]
    fn test_expand_every_snapshot_recovers_input() {
        let input = "abcabcabcabc";
        let repair = compress(input.chars()).unwrap();
        assert!(!repair.rules().is_empty());

        for rule in repair.rules() {
            let expanded = repair.expand_ids(&rule.snapshot).unwrap();
            let recovered: String = expanded.into_iter().collect();
            assert_eq!(recovered, input);
        }
    }

    #[test]
    fn test_expand_unknown_id_fails() {
        let repair = compress("abab".chars()).unwrap();
        let bogus = SymbolId::new(99);

        assert!(repair.expand_ids(&[bogus]).is_err());
    }

    #[test]
    fn test_expanded_phrases_in_rule_order() {
        let repair = compress("abcabc".chars()).unwrap();
        let phrases = repair.expanded_phrases().unwrap();

        assert_eq!(
            phrases,
            vec![
                (SymbolId::new(3), "a b".to_string()),
                (SymbolId::new(4), "a b c".to_string()),
            ]
        );
    }
}
