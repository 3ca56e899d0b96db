//! Pair replacement: overlap pruning and in-place sequence rewriting.
//!
//! One replacement pass takes the winning pair, resolves its recorded
//! occurrences against the live sequence, discards the overlapping ones,
//! and splices a fresh non-terminal over each survivor while keeping the
//! digram statistics exact. After a pass the index matches what a full
//! rebuild would produce.

use crate::digram::Digram;
use crate::error::{RepairError, Result};
use crate::repair::Repair;
use crate::symbol::SymbolId;
use slotmap::DefaultKey;
use std::hash::Hash;

/// One occurrence of the chosen pair, resolved to its two live nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occurrence {
    pub anchor: DefaultKey,
    pub second: DefaultKey,
}

/// Keeps a maximal non-overlapping subset of `raw`, scanning left to right.
///
/// Occurrences arrive in sequence order. Two occurrences of the same pair
/// can only overlap by sharing a node, which happens exactly when the next
/// anchor IS the previously kept occurrence's second node (a run of
/// identical symbols). Overlapping a discarded occurrence is fine, so a run
/// of k identical symbols keeps every other occurrence: ceil((k - 1) / 2)
/// of its k - 1 raw ones.
pub(crate) fn prune_overlaps(raw: &[Occurrence]) -> Vec<Occurrence> {
    let mut kept: Vec<Occurrence> = Vec::with_capacity(raw.len());
    for &occ in raw {
        if let Some(last) = kept.last() {
            if last.second == occ.anchor {
                continue;
            }
        }
        kept.push(occ);
    }
    kept
}

impl<T: Hash + Eq + Clone> Repair<T> {
    /// Replaces every non-overlapping occurrence of `digram` with `rule_id`.
    ///
    /// Occurrences are validated against the live sequence up front, pruned,
    /// then rewritten left to right. Around each splice the consumed pair
    /// and the two neighbor pairs are retired before the nodes move, and the
    /// fresh neighbor pairs recorded after, so the index never lags the
    /// sequence. Returns the number of replacements performed.
    pub(crate) fn replace_pair(&mut self, digram: Digram, rule_id: SymbolId) -> Result<usize> {
        let raw = self.resolve_occurrences(digram)?;
        let kept = prune_overlaps(&raw);
        for &occ in &kept {
            self.rewrite_occurrence(digram, occ, rule_id)?;
        }
        Ok(kept.len())
    }

    /// Resolves the recorded anchors of `digram` into live node pairs, in
    /// sequence order. Any anchor that no longer forms the pair means the
    /// index has drifted.
    fn resolve_occurrences(&self, digram: Digram) -> Result<Vec<Occurrence>> {
        let anchors = self.index.anchors(digram);
        let mut raw = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            let Some(node) = self.sequence.get(anchor) else {
                return Err(stale(digram, "anchor is no longer in the sequence"));
            };
            let Some(second) = node.next else {
                return Err(stale(digram, "anchor has no right neighbor"));
            };
            if node.id != digram.left || self.sequence.node(second).id != digram.right {
                return Err(stale(digram, "anchor no longer forms the pair"));
            }
            raw.push(Occurrence { anchor, second });
        }
        Ok(raw)
    }

    fn rewrite_occurrence(
        &mut self,
        digram: Digram,
        occ: Occurrence,
        rule_id: SymbolId,
    ) -> Result<()> {
        debug_assert!(self.sequence.contains(occ.anchor));
        debug_assert!(self.sequence.contains(occ.second));

        let anchor_pos = self.sequence.node(occ.anchor).pos;
        let second_pos = self.sequence.node(occ.second).pos;
        let left = self.sequence.node(occ.anchor).prev;
        let right = self.sequence.node(occ.second).next;

        // Retire the consumed pair and both neighbor pairs. Neighbor ids are
        // re-read from the arena here because an earlier splice in the same
        // pass may have already rewritten them.
        self.retire(digram, anchor_pos)?;
        if let Some(l) = left {
            let (l_id, l_pos) = {
                let node = self.sequence.node(l);
                (node.id, node.pos)
            };
            self.retire(Digram::new(l_id, digram.left), l_pos)?;
        }
        if let Some(r) = right {
            let r_id = self.sequence.node(r).id;
            self.retire(Digram::new(digram.right, r_id), second_pos)?;
        }

        let fresh = self.sequence.splice_pair(occ.anchor, rule_id);
        let fresh_pos = self.sequence.node(fresh).pos;

        // Record the pairs the fresh node now forms with its neighbors.
        if let Some(l) = left {
            let (l_id, l_pos) = {
                let node = self.sequence.node(l);
                (node.id, node.pos)
            };
            self.record(Digram::new(l_id, rule_id), l_pos, l)?;
        }
        if let Some(r) = right {
            let r_id = self.sequence.node(r).id;
            self.record(Digram::new(rule_id, r_id), fresh_pos, fresh)?;
        }
        Ok(())
    }

    fn retire(&mut self, digram: Digram, pos: u64) -> Result<()> {
        match self.index.retire(digram, pos) {
            Some(_) => Ok(()),
            None => Err(RepairError::IndexInconsistency(format!(
                "no occurrence of {digram} recorded at position {pos}"
            ))),
        }
    }

    fn record(&mut self, digram: Digram, pos: u64, anchor: DefaultKey) -> Result<()> {
        if self.index.record(digram, pos, anchor) {
            Ok(())
        } else {
            Err(RepairError::IndexInconsistency(format!(
                "duplicate occurrence of {digram} at position {pos}"
            )))
        }
    }
}

fn stale(digram: Digram, why: &str) -> RepairError {
    RepairError::IndexInconsistency(format!("stale occurrence of {digram}: {why}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    /// Builds synthetic occurrences chained like a run of identical
    /// symbols: each occurrence's anchor is the previous one's second node.
    fn run_occurrences(raw_count: usize) -> Vec<Occurrence> {
        let mut arena: SlotMap<DefaultKey, ()> = SlotMap::new();
        let nodes: Vec<DefaultKey> = (0..raw_count + 1).map(|_| arena.insert(())).collect();
        nodes
            .windows(2)
            .map(|pair| Occurrence {
                anchor: pair[0],
                second: pair[1],
            })
            .collect()
    }

    /// Builds occurrences over disjoint node pairs.
    fn disjoint_occurrences(count: usize) -> Vec<Occurrence> {
        let mut arena: SlotMap<DefaultKey, ()> = SlotMap::new();
        (0..count)
            .map(|_| Occurrence {
                anchor: arena.insert(()),
                second: arena.insert(()),
            })
            .collect()
    }

    #[test]
    fn test_prune_keeps_disjoint_occurrences() {
        let raw = disjoint_occurrences(4);
        assert_eq!(prune_overlaps(&raw), raw);
    }

    #[test]
    fn test_prune_empty() {
        assert!(prune_overlaps(&[]).is_empty());
    }

    #[test]
    fn test_prune_drops_second_of_adjacent_pair() {
        let raw = run_occurrences(2);
        let kept = prune_overlaps(&raw);
        assert_eq!(kept, vec![raw[0]]);
    }

    #[test]
    fn test_prune_resumes_after_skip() {
        // Three chained occurrences: the middle one is dropped, the third
        // only overlaps the dropped one and is kept.
        let raw = run_occurrences(3);
        let kept = prune_overlaps(&raw);
        assert_eq!(kept, vec![raw[0], raw[2]]);
    }

    #[test]
    fn test_prune_run_keeps_every_other_occurrence() {
        for k in 2..=9 {
            let raw = run_occurrences(k - 1);
            let kept = prune_overlaps(&raw);
            let expected: Vec<Occurrence> = raw.iter().copied().step_by(2).collect();
            assert_eq!(kept, expected, "run of {k} identical symbols");
            assert_eq!(kept.len(), (k - 1).div_ceil(2));
        }
    }
}
