use crate::sequence::Sequence;
use crate::symbol::SymbolId;
use ahash::AHashMap as HashMap;
use slotmap::DefaultKey;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

/// An ordered pair of adjacent symbols.
///
/// `Ord` is lexicographic on the numeric ids; that order is the documented
/// tie-break between equally frequent pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Digram {
    pub left: SymbolId,
    pub right: SymbolId,
}

impl Digram {
    pub fn new(left: SymbolId, right: SymbolId) -> Self {
        Self { left, right }
    }
}

impl fmt::Display for Digram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.left, self.right)
    }
}

/// Live occurrence set for one pair: anchor nodes keyed by their stable
/// ordinal, so iteration always runs in sequence order.
#[derive(Debug, Default)]
struct PairStats {
    occurrences: BTreeMap<u64, DefaultKey>,
}

/// A queue entry recording a pair's frequency at the moment it was pushed.
///
/// Entries go stale whenever the pair's count changes afterwards;
/// [`DigramIndex::most_frequent`] drops those lazily on pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    count: usize,
    digram: Digram,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher frequency = higher priority, smaller pair wins ties.
        self.count
            .cmp(&other.count)
            .then_with(|| other.digram.cmp(&self.digram))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Digram statistics for the whole working sequence.
///
/// The map side answers "where does this pair occur and how often"; the
/// heap side answers "which pair is globally most frequent" without a
/// rescan. Every count change pushes a fresh heap entry, so the heap holds
/// a superset of the truth and the stale part is discarded on pop.
#[derive(Debug, Default)]
pub(crate) struct DigramIndex {
    pairs: HashMap<Digram, PairStats>,
    queue: BinaryHeap<QueueEntry>,
}

impl DigramIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index with one walk over the sequence.
    pub fn build(seq: &Sequence) -> Self {
        let mut pairs: HashMap<Digram, PairStats> = HashMap::default();
        for key in seq.keys() {
            let node = seq.node(key);
            if let Some(next) = node.next {
                let digram = Digram::new(node.id, seq.node(next).id);
                pairs
                    .entry(digram)
                    .or_default()
                    .occurrences
                    .insert(node.pos, key);
            }
        }
        let queue = pairs
            .iter()
            .map(|(&digram, stats)| QueueEntry {
                count: stats.occurrences.len(),
                digram,
            })
            .collect();
        Self { pairs, queue }
    }

    /// Raw occurrence count of `digram`.
    pub fn count(&self, digram: Digram) -> usize {
        self.pairs
            .get(&digram)
            .map_or(0, |stats| stats.occurrences.len())
    }

    /// Number of distinct pairs currently present.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Anchors of every occurrence of `digram`, in sequence order.
    pub fn anchors(&self, digram: Digram) -> Vec<DefaultKey> {
        self.pairs
            .get(&digram)
            .map(|stats| stats.occurrences.values().copied().collect())
            .unwrap_or_default()
    }

    /// Records an occurrence of `digram` anchored at `anchor`.
    ///
    /// Returns false when an occurrence is already recorded at `pos`, which
    /// can only happen if the index has drifted from the sequence.
    pub fn record(&mut self, digram: Digram, pos: u64, anchor: DefaultKey) -> bool {
        let stats = self.pairs.entry(digram).or_default();
        if stats.occurrences.insert(pos, anchor).is_some() {
            return false;
        }
        let count = stats.occurrences.len();
        self.queue.push(QueueEntry { count, digram });
        true
    }

    /// Removes the occurrence of `digram` at `pos`, returning its anchor.
    pub fn retire(&mut self, digram: Digram, pos: u64) -> Option<DefaultKey> {
        let stats = self.pairs.get_mut(&digram)?;
        let anchor = stats.occurrences.remove(&pos)?;
        let count = stats.occurrences.len();
        if count == 0 {
            self.pairs.remove(&digram);
        } else {
            self.queue.push(QueueEntry { count, digram });
        }
        Some(anchor)
    }

    /// Pops the globally most frequent pair and its raw count.
    ///
    /// Entries whose recorded count no longer matches the live count are
    /// skipped, so the winner is exactly what a full rescan would select:
    /// maximum count, smallest `(left, right)` among ties.
    pub fn most_frequent(&mut self) -> Option<(Digram, usize)> {
        while let Some(entry) = self.queue.pop() {
            let live = self
                .pairs
                .get(&entry.digram)
                .map(|stats| stats.occurrences.len());
            if live == Some(entry.count) {
                return Some((entry.digram, entry.count));
            }
        }
        None
    }

    /// True when the incremental state matches a from-scratch rebuild.
    ///
    /// Linear in the sequence length; meant for debug assertions and tests.
    pub fn consistent_with(&self, seq: &Sequence) -> bool {
        let fresh = Self::build(seq);
        fresh.pairs.len() == self.pairs.len()
            && fresh.pairs.iter().all(|(digram, stats)| {
                self.pairs.get(digram).map(|s| &s.occurrences) == Some(&stats.occurrences)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> SymbolId {
        SymbolId::new(raw)
    }

    fn sequence_of(raw: &[u32]) -> (Sequence, Vec<DefaultKey>) {
        let mut seq = Sequence::new();
        let keys = raw.iter().map(|&r| seq.push_back(id(r))).collect();
        (seq, keys)
    }

    #[test]
    fn test_build_counts_every_adjacent_pair() {
        let (seq, keys) = sequence_of(&[1, 2, 1, 2, 3]);
        let index = DigramIndex::build(&seq);

        assert_eq!(index.count(Digram::new(id(1), id(2))), 2);
        assert_eq!(index.count(Digram::new(id(2), id(1))), 1);
        assert_eq!(index.count(Digram::new(id(2), id(3))), 1);
        assert_eq!(index.count(Digram::new(id(3), id(1))), 0);
        assert_eq!(index.pair_count(), 3);
        assert_eq!(index.anchors(Digram::new(id(1), id(2))), vec![keys[0], keys[2]]);
    }

    #[test]
    fn test_build_counts_overlapping_occurrences_raw() {
        // A run of four identical symbols holds three raw occurrences.
        let (seq, _) = sequence_of(&[7, 7, 7, 7]);
        let index = DigramIndex::build(&seq);

        assert_eq!(index.count(Digram::new(id(7), id(7))), 3);
    }

    #[test]
    fn test_most_frequent_prefers_higher_count() {
        let (seq, _) = sequence_of(&[1, 2, 1, 2, 3, 4]);
        let mut index = DigramIndex::build(&seq);

        let (digram, count) = index.most_frequent().unwrap();
        assert_eq!(digram, Digram::new(id(1), id(2)));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_most_frequent_breaks_ties_on_smaller_pair() {
        // (1,2) and (3,4) both occur twice; the smaller pair must win.
        let (seq, _) = sequence_of(&[3, 4, 3, 4, 5, 1, 2, 1, 2]);
        let mut index = DigramIndex::build(&seq);

        let (digram, count) = index.most_frequent().unwrap();
        assert_eq!(digram, Digram::new(id(1), id(2)));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_most_frequent_skips_stale_entries() {
        let (seq, keys) = sequence_of(&[1, 2, 1, 2, 3]);
        let mut index = DigramIndex::build(&seq);

        // Retire one (1,2) occurrence; the stale count-2 entry must not win.
        let anchor_pos = seq.node(keys[0]).pos;
        assert_eq!(index.retire(Digram::new(id(1), id(2)), anchor_pos), Some(keys[0]));

        let (digram, count) = index.most_frequent().unwrap();
        assert_eq!(count, 1);
        // All pairs now tie at one occurrence; smallest pair wins.
        assert_eq!(digram, Digram::new(id(1), id(2)));
    }

    #[test]
    fn test_record_and_retire_round_trip() {
        let (seq, keys) = sequence_of(&[1, 2]);
        let mut index = DigramIndex::new();
        let digram = Digram::new(id(1), id(2));
        let pos = seq.node(keys[0]).pos;

        assert!(index.record(digram, pos, keys[0]));
        assert_eq!(index.count(digram), 1);
        // A second record at the same ordinal reports drift.
        assert!(!index.record(digram, pos, keys[0]));

        assert_eq!(index.retire(digram, pos), Some(keys[0]));
        assert_eq!(index.count(digram), 0);
        assert_eq!(index.pair_count(), 0);
        assert_eq!(index.retire(digram, pos), None);
    }

    #[test]
    fn test_most_frequent_drains_to_none() {
        let (seq, keys) = sequence_of(&[1, 2]);
        let mut index = DigramIndex::build(&seq);

        index.retire(Digram::new(id(1), id(2)), seq.node(keys[0]).pos);
        assert_eq!(index.most_frequent(), None);
    }

    #[test]
    fn test_consistency_check_detects_drift() {
        let (seq, keys) = sequence_of(&[1, 2, 3]);
        let mut index = DigramIndex::build(&seq);
        assert!(index.consistent_with(&seq));

        index.retire(Digram::new(id(1), id(2)), seq.node(keys[0]).pos);
        assert!(!index.consistent_with(&seq));
    }
}
