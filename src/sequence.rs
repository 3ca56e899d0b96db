use crate::symbol::SymbolId;
use slotmap::{DefaultKey, SlotMap};

/// A node in the doubly-linked working sequence.
///
/// Nodes live in a slotmap arena and link to their neighbors by key, so a
/// pair can be replaced in O(1) without shifting anything.
#[derive(Debug)]
pub(crate) struct SymbolNode {
    pub id: SymbolId,
    /// Stable left-to-right ordinal. Assigned densely when the sequence is
    /// built; a replacement node inherits the ordinal of the pair's first
    /// node. Ordinals grow gaps as pairs collapse but remain strictly
    /// increasing along the list, and are never renumbered.
    pub pos: u64,
    pub prev: Option<DefaultKey>,
    pub next: Option<DefaultKey>,
}

/// The mutable working sequence.
#[derive(Debug, Default)]
pub(crate) struct Sequence {
    nodes: SlotMap<DefaultKey, SymbolNode>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    len: usize,
    next_pos: u64,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<DefaultKey> {
        self.head
    }

    pub fn node(&self, key: DefaultKey) -> &SymbolNode {
        &self.nodes[key]
    }

    pub fn get(&self, key: DefaultKey) -> Option<&SymbolNode> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: DefaultKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Appends a symbol at the tail, giving it the next dense ordinal.
    pub fn push_back(&mut self, id: SymbolId) -> DefaultKey {
        let pos = self.next_pos;
        self.next_pos += 1;

        let key = self.nodes.insert(SymbolNode {
            id,
            pos,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.len += 1;
        key
    }

    /// Replaces the pair `(anchor, anchor.next)` with a single node holding
    /// `id`. The new node inherits the anchor's ordinal and is patched into
    /// the surrounding links. Returns the new node's key.
    pub fn splice_pair(&mut self, anchor: DefaultKey, id: SymbolId) -> DefaultKey {
        let second = self.nodes[anchor]
            .next
            .expect("splice_pair anchor must have a right neighbor");
        let prev = self.nodes[anchor].prev;
        let next = self.nodes[second].next;
        let pos = self.nodes[anchor].pos;

        let key = self.nodes.insert(SymbolNode {
            id,
            pos,
            prev,
            next,
        });
        match prev {
            Some(p) => self.nodes[p].next = Some(key),
            None => self.head = Some(key),
        }
        match next {
            Some(n) => self.nodes[n].prev = Some(key),
            None => self.tail = Some(key),
        }
        self.nodes.remove(anchor);
        self.nodes.remove(second);
        self.len -= 1;
        key
    }

    /// Node keys front to back.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            seq: self,
            cursor: self.head,
        }
    }

    /// Symbol ids front to back.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.keys().map(|key| self.nodes[key].id)
    }

    /// Snapshot of the current symbol ids.
    pub fn to_vec(&self) -> Vec<SymbolId> {
        self.ids().collect()
    }
}

/// Iterator over node keys in list order.
pub(crate) struct Keys<'a> {
    seq: &'a Sequence,
    cursor: Option<DefaultKey>,
}

impl Iterator for Keys<'_> {
    type Item = DefaultKey;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        self.cursor = self.seq.nodes[key].next;
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence_of(raw: &[u32]) -> (Sequence, Vec<DefaultKey>) {
        let mut seq = Sequence::new();
        let keys = raw
            .iter()
            .map(|&id| seq.push_back(SymbolId::new(id)))
            .collect();
        (seq, keys)
    }

    fn ids_of(seq: &Sequence) -> Vec<u32> {
        seq.ids().map(|id| id.as_u32()).collect()
    }

    #[test]
    fn test_push_back_links_and_ordinals() {
        let (seq, keys) = sequence_of(&[5, 7, 9]);

        assert_eq!(seq.len(), 3);
        assert_eq!(ids_of(&seq), vec![5, 7, 9]);
        assert_eq!(seq.head(), Some(keys[0]));
        for (expected_pos, &key) in keys.iter().enumerate() {
            assert_eq!(seq.node(key).pos, expected_pos as u64);
        }
        assert_eq!(seq.node(keys[1]).prev, Some(keys[0]));
        assert_eq!(seq.node(keys[1]).next, Some(keys[2]));
    }

    #[test]
    fn test_splice_middle_pair() {
        let (mut seq, keys) = sequence_of(&[1, 2, 3, 4]);

        let fresh = seq.splice_pair(keys[1], SymbolId::new(8));

        assert_eq!(seq.len(), 3);
        assert_eq!(ids_of(&seq), vec![1, 8, 4]);
        assert_eq!(seq.node(fresh).pos, 1);
        assert_eq!(seq.node(fresh).prev, Some(keys[0]));
        assert_eq!(seq.node(fresh).next, Some(keys[3]));
        assert!(!seq.contains(keys[1]));
        assert!(!seq.contains(keys[2]));
    }

    #[test]
    fn test_splice_at_head_and_tail() {
        let (mut seq, keys) = sequence_of(&[1, 2, 3, 4]);

        let head = seq.splice_pair(keys[0], SymbolId::new(8));
        assert_eq!(seq.head(), Some(head));
        assert_eq!(ids_of(&seq), vec![8, 3, 4]);

        let tail = seq.splice_pair(keys[2], SymbolId::new(9));
        assert_eq!(ids_of(&seq), vec![8, 9]);
        assert_eq!(seq.node(tail).next, None);
        assert_eq!(seq.node(tail).pos, 2);
    }

    #[test]
    fn test_splice_whole_sequence() {
        let (mut seq, keys) = sequence_of(&[1, 2]);

        let only = seq.splice_pair(keys[0], SymbolId::new(3));

        assert_eq!(seq.len(), 1);
        assert_eq!(seq.head(), Some(only));
        assert_eq!(seq.node(only).prev, None);
        assert_eq!(seq.node(only).next, None);
    }

    #[test]
    fn test_ordinals_survive_splices() {
        let (mut seq, keys) = sequence_of(&[1, 1, 2, 2]);

        seq.splice_pair(keys[0], SymbolId::new(7));
        seq.splice_pair(keys[2], SymbolId::new(8));

        let positions: Vec<u64> = seq.keys().map(|k| seq.node(k).pos).collect();
        assert_eq!(positions, vec![0, 2]);
    }
}
