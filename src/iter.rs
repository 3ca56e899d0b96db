use crate::repair::Repair;
use crate::symbol::SymbolId;
use slotmap::DefaultKey;
use std::hash::Hash;

/// Iterator that reconstructs the original sequence by expanding rules.
///
/// Walks the working sequence front to back and keeps a stack of pending
/// ids while descending into rules, so expansion runs in constant time per
/// yielded value without materializing anything.
pub struct RepairIter<'a, T> {
    repair: &'a Repair<T>,
    cursor: Option<DefaultKey>,
    stack: Vec<SymbolId>,
}

impl<'a, T: Hash + Eq + Clone> RepairIter<'a, T> {
    pub(crate) fn new(repair: &'a Repair<T>) -> Self {
        Self {
            repair,
            cursor: repair.sequence.head(),
            stack: Vec::new(),
        }
    }
}

impl<'a, T: Hash + Eq + Clone> Iterator for RepairIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let repair = self.repair;
        loop {
            let id = match self.stack.pop() {
                Some(id) => id,
                None => {
                    let key = self.cursor?;
                    let node = repair.sequence.node(key);
                    self.cursor = node.next;
                    node.id
                }
            };
            if let Some(value) = repair.table.terminal(id) {
                return Some(value);
            }
            let rule = repair
                .rules
                .get(id)
                .expect("every non-terminal in the sequence has a rule");
            self.stack.push(rule.right);
            self.stack.push(rule.left);
        }
    }
}

impl<T: Hash + Eq + Clone> Repair<T> {
    /// Returns an iterator over the reconstructed sequence.
    pub fn iter(&self) -> RepairIter<'_, T> {
        RepairIter::new(self)
    }
}

impl<'a, T: Hash + Eq + Clone> IntoIterator for &'a Repair<T> {
    type Item = &'a T;
    type IntoIter = RepairIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
