use crate::symbol::SymbolId;

/// One replacement step of the grammar.
///
/// Records the pair the minted non-terminal stands for, the raw occurrence
/// count that made the pair the winner, and the working sequence as it
/// looked immediately after the replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The non-terminal minted for this rule.
    pub id: SymbolId,
    /// Left element of the replaced pair.
    pub left: SymbolId,
    /// Right element of the replaced pair.
    pub right: SymbolId,
    /// Occurrence count of the pair at selection time, before overlapping
    /// occurrences were discarded. Always at least 2.
    pub occurrences: usize,
    /// The whole working sequence right after this replacement.
    pub snapshot: Vec<SymbolId>,
}

/// Append-only record of replacement steps, in creation order.
///
/// Creation order doubles as a topological order for expansion: a rule only
/// ever references non-terminals minted before it, so a single forward walk
/// resolves every rule to terminals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleLog {
    rules: Vec<Rule>,
}

impl RuleLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, rule: Rule) {
        debug_assert!(
            self.rules.last().map_or(true, |last| last.id < rule.id),
            "rule ids must be minted in increasing order"
        );
        self.rules.push(rule);
    }

    /// Number of rules recorded.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Rules in creation order, as a slice.
    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a rule by the non-terminal that names it.
    ///
    /// Ids are dense above the terminal range, so this is plain offset
    /// arithmetic from the first recorded rule.
    pub fn get(&self, id: SymbolId) -> Option<&Rule> {
        let first = self.rules.first()?.id;
        let offset = id.as_u32().checked_sub(first.as_u32())? as usize;
        self.rules.get(offset).filter(|rule| rule.id == id)
    }
}

impl<'a> IntoIterator for &'a RuleLog {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: u32, left: u32, right: u32) -> Rule {
        Rule {
            id: SymbolId::new(id),
            left: SymbolId::new(left),
            right: SymbolId::new(right),
            occurrences: 2,
            snapshot: Vec::new(),
        }
    }

    #[test]
    fn test_get_by_id_uses_offset_arithmetic() {
        let mut log = RuleLog::new();
        log.push(rule(4, 0, 1));
        log.push(rule(5, 4, 2));
        log.push(rule(6, 5, 5));

        assert_eq!(log.get(SymbolId::new(4)).map(|r| r.left), Some(SymbolId::new(0)));
        assert_eq!(log.get(SymbolId::new(6)).map(|r| r.left), Some(SymbolId::new(5)));
        assert!(log.get(SymbolId::new(3)).is_none());
        assert!(log.get(SymbolId::new(7)).is_none());
    }

    #[test]
    fn test_get_on_empty_log() {
        let log = RuleLog::new();
        assert!(log.get(SymbolId::new(0)).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_iteration_preserves_creation_order() {
        let mut log = RuleLog::new();
        log.push(rule(2, 0, 1));
        log.push(rule(3, 2, 2));

        let ids: Vec<u32> = log.iter().map(|r| r.id.as_u32()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.as_slice().len(), 2);
    }
}
