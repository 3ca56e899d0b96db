use ahash::AHashMap as HashMap;
use std::fmt;
use std::hash::Hash;

/// Interned symbol identifier.
///
/// Terminals and non-terminals share a single dense id space: terminal ids
/// are assigned in order of first appearance in the input, and non-terminal
/// ids continue directly above the terminal range, in rule creation order.
/// Because the numeric order of non-terminal ids is their creation order, a
/// rule can only ever reference ids smaller than its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) fn new(raw: u32) -> Self {
        SymbolId(raw)
    }

    /// Raw numeric id.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interns input values and minted non-terminals as dense integer ids.
///
/// The working sequence and the rule log only ever carry [`SymbolId`]s; this
/// table is the single place that maps back to the caller's values.
#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    /// Terminal values, indexed by id.
    terminals: Vec<T>,
    /// Reverse map from terminal value to its id.
    ids: HashMap<T, SymbolId>,
    /// Number of non-terminal ids minted so far.
    rules: u32,
}

impl<T: Hash + Eq + Clone> SymbolTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            terminals: Vec::new(),
            ids: HashMap::default(),
            rules: 0,
        }
    }

    /// Returns the id for `value`, interning it on first sight.
    pub(crate) fn intern(&mut self, value: T) -> SymbolId {
        if let Some(&id) = self.ids.get(&value) {
            return id;
        }
        let id = SymbolId(self.terminals.len() as u32);
        self.terminals.push(value.clone());
        self.ids.insert(value, id);
        id
    }

    /// Mints the id for the next rule, directly above the terminal range.
    ///
    /// Must only be called once the terminal range is frozen; the driver
    /// guarantees this by rejecting input after compression starts.
    pub(crate) fn mint_rule_id(&mut self) -> SymbolId {
        let id = SymbolId(self.terminals.len() as u32 + self.rules);
        self.rules += 1;
        id
    }
}

impl<T> SymbolTable<T> {
    /// Number of distinct terminal values seen in the input.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    /// Number of non-terminal ids minted so far.
    pub fn rule_count(&self) -> usize {
        self.rules as usize
    }

    /// True when `id` denotes an original input value.
    pub fn is_terminal(&self, id: SymbolId) -> bool {
        id.index() < self.terminals.len()
    }

    /// The terminal value behind `id`, or `None` for non-terminals.
    pub fn terminal(&self, id: SymbolId) -> Option<&T> {
        self.terminals.get(id.index())
    }
}

impl<T: fmt::Display> SymbolTable<T> {
    /// Renders one symbol: terminals through their `Display` impl,
    /// non-terminals as `R<id>`.
    pub fn name(&self, id: SymbolId) -> String {
        match self.terminals.get(id.index()) {
            Some(value) => value.to_string(),
            None => format!("R{id}"),
        }
    }

    /// Renders an id sequence as a space-separated phrase.
    pub fn phrase(&self, ids: &[SymbolId]) -> String {
        ids.iter()
            .map(|&id| self.name(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
