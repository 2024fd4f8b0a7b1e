//! Open-addressing symbol table.
//!
//! Keys are [`QualifiedName`]s, values are [`Symbol`]s. The table has a fixed
//! number of slots chosen at construction; collisions are resolved by linear
//! probing. One slot always stays empty so that every probe sequence ends.

use thiserror::Error;

use tagflow_core::{
    identifier::QualifiedName,
    layout::ObjectId,
    semantic::{EventKind, Targets},
};

use crate::config::{DEFAULT_SYMBOL_CAPACITY, MAX_SYMBOL_CAPACITY};

/// Errors raised by [`SymbolTable`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    /// No free slot is left for a new key.
    #[error("symbol table is full: cannot insert `{key}` into {capacity} slots")]
    CapacityExceeded { key: QualifiedName, capacity: usize },

    /// The key is not present.
    #[error("symbol `{0}` is not defined")]
    NotFound(QualifiedName),

    /// A layout object was bound to a symbol that already has one.
    #[error("symbol `{key}` is already bound to object {object}")]
    AlreadyBound { key: QualifiedName, object: ObjectId },
}

/// A declared event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSymbol {
    kind: EventKind,
    title: String,
    targets: Targets,
    object_id: Option<ObjectId>,
}

impl EventSymbol {
    pub fn new(kind: EventKind, title: impl Into<String>, targets: Targets) -> Self {
        Self {
            kind,
            title: title.into(),
            targets,
            object_id: None,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Task title; empty for every other kind.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }
}

/// A declared subprocess. Its key is the namespace of its events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessSymbol {
    display_name: String,
    object_id: Option<ObjectId>,
}

impl SubprocessSymbol {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            object_id: None,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// A value stored in the symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Event(EventSymbol),
    Subprocess(SubprocessSymbol),
}

impl Symbol {
    /// The layout object created for this symbol, once bound.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Symbol::Event(event) => event.object_id,
            Symbol::Subprocess(subprocess) => subprocess.object_id,
        }
    }

    pub fn as_event(&self) -> Option<&EventSymbol> {
        match self {
            Symbol::Event(event) => Some(event),
            Symbol::Subprocess(_) => None,
        }
    }

    pub fn as_subprocess(&self) -> Option<&SubprocessSymbol> {
        match self {
            Symbol::Subprocess(subprocess) => Some(subprocess),
            Symbol::Event(_) => None,
        }
    }

    /// Binds the layout object. Returns the existing id if one is already bound.
    pub fn bind_object(&mut self, id: ObjectId) -> Result<(), ObjectId> {
        let slot = match self {
            Symbol::Event(event) => &mut event.object_id,
            Symbol::Subprocess(subprocess) => &mut subprocess.object_id,
        };
        match *slot {
            Some(existing) => Err(existing),
            None => {
                *slot = Some(id);
                Ok(())
            }
        }
    }
}

impl From<EventSymbol> for Symbol {
    fn from(event: EventSymbol) -> Self {
        Symbol::Event(event)
    }
}

impl From<SubprocessSymbol> for Symbol {
    fn from(subprocess: SubprocessSymbol) -> Self {
        Symbol::Subprocess(subprocess)
    }
}

/// Polynomial rolling hash, `h = h * 31 + byte` over all bytes of `key`.
pub fn hash_key(key: &[u8]) -> u64 {
    key.iter()
        .fold(0u64, |h, &byte| h.wrapping_mul(31).wrapping_add(u64::from(byte)))
}

/// An occupied slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: QualifiedName,
    value: Symbol,
}

/// Fixed-capacity hash table with linear probing.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    slots: Vec<Option<Entry>>,
    len: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table with the default number of slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SYMBOL_CAPACITY)
    }

    /// Creates a table with `capacity` slots, rounded up to a power of two
    /// and clamped to `2..=MAX_SYMBOL_CAPACITY`. At most `capacity - 1` keys fit.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity
            .clamp(2, MAX_SYMBOL_CAPACITY)
            .next_power_of_two();
        Self {
            slots: vec![None; capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: &str) -> Option<&Symbol> {
        let index = self.probe(key);
        self.slots[index].as_ref().map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Symbol> {
        let index = self.probe(key);
        self.slots[index].as_mut().map(|entry| &mut entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or overwrites the symbol stored under `key`.
    ///
    /// Returns the previous symbol when the key was already present.
    ///
    /// # Errors
    ///
    /// [`SymbolTableError::CapacityExceeded`] when `key` is new and claiming a
    /// slot would leave no empty slot. Updating an existing key never fails.
    pub fn put(
        &mut self,
        key: QualifiedName,
        symbol: impl Into<Symbol>,
    ) -> Result<Option<Symbol>, SymbolTableError> {
        let index = self.probe(key.as_str());
        let symbol = symbol.into();

        if let Some(entry) = &mut self.slots[index] {
            return Ok(Some(std::mem::replace(&mut entry.value, symbol)));
        }

        let capacity = self.capacity();
        if self.len + 1 >= capacity {
            return Err(SymbolTableError::CapacityExceeded { key, capacity });
        }
        self.slots[index] = Some(Entry { key, value: symbol });
        self.len += 1;
        Ok(None)
    }

    /// Binds the layout object created for `key`.
    pub fn bind_object(
        &mut self,
        key: &QualifiedName,
        id: ObjectId,
    ) -> Result<(), SymbolTableError> {
        let symbol = self
            .get_mut(key.as_str())
            .ok_or_else(|| SymbolTableError::NotFound(key.clone()))?;
        symbol
            .bind_object(id)
            .map_err(|object| SymbolTableError::AlreadyBound {
                key: key.clone(),
                object,
            })
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &Symbol)> {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Finds the symbol a layout object was created for.
    pub fn find_by_object(&self, id: ObjectId) -> Option<(&QualifiedName, &Symbol)> {
        self.iter().find(|(_, symbol)| symbol.object_id() == Some(id))
    }

    /// Returns the slot holding `key`, or the empty slot where it would go.
    fn probe(&self, key: &str) -> usize {
        let capacity = self.slots.len() as u64;
        let mut hash = hash_key(key.as_bytes());
        loop {
            let index = (hash % capacity) as usize;
            match &self.slots[index] {
                Some(entry) if entry.key.as_str() != key => hash = hash.wrapping_add(1),
                _ => return index,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use tagflow_core::semantic::TargetSlot;

    use super::*;

    fn key(name: &str) -> QualifiedName {
        QualifiedName::verbatim(name)
    }

    fn task(title: &str) -> Symbol {
        EventSymbol::new(EventKind::Task, title, Targets::new()).into()
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        assert_eq!(hash_key(b""), 0);
        assert_eq!(hash_key(b"a"), 97);
        assert_eq!(hash_key(b"ab"), 97 * 31 + 98);
        assert_ne!(hash_key(b"ab"), hash_key(b"ba"));
    }

    #[test]
    fn test_capacity_rounds_to_power_of_two() {
        assert_eq!(SymbolTable::new().capacity(), 16384);
        assert_eq!(SymbolTable::with_capacity(0).capacity(), 2);
        assert_eq!(SymbolTable::with_capacity(5).capacity(), 8);
        assert_eq!(SymbolTable::with_capacity(8).capacity(), 8);
    }

    #[test]
    fn test_put_get() {
        let mut table = SymbolTable::with_capacity(8);
        assert!(table.is_empty());
        assert_eq!(table.put(key("s.a"), task("A")), Ok(None));

        assert_eq!(table.get("s.a"), Some(&task("A")));
        assert!(table.contains_key("s.a"));
        assert!(!table.contains_key("s.b"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let mut table = SymbolTable::with_capacity(8);
        table.put(key("s.a"), task("first")).unwrap();
        let previous = table.put(key("s.a"), task("second")).unwrap();

        assert_eq!(previous, Some(task("first")));
        assert_eq!(table.get("s.a"), Some(&task("second")));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_colliding_keys_probe_forward() {
        // "Aa" and "BB" share a hash (65 * 31 + 97 == 66 * 31 + 66).
        assert_eq!(hash_key(b"Aa"), hash_key(b"BB"));

        let mut table = SymbolTable::with_capacity(4);
        table.put(key("Aa"), task("first")).unwrap();
        table.put(key("BB"), task("second")).unwrap();

        assert_eq!(table.get("Aa"), Some(&task("first")));
        assert_eq!(table.get("BB"), Some(&task("second")));
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut table = SymbolTable::with_capacity(4);
        for name in ["a", "b", "c"] {
            table.put(key(name), task(name)).unwrap();
        }

        let err = table.put(key("d"), task("d")).unwrap_err();
        assert_eq!(
            err,
            SymbolTableError::CapacityExceeded {
                key: key("d"),
                capacity: 4
            }
        );
        assert_eq!(table.len(), 3);

        // Updates still succeed on a full table.
        assert!(table.put(key("b"), task("B")).is_ok());
        assert_eq!(table.get("b"), Some(&task("B")));
        assert_eq!(table.get("d"), None);
    }

    #[test]
    fn test_bind_object_once() {
        let mut table = SymbolTable::with_capacity(8);
        table.put(key("s.a"), task("A")).unwrap();

        table.bind_object(&key("s.a"), ObjectId::new(3)).unwrap();
        assert_eq!(table.get("s.a").unwrap().object_id(), Some(ObjectId::new(3)));

        let err = table.bind_object(&key("s.a"), ObjectId::new(4)).unwrap_err();
        assert!(matches!(
            err,
            SymbolTableError::AlreadyBound { object, .. } if object == ObjectId::new(3)
        ));

        let err = table.bind_object(&key("s.z"), ObjectId::new(5)).unwrap_err();
        assert_eq!(err, SymbolTableError::NotFound(key("s.z")));
    }

    #[test]
    fn test_find_by_object() {
        let mut table = SymbolTable::with_capacity(8);
        table.put(key("s"), SubprocessSymbol::new("Sales")).unwrap();
        table.bind_object(&key("s"), ObjectId::new(0)).unwrap();

        let (found, symbol) = table.find_by_object(ObjectId::new(0)).unwrap();
        assert_eq!(found, "s");
        assert_eq!(symbol.as_subprocess().unwrap().display_name(), "Sales");
        assert!(table.find_by_object(ObjectId::new(1)).is_none());
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let mut table = SymbolTable::with_capacity(16);
        for name in ["x.a", "x.b", "y.c"] {
            table.put(key(name), task(name)).unwrap();
        }
        let mut keys: Vec<_> = table.iter().map(|(key, _)| key.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["x.a", "x.b", "y.c"]);
    }

    #[test]
    fn test_event_targets_are_kept() {
        let mut targets = Targets::new();
        targets.set(TargetSlot::Up, key("s.b"));
        let mut table = SymbolTable::with_capacity(8);
        table
            .put(key("s.a"), EventSymbol::new(EventKind::Gateway, "", targets.clone()))
            .unwrap();

        let event = table.get("s.a").and_then(Symbol::as_event).unwrap();
        assert_eq!(event.kind(), EventKind::Gateway);
        assert_eq!(event.targets(), &targets);
    }

    proptest! {
        #[test]
        fn prop_distinct_keys_never_alias(
            keys in proptest::collection::hash_set("[a-z]{1,3}(\\.[a-z]{1,3})?", 1..60)
        ) {
            // A small table forces long probe chains.
            let mut table = SymbolTable::with_capacity(64);
            for name in &keys {
                table.put(key(name), task(name)).unwrap();
            }
            for name in &keys {
                prop_assert_eq!(table.get(name), Some(&task(name)));
            }
            prop_assert_eq!(table.len(), keys.len());
        }

        #[test]
        fn prop_last_write_wins(
            name in "[a-z]{1,8}",
            titles in proptest::collection::vec("[A-Za-z ]{0,10}", 1..8)
        ) {
            let mut table = SymbolTable::with_capacity(4);
            for title in &titles {
                table.put(key(&name), task(title)).unwrap();
            }
            let last = titles.last().unwrap();
            prop_assert_eq!(table.get(&name), Some(&task(last)));
            prop_assert_eq!(table.len(), 1);
        }
    }
}
