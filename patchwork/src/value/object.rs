//! Keyed maps with a two-tier key model.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use indexmap::{Equivalent, IndexMap, map::Entry};

use super::Value;

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(0);

/// Process-unique opaque key.
///
/// Symbols are never reachable through a path, so no declarative verb can
/// read, move or remove an entry keyed by one.
#[derive(Clone, Debug)]
pub struct Symbol {
    id: u64,
    description: Arc<str>,
}

impl Symbol {
    /// Mint a new symbol. Two symbols with the same description are distinct.
    #[must_use]
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// Human-readable description supplied at creation.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Key of an [`Object`] entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// Textual key, addressable by path.
    Name(String),
    /// Opaque key, invisible to paths and verbs.
    Opaque(Symbol),
}

impl Key {
    /// Borrow the text of an addressable key.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Opaque(_) => None,
        }
    }

    /// Returns `true` for opaque keys.
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// Numeric value of a canonical array-index key (`"0"`, `"17"`, never
    /// `"07"`), which objects always enumerate first.
    #[must_use]
    pub fn array_index(&self) -> Option<u32> {
        self.as_name().and_then(array_index)
    }
}

fn array_index(name: &str) -> Option<u32> {
    let canonical =
        name == "0" || (!name.starts_with('0') && name.bytes().all(|b| b.is_ascii_digit()));
    if !canonical {
        return None;
    }
    name.parse::<u32>().ok().filter(|index| *index < u32::MAX)
}

// Names hash exactly like `str` so lookups can borrow.
impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Name(name) => name.as_str().hash(state),
            Self::Opaque(symbol) => symbol.hash(state),
        }
    }
}

impl Equivalent<Key> for str {
    fn equivalent(&self, key: &Key) -> bool {
        key.as_name() == Some(self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Opaque(symbol) => write!(f, "Symbol({})", symbol.description()),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Self::Opaque(symbol)
    }
}

/// Insertion-ordered keyed map.
///
/// Enumeration order is: canonical array-index keys in ascending numeric
/// order, then every other key (textual or opaque) in insertion order.
/// Overwriting an existing key keeps its position; [`Object::relocate`] moves
/// a key to the end of its class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    entries: IndexMap<Key, Value>,
}

impl Object {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of entries, opaque ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the map holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an addressable key.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Look up any key.
    #[must_use]
    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable lookup of an addressable key.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries.get_mut(name)
    }

    /// Returns `true` when an addressable key is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns `true` when any key is present.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite an entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<Key>, value: Value) -> Option<Value> {
        let key_owned = key.into();
        let position = key_owned.array_index().map(|index| self.index_slot(index));
        match self.entries.entry(key_owned) {
            Entry::Occupied(mut occupied) => Some(occupied.insert(value)),
            Entry::Vacant(vacant) => {
                match position {
                    Some(slot) => {
                        vacant.shift_insert(slot, value);
                    }
                    None => {
                        vacant.insert(value);
                    }
                }
                None
            }
        }
    }

    /// Mutable access to an addressable entry, inserting `Undefined` first
    /// when it is missing.
    pub fn slot(&mut self, name: &str) -> &mut Value {
        let key = Key::from(name);
        let position = key.array_index().map(|index| self.index_slot(index));
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => match position {
                Some(slot) => vacant.shift_insert(slot, Value::Undefined),
                None => vacant.insert(Value::Undefined),
            },
        }
    }

    /// Remove an addressable entry, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.shift_remove(name)
    }

    /// Remove any entry, preserving the order of the rest.
    pub fn remove_key(&mut self, key: &Key) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Delete and reinsert an addressable entry, moving it to the end of its
    /// key class. Array-index keys land back in their numeric slot.
    pub fn relocate(&mut self, name: &str) -> bool {
        match self.entries.shift_remove_entry(name) {
            Some((key, value)) => {
                self.insert(key, value);
                true
            }
            None => false,
        }
    }

    /// Keep only the entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Key, &Value) -> bool) {
        self.entries.retain(|key, value| keep(key, value));
    }

    /// Iterate over entries in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    /// Iterate over keys in enumeration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Iterate over the addressable keys only.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().filter_map(Key::as_name)
    }

    /// Iterate over the addressable entries only.
    pub fn named_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| key.as_name().map(|name| (name, value)))
    }

    /// Position a new array-index key so the index prefix stays sorted.
    fn index_slot(&self, index: u32) -> usize {
        let (mut low, mut high) = (0, self.entries.len());
        while low < high {
            let mid = low.midpoint(high);
            let precedes = self
                .entries
                .get_index(mid)
                .and_then(|(key, _)| key.array_index())
                .is_some_and(|existing| existing < index);
            if precedes {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }
}

impl<K: Into<Key>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut object = Self::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl IntoIterator for Object {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
