//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for region labels, and the
//! [`IdGenerator`] that hands out labels for regions the author did not name.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Efficient identifier type using string interning
///
/// Region labels are compared and hashed constantly while resolving a layout
/// and checking annotations, so they are stored as interned symbols.
///
/// # Examples
///
/// ```
/// use memstack_core::identifier::Id;
///
/// let stack = Id::new("stack");
/// let heap = Id::new("heap");
///
/// assert_ne!(stack, heap);
/// assert_eq!(stack, "stack");
///
/// let anon = Id::from_anonymous("region", 0);
/// assert_eq!(anon, "__region0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Creates an internal `Id` for a region without an authored label.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Short tag describing where the identifier came from.
    /// * `idx` - A unique index used to generate the anonymous identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use memstack_core::identifier::Id;
    ///
    /// let anon_id = Id::from_anonymous("blank", 42);
    /// assert_eq!(anon_id, "__blank42");
    /// ```
    pub fn from_anonymous(prefix: &str, idx: usize) -> Self {
        let name = format!("__{prefix}{idx}");
        Self::new(&name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Monotonic generator of anonymous identifiers.
///
/// Generated labels are deterministic for a given input: the n-th request
/// yields `__{prefix}{n}` unless that name is already taken, in which case the
/// counter moves on until a free name is found.
///
/// # Examples
///
/// ```
/// use memstack_core::identifier::{Id, IdGenerator};
///
/// let taken = Id::new("__region0");
/// let mut ids = IdGenerator::new("region");
///
/// let id = ids.next_unused(|id| id == taken);
/// assert_eq!(id, "__region1");
/// ```
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: &'static str,
    next: usize,
}

impl IdGenerator {
    /// Creates a generator whose identifiers start with `__{prefix}`.
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }

    /// Returns the next identifier for which `is_taken` is false.
    pub fn next_unused(&mut self, is_taken: impl Fn(Id) -> bool) -> Id {
        loop {
            let id = Id::from_anonymous(self.prefix, self.next);
            self.next += 1;
            if !is_taken(id) {
                return id;
            }
            log::trace!(id:% = id; "Skipping anonymous identifier already in use");
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn generated_ids_avoid_taken_and_never_repeat(
            taken in prop::collection::hash_set(0usize..32, 0..16),
            count in 1usize..24,
        ) {
            let taken: HashSet<Id> = taken
                .into_iter()
                .map(|n| Id::from_anonymous("prop_gen", n))
                .collect();
            let mut ids = IdGenerator::new("prop_gen");

            let mut seen = HashSet::new();
            for _ in 0..count {
                let id = ids.next_unused(|id| taken.contains(&id));
                prop_assert!(!taken.contains(&id));
                prop_assert!(seen.insert(id));
            }
        }
    }
}
