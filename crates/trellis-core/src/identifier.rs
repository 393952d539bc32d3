//! Identifier management using string interning for efficient storage and comparison
//!
//! This module provides the [`Id`] type with an efficient string-interner based approach.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> &'static Mutex<DefaultStringInterner> {
    INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()))
}

/// Efficient identifier type using string interning
///
/// This type provides efficient storage and comparison of component
/// identifiers through string interning. Identifiers are `Copy`, compare in
/// constant time, and resolve back to their original string on demand.
///
/// # Examples
///
/// ```
/// use trellis_core::identifier::Id;
///
/// // Create identifiers from names
/// let backend_id = Id::new("backend");
/// let db_id = Id::new("user_db");
///
/// // Create synthetic identifiers without a caller-visible name
/// let root_id = Id::synthetic(0);
/// assert_eq!(backend_id, "backend");
/// assert_ne!(backend_id, db_id);
/// # let _ = root_id;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::identifier::Id;
    ///
    /// let component_id = Id::new("user_service");
    /// ```
    pub fn new(name: &str) -> Self {
        let mut interner = interner().lock().expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Creates an internal `Id` without a caller-visible string representation.
    ///
    /// Used for engine-generated identities such as the synthetic tree root.
    ///
    /// # Arguments
    ///
    /// * `idx` - A unique index used to generate the identifier.
    pub fn synthetic(idx: usize) -> Self {
        let name = format!("__{idx}");
        Self::new(&name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::identifier::Id;
    ///
    /// let id = Id::new("backend");
    /// assert!(id == "backend");
    /// ```
    fn eq(&self, other: &str) -> bool {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    /// Allows direct comparison with string references: `id == &string`
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("gateway");
        let id2 = Id::new("gateway");
        let id3 = Id::new("frontend");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "gateway");
    }

    #[test]
    fn test_synthetic() {
        let id1 = Id::synthetic(0);
        let id2 = Id::synthetic(1);
        let id3 = Id::synthetic(0);

        assert_eq!(id1, id3);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_display_roundtrip() {
        let id = Id::new("user_service");
        assert_eq!(id.to_string(), "user_service");
        assert_eq!(Id::new(&id.to_string()), id);
    }

    #[test]
    fn test_copy_semantics() {
        let id = Id::new("copyable");
        let copy = id;
        assert_eq!(id, copy);
    }
}
