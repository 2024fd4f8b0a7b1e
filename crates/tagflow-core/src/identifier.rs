//! Namespace-qualified symbol names.
//!
//! Every event lives inside the namespace of its enclosing subprocess. A raw
//! identifier written in the source is turned into a [`QualifiedName`] by
//! [`QualifiedName::qualify`]: names that already contain a `.` are taken
//! verbatim, everything else is prefixed with the namespace.

use std::{borrow::Borrow, fmt};

use serde::Serialize;

/// Separator between a namespace and a local name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// A symbol-table key.
///
/// # Examples
///
/// ```
/// use tagflow_core::identifier::QualifiedName;
///
/// let local = QualifiedName::qualify("billing", "invoice");
/// assert_eq!(local, "billing.invoice");
///
/// let foreign = QualifiedName::qualify("billing", "shipping.dispatch");
/// assert_eq!(foreign, "shipping.dispatch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    /// Qualifies `raw` against `namespace`.
    ///
    /// If `raw` contains a `.` it is considered already qualified and is used
    /// unchanged, otherwise the result is `<namespace>.<raw>`.
    pub fn qualify(namespace: &str, raw: &str) -> Self {
        if raw.contains(NAMESPACE_SEPARATOR) {
            Self(raw.to_string())
        } else {
            Self(format!("{namespace}{NAMESPACE_SEPARATOR}{raw}"))
        }
    }

    /// Uses `name` as a key without any qualification.
    ///
    /// Subprocess ids are stored this way since they are the namespaces
    /// themselves.
    pub fn verbatim(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key as raw bytes, the unit the symbol table hashes over.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the namespace part, if the name contains a separator.
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .rsplit_once(NAMESPACE_SEPARATOR)
            .map(|(namespace, _)| namespace)
    }

    /// Returns the part after the last separator, or the whole name.
    pub fn local_name(&self) -> &str {
        self.0
            .rsplit_once(NAMESPACE_SEPARATOR)
            .map_or(self.0.as_str(), |(_, local)| local)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QualifiedName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for QualifiedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for QualifiedName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for QualifiedName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_qualify_local_name() {
        let name = QualifiedName::qualify("ns", "bar");
        assert_eq!(name, "ns.bar");
        assert_eq!(name.namespace(), Some("ns"));
        assert_eq!(name.local_name(), "bar");
    }

    #[test]
    fn test_qualify_keeps_dotted_name() {
        let name = QualifiedName::qualify("ns", "sub.bar");
        assert_eq!(name, "sub.bar");
        assert_eq!(name.namespace(), Some("sub"));
    }

    #[test]
    fn test_verbatim_has_no_namespace() {
        let name = QualifiedName::verbatim("s1");
        assert_eq!(name.as_str(), "s1");
        assert_eq!(name.namespace(), None);
        assert_eq!(name.local_name(), "s1");
    }

    #[test]
    fn test_display() {
        assert_eq!(QualifiedName::qualify("a", "b").to_string(), "a.b");
    }

    proptest! {
        #[test]
        fn prop_qualify_dotless(ns in "[a-z][a-z0-9_]{0,8}", raw in "[a-z][a-z0-9_]{0,8}") {
            let name = QualifiedName::qualify(&ns, &raw);
            prop_assert_eq!(name.namespace(), Some(ns.as_str()));
            prop_assert_eq!(name.local_name(), raw.as_str());
        }

        #[test]
        fn prop_qualify_is_idempotent(ns in "[a-z]{1,6}", raw in "[a-z]{1,6}") {
            let once = QualifiedName::qualify(&ns, &raw);
            let twice = QualifiedName::qualify("other", once.as_str());
            prop_assert_eq!(once, twice);
        }
    }
}
