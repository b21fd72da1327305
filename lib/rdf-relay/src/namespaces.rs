use rdf_relay_model::vocab::WELL_KNOWN_PREFIXES;
use rustc_hash::FxHashMap;

/// Prefix to namespace IRI mappings.
///
/// Prefixes are case-insensitive: they are stored lower-cased and every lookup lower-cases its
/// argument. A new table holds the `rdf`, `rdfs`, `xsd` and `owl` prefixes.
///
/// ```
/// use rdf_relay::NamespaceTable;
///
/// let mut namespaces = NamespaceTable::default();
/// namespaces.set("EX", "http://example.com/");
/// assert_eq!(namespaces.get("ex"), Some("http://example.com/"));
/// assert_eq!(namespaces.get("xsd"), Some("http://www.w3.org/2001/XMLSchema#"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceTable {
    prefixes: FxHashMap<String, String>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        WELL_KNOWN_PREFIXES.into_iter().collect()
    }
}

impl NamespaceTable {
    /// Creates a table without any prefix.
    pub fn empty() -> Self {
        Self {
            prefixes: FxHashMap::default(),
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .get(&prefix.to_lowercase())
            .map(String::as_str)
    }

    /// Defines or redefines a prefix. Returns the previous namespace, if any.
    pub fn set(&mut self, prefix: &str, namespace: impl Into<String>) -> Option<String> {
        self.prefixes.insert(prefix.to_lowercase(), namespace.into())
    }

    /// Removes a prefix. Returns its namespace, if it was defined.
    pub fn remove(&mut self, prefix: &str) -> Option<String> {
        self.prefixes.remove(&prefix.to_lowercase())
    }

    pub fn clear(&mut self) {
        self.prefixes.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns the mappings ordered by prefix.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut pairs = self
            .prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
            .collect::<Vec<_>>();
        pairs.sort_unstable();
        pairs.into_iter()
    }
}

impl<P: AsRef<str>, N: Into<String>> FromIterator<(P, N)> for NamespaceTable {
    fn from_iter<T: IntoIterator<Item = (P, N)>>(iter: T) -> Self {
        let mut table = Self::empty();
        for (prefix, namespace) in iter {
            table.set(prefix.as_ref(), namespace);
        }
        table
    }
}
