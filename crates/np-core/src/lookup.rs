//! Name-keyed value tables.

use crate::error::LookupError;

/// Ordered `name -> value` entries with all-or-nothing extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValues<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for NamedValues<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> NamedValues<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

impl<V: Clone> NamedValues<V> {
    /// Look up a single name.
    pub fn extract_one(&self, name: &str) -> Result<V, LookupError> {
        self.get(name).cloned().ok_or(LookupError::NothingFound)
    }

    /// Look up every name in `names`, in the requested order.
    ///
    /// Fails with [`LookupError::NothingFound`] when no name matches and with
    /// [`LookupError::Missing`] listing the absent names when only some match.
    pub fn extract(&self, names: &[&str]) -> Result<Vec<V>, LookupError> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.get(name) {
                Some(v) => found.push(v.clone()),
                None => missing.push((*name).to_string()),
            }
        }
        if found.is_empty() {
            return Err(LookupError::NothingFound);
        }
        if !missing.is_empty() {
            return Err(LookupError::Missing { names: missing });
        }
        Ok(found)
    }
}

impl<V, S: Into<String>> FromIterator<(S, V)> for NamedValues<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (name, value) in iter {
            out.insert(name, value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NamedValues<f64> {
        [
            ("Simulation Time", 16.0),
            ("Another Time", 17.0),
            ("Third Time", 18.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn extract_keeps_requested_order() {
        let values = sample();
        let got = values
            .extract(&["Simulation Time", "Third Time", "Another Time"])
            .unwrap();
        assert_eq!(got, vec![16.0, 18.0, 17.0]);
        assert_eq!(values.extract_one("Another Time").unwrap(), 17.0);
    }

    #[test]
    fn nothing_found() {
        let values = sample();
        assert_eq!(values.extract(&["Length"]), Err(LookupError::NothingFound));
        assert_eq!(values.extract_one("Length"), Err(LookupError::NothingFound));
    }

    #[test]
    fn partial_match_reports_missing_names() {
        let values = sample();
        let err = values
            .extract(&["Simulation Time", "Length", "Diameter"])
            .unwrap_err();
        assert_eq!(
            err,
            LookupError::Missing {
                names: vec!["Length".to_string(), "Diameter".to_string()]
            }
        );
        assert!(err.to_string().contains("Length, Diameter"));
    }

    #[test]
    fn insert_replaces_existing() {
        let mut values = sample();
        values.insert("Another Time", 1.0);
        assert_eq!(values.len(), 3);
        assert_eq!(values.get("Another Time"), Some(&1.0));
    }
}
