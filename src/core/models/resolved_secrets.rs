use std::collections::BTreeMap;

/// Secret values keyed by the name declared in the descriptor.
///
/// Values may be empty: a declared secret missing from every store
/// resolves to `""`. Those names are also tracked in `defaulted` so
/// callers can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSecrets {
    values: BTreeMap<String, String>,
    defaulted: Vec<String>,
}

impl ResolvedSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value found in a store.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Record a secret that was not found and resolved to an empty string.
    pub fn insert_defaulted(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.values.insert(name.clone(), String::new());
        if !self.defaulted.contains(&name) {
            self.defaulted.push(name);
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Names that fell back to the empty-string default.
    pub fn defaulted(&self) -> &[String] {
        &self.defaulted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaulted_secret_is_empty_and_tracked() {
        let mut secrets = ResolvedSecrets::new();
        secrets.insert("A", "1");
        secrets.insert_defaulted("B");

        assert_eq!(secrets.get("A"), Some("1"));
        assert_eq!(secrets.get("B"), Some(""));
        assert_eq!(secrets.defaulted(), &["B".to_string()]);
        assert_eq!(secrets.names().count(), 2);
    }

    #[test]
    fn iteration_is_sorted_by_name() {
        let mut secrets = ResolvedSecrets::new();
        secrets.insert("Z_KEY", "z");
        secrets.insert("A_KEY", "a");

        let names: Vec<_> = secrets.names().collect();
        assert_eq!(names, vec!["A_KEY", "Z_KEY"]);
    }
}
