use serde::{Deserialize, Serialize};

/// A property parameter such as `TYPE=work`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntryValue {
    Text(String),
    /// Ordered sub-parts, e.g. box, extended, street, locality, region, postal code, country.
    Composite(Vec<String>),
}

impl EntryValue {
    /// Text as written, or a composite's first non-empty part (`""` if all are empty).
    pub fn first_text(&self) -> &str {
        match self {
            EntryValue::Text(value) => value,
            EntryValue::Composite(parts) => parts
                .iter()
                .map(String::as_str)
                .find(|part| !part.trim().is_empty())
                .unwrap_or(""),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            EntryValue::Text(value) => value.trim().is_empty(),
            EntryValue::Composite(parts) => parts.iter().all(|part| part.trim().is_empty()),
        }
    }

    pub fn components(&self) -> Vec<&str> {
        match self {
            EntryValue::Text(value) => non_blank(value).into_iter().collect(),
            EntryValue::Composite(parts) => parts
                .iter()
                .map(String::as_str)
                .filter(|part| !part.trim().is_empty())
                .collect(),
        }
    }

    pub fn display(&self) -> String {
        self.components().join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    pub value: EntryValue,
}

impl Entry {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            params: Vec::new(),
            value: EntryValue::Text(value.into()),
        }
    }

    pub fn composite<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: Vec::new(),
            value: EntryValue::Composite(parts.into_iter().map(Into::into).collect()),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(Param::new(name, value));
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
            .map(|param| param.value.as_str())
    }
}

/// Value stored under one field name of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Entries(Vec<Entry>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// A field holding exactly one text entry.
    pub fn single(value: impl Into<String>) -> Self {
        FieldValue::Entries(vec![Entry::text(value)])
    }

    pub fn entries(&self) -> &[Entry] {
        match self {
            FieldValue::Text(_) => &[],
            FieldValue::Entries(entries) => entries,
        }
    }

    /// Raw text of the first entry, blank values included.
    pub fn first_raw(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::Entries(entries) => entries.first().map(|entry| entry.value.first_text()),
        }
    }

    /// Comparable form: the first entry's first text, absent when blank.
    pub fn first_value(&self) -> Option<&str> {
        self.first_raw().and_then(non_blank)
    }

    /// Non-blank sub-parts of the first entry.
    pub fn components(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(value) => non_blank(value).into_iter().collect(),
            FieldValue::Entries(entries) => entries
                .first()
                .map(|entry| entry.value.components())
                .unwrap_or_default(),
        }
    }

    /// Display form: every entry flattened and joined with `", "`.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::Entries(entries) => entries
                .iter()
                .map(|entry| entry.value.display())
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::Entries(entries) => entries.iter().all(|entry| entry.value.is_blank()),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Entry, FieldValue};

    fn address() -> FieldValue {
        FieldValue::Entries(vec![
            Entry::composite(["", "", "1 Main St", "Springfield", "IL", "62701", "USA"])
                .with_param("TYPE", "home"),
            Entry::composite(["", "Suite 4", "9 Elm Rd", "Shelbyville", "", "", ""]),
        ])
    }

    #[test]
    fn first_value_uses_first_entry() {
        let value = FieldValue::Entries(vec![Entry::text("555-0101"), Entry::text("555-0202")]);
        assert_eq!(value.first_value(), Some("555-0101"));
        assert_eq!(FieldValue::text("4.0").first_value(), Some("4.0"));
    }

    #[test]
    fn first_value_absent_when_blank() {
        assert_eq!(FieldValue::single("  ").first_value(), None);
        assert_eq!(FieldValue::Entries(Vec::new()).first_value(), None);
        assert_eq!(FieldValue::single("  ").first_raw(), Some("  "));
    }

    #[test]
    fn composite_first_value_skips_leading_empty_parts() {
        let name = FieldValue::Entries(vec![Entry::composite(["", "John", "", "", ""])]);
        assert_eq!(name.first_value(), Some("John"));
        assert_eq!(address().first_value(), Some("1 Main St"));
        let blank = FieldValue::Entries(vec![Entry::composite(["", ""])]);
        assert_eq!(blank.first_raw(), Some(""));
    }

    #[test]
    fn components_skip_empty_parts() {
        assert_eq!(
            address().components(),
            vec!["1 Main St", "Springfield", "IL", "62701", "USA"]
        );
    }

    #[test]
    fn display_flattens_all_entries() {
        assert_eq!(
            address().display(),
            "1 Main St, Springfield, IL, 62701, USA, Suite 4, 9 Elm Rd, Shelbyville"
        );
        let emails = FieldValue::Entries(vec![Entry::text("a@x.com"), Entry::text("b@x.com")]);
        assert_eq!(emails.display(), "a@x.com, b@x.com");
    }

    #[test]
    fn is_empty_covers_blank_shapes() {
        assert!(FieldValue::text("").is_empty());
        assert!(FieldValue::Entries(Vec::new()).is_empty());
        assert!(FieldValue::Entries(vec![Entry::composite(["", " "])]).is_empty());
        assert!(!address().is_empty());
    }

    #[test]
    fn param_lookup_ignores_case() {
        let entry = Entry::text("555").with_param("TYPE", "cell");
        assert_eq!(entry.param("type"), Some("cell"));
        assert_eq!(entry.param("PREF"), None);
    }
}
