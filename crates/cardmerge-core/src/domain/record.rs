use crate::domain::fields::{is_structural_field, NAME_FIELD, PHONE_FIELD};
use crate::domain::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One contact: field name to value. Field order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn first_value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::first_value)
    }

    pub fn name(&self) -> Option<&str> {
        self.first_value(NAME_FIELD)
    }

    /// Raw first name entry, blank included; absent only without a name entry.
    pub fn raw_name(&self) -> Option<&str> {
        self.get(NAME_FIELD).and_then(FieldValue::first_raw)
    }

    /// Raw first phone entry; present whenever the record carries a phone entry at all.
    pub fn first_phone(&self) -> Option<&str> {
        self.get(PHONE_FIELD).and_then(FieldValue::first_raw)
    }

    pub fn with(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.insert(field, value);
        self
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Records read from one source, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    pub source: String,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new(source: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Every non-structural field name used by any record, sorted.
    pub fn vocabulary(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(Record::field_names)
            .filter(|name| !is_structural_field(name))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordSet};
    use crate::domain::value::{Entry, FieldValue};

    #[test]
    fn name_and_phone_accessors() {
        let record = Record::new()
            .with("FN", FieldValue::single("Ada Lovelace"))
            .with(
                "TEL",
                FieldValue::Entries(vec![Entry::text("555-0101"), Entry::text("555-0202")]),
            );
        assert_eq!(record.name(), Some("Ada Lovelace"));
        assert_eq!(record.first_phone(), Some("555-0101"));
    }

    #[test]
    fn blank_name_is_hidden_from_display_but_kept_raw() {
        let record = Record::new().with("FN", FieldValue::single(""));
        assert_eq!(record.name(), None);
        assert_eq!(record.raw_name(), Some(""));
        assert_eq!(Record::new().raw_name(), None);
        let no_entries = Record::new().with("FN", FieldValue::Entries(Vec::new()));
        assert_eq!(no_entries.raw_name(), None);
    }

    #[test]
    fn vocabulary_excludes_structural_fields() {
        let set = RecordSet::new(
            "a.vcf",
            vec![
                Record::new()
                    .with("VERSION", FieldValue::text("4.0"))
                    .with("FN", FieldValue::single("Ada"))
                    .with("NOTE", FieldValue::single("x")),
                Record::new()
                    .with("FN", FieldValue::single("Grace"))
                    .with("TEL", FieldValue::single("1")),
            ],
        );
        let vocabulary: Vec<String> = set.vocabulary().into_iter().collect();
        assert_eq!(vocabulary, vec!["FN", "NOTE", "TEL"]);
    }
}
