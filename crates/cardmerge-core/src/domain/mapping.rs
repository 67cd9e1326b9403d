use crate::domain::fields::{is_structural_field, normalize_field_name, STRUCTURAL_FIELDS};
use crate::domain::record::RecordSet;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Field in the primary set's vocabulary -> field in the partner set's vocabulary.
///
/// Structural fields are never stored here; they are always mapped onto
/// themselves and surface only through [`FieldMapping::effective_entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct FieldMapping {
    entries: BTreeMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity mappings for every field name present in both vocabularies.
    pub fn suggest(primary: &BTreeSet<String>, partner: &BTreeSet<String>) -> Self {
        let entries = primary
            .intersection(partner)
            .filter(|field| !is_structural_field(field))
            .map(|field| (field.clone(), field.clone()))
            .collect();
        Self { entries }
    }

    pub fn suggested_for(primary: &RecordSet, partner: &RecordSet) -> Self {
        Self::suggest(&primary.vocabulary(), &partner.vocabulary())
    }

    pub fn from_pairs<I, A, B>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut mapping = Self::new();
        for (field, target) in pairs {
            mapping.set(field.as_ref(), target.as_ref())?;
        }
        Ok(mapping)
    }

    /// Maps `field` onto `target`, returning the previous target.
    pub fn set(&mut self, field: &str, target: &str) -> Result<Option<String>, CoreError> {
        let field = checked_name(field)?;
        let target = checked_name(target)?;
        Ok(self.entries.insert(field, target))
    }

    pub fn unset(&mut self, field: &str) -> Result<Option<String>, CoreError> {
        let field = checked_name(field)?;
        Ok(self.entries.remove(&field))
    }

    /// Copies every entry of `other` over this mapping.
    pub fn overlay(&mut self, other: &FieldMapping) {
        for (field, target) in &other.entries {
            self.entries.insert(field.clone(), target.clone());
        }
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.entries.retain(|field, target| keep(field, target));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// User-configurable entries only.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, target)| (field.as_str(), target.as_str()))
    }

    /// Structural identities followed by the user entries.
    pub fn effective_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        STRUCTURAL_FIELDS
            .iter()
            .map(|field| (*field, *field))
            .chain(self.entries())
    }
}

fn checked_name(raw: &str) -> Result<String, CoreError> {
    let name = normalize_field_name(raw)?;
    if is_structural_field(&name) {
        return Err(CoreError::StructuralField(name));
    }
    Ok(name)
}

impl TryFrom<BTreeMap<String, String>> for FieldMapping {
    type Error = CoreError;

    fn try_from(value: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_pairs(value)
    }
}

impl From<FieldMapping> for BTreeMap<String, String> {
    fn from(value: FieldMapping) -> Self {
        value.entries
    }
}
