use crate::domain::{FieldMapping, Record};

/// Copies `primary` and overlays each mapped field from `partner` when the
/// partner's value is non-empty. Structural fields always map onto themselves.
pub fn merge_fields(primary: &Record, partner: &Record, mapping: &FieldMapping) -> Record {
    let mut merged = primary.clone();
    for (field, target) in mapping.effective_entries() {
        if let Some(value) = partner.get(target).filter(|value| !value.is_empty()) {
            merged.insert(field, value.clone());
        }
    }
    merged
}
