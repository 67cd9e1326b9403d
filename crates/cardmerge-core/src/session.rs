use crate::domain::{is_structural_field, normalize_field_name, FieldMapping, FieldValue, Record, RecordSet};
use crate::error::{CoreError, Result};
use crate::merge::{merge_with_report, MergeStats, MergedRecord};
use std::collections::BTreeSet;

/// Everything a front end tracks between loading two sets and exporting:
/// the mapping being edited, the last merge result and the export selection.
#[derive(Debug, Clone)]
pub struct MergeSession {
    primary: RecordSet,
    partner: RecordSet,
    mapping: FieldMapping,
    merged: Vec<MergedRecord>,
    selected: BTreeSet<usize>,
    stats: Option<MergeStats>,
}

impl MergeSession {
    /// Starts a session over exactly two record sets, seeded with the suggested mapping.
    pub fn new(sets: Vec<RecordSet>) -> Result<Self> {
        let (primary, partner) = into_pair(sets)?;
        let mapping = FieldMapping::suggested_for(&primary, &partner);
        Ok(Self {
            primary,
            partner,
            mapping,
            merged: Vec::new(),
            selected: BTreeSet::new(),
            stats: None,
        })
    }

    /// Replaces both sets; the mapping is re-suggested and prior results are dropped.
    pub fn load(&mut self, sets: Vec<RecordSet>) -> Result<()> {
        *self = Self::new(sets)?;
        Ok(())
    }

    pub fn primary(&self) -> &RecordSet {
        &self.primary
    }

    pub fn partner(&self) -> &RecordSet {
        &self.partner
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut FieldMapping {
        &mut self.mapping
    }

    pub fn set_mapping(&mut self, mapping: FieldMapping) {
        self.mapping = mapping;
    }

    /// Runs the merge with the current mapping and selects every result.
    pub fn merge(&mut self) -> MergeStats {
        let report = merge_with_report(&self.primary, &self.partner, &self.mapping);
        self.selected = (0..report.records.len()).collect();
        self.merged = report.records;
        self.stats = Some(report.stats);
        report.stats
    }

    pub fn merged(&self) -> &[MergedRecord] {
        &self.merged
    }

    pub fn stats(&self) -> Option<MergeStats> {
        self.stats
    }

    pub fn clear_results(&mut self) {
        self.merged.clear();
        self.selected.clear();
        self.stats = None;
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<()> {
        self.check_index(index)?;
        if selected {
            self.selected.insert(index);
        } else {
            self.selected.remove(&index);
        }
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.merged.len()).collect();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Replaces one field of a merged record with a single text entry.
    pub fn edit_field(&mut self, index: usize, field: &str, value: &str) -> Result<()> {
        self.check_index(index)?;
        let field = normalize_field_name(field)?;
        if is_structural_field(&field) {
            return Err(CoreError::StructuralField(field));
        }
        self.merged[index]
            .record
            .insert(field, FieldValue::single(value));
        Ok(())
    }

    pub fn selected_records(&self) -> Vec<Record> {
        self.selected
            .iter()
            .filter_map(|index| self.merged.get(*index))
            .map(|merged| merged.record.clone())
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.merged.len() {
            return Err(CoreError::RecordOutOfRange(index));
        }
        Ok(())
    }
}

fn into_pair(sets: Vec<RecordSet>) -> Result<(RecordSet, RecordSet)> {
    let count = sets.len();
    let mut iter = sets.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(primary), Some(partner), None) => Ok((primary, partner)),
        _ => Err(CoreError::WrongCardinality(count)),
    }
}
