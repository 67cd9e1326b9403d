use crate::domain::{FieldMapping, Record, RecordSet};
use crate::merge::matcher::{find_match, MatchReason};
use crate::merge::policy::merge_fields;
use serde::Serialize;
use std::collections::HashSet;

/// Where a merged record came from; indices point into the input sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeOrigin {
    Matched {
        primary: usize,
        partner: usize,
        reason: MatchReason,
    },
    PrimaryOnly {
        index: usize,
    },
    PartnerOnly {
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub record: Record,
    pub origin: MergeOrigin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub total: usize,
    pub matched: usize,
    pub primary_only: usize,
    pub partner_only: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub records: Vec<MergedRecord>,
    pub stats: MergeStats,
}

impl MergeReport {
    pub fn into_records(self) -> Vec<Record> {
        self.records.into_iter().map(|merged| merged.record).collect()
    }
}

/// Merges two record sets: primary records first, each overlaid with its
/// first-fit partner when one exists, then the partner records nobody claimed.
pub fn merge_with_report(
    primary: &RecordSet,
    partner: &RecordSet,
    mapping: &FieldMapping,
) -> MergeReport {
    let mut records = Vec::with_capacity(primary.len() + partner.len());
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut stats = MergeStats::default();

    for (index, record) in primary.iter().enumerate() {
        match find_match(record, &partner.records, &consumed) {
            Some(found) => {
                let merged = merge_fields(record, &partner.records[found.index], mapping);
                consumed.insert(found.index);
                stats.matched += 1;
                records.push(MergedRecord {
                    record: merged,
                    origin: MergeOrigin::Matched {
                        primary: index,
                        partner: found.index,
                        reason: found.reason,
                    },
                });
            }
            None => {
                stats.primary_only += 1;
                records.push(MergedRecord {
                    record: record.clone(),
                    origin: MergeOrigin::PrimaryOnly { index },
                });
            }
        }
    }

    for (index, record) in partner.iter().enumerate() {
        if consumed.contains(&index) {
            continue;
        }
        stats.partner_only += 1;
        records.push(MergedRecord {
            record: record.clone(),
            origin: MergeOrigin::PartnerOnly { index },
        });
    }

    stats.total = records.len();
    MergeReport { records, stats }
}

pub fn merge(primary: &RecordSet, partner: &RecordSet, mapping: &FieldMapping) -> Vec<Record> {
    merge_with_report(primary, partner, mapping).into_records()
}
