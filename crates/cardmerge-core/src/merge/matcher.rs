use crate::domain::{normalize_phone, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchReason {
    Name,
    Phone,
}

impl MatchReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchReason::Name => "name",
            MatchReason::Phone => "phone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(MatchReason::Name),
            "phone" => Some(MatchReason::Phone),
            _ => None,
        }
    }

    pub const fn all() -> &'static [MatchReason] {
        &[MatchReason::Name, MatchReason::Phone]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub index: usize,
    pub reason: MatchReason,
}

/// First candidate, in order, that is not consumed and shares a name or a phone.
pub fn find_match(
    record: &Record,
    candidates: &[Record],
    consumed: &HashSet<usize>,
) -> Option<Match> {
    candidates
        .iter()
        .enumerate()
        .filter(|(index, _)| !consumed.contains(index))
        .find_map(|(index, candidate)| {
            match_reason(record, candidate).map(|reason| Match { index, reason })
        })
}

/// Name equality wins over phone equality when both hold.
pub fn match_reason(record: &Record, candidate: &Record) -> Option<MatchReason> {
    if names_match(record, candidate) {
        return Some(MatchReason::Name);
    }
    if phones_match(record, candidate) {
        return Some(MatchReason::Phone);
    }
    None
}

fn names_match(left: &Record, right: &Record) -> bool {
    matches!((left.raw_name(), right.raw_name()), (Some(a), Some(b)) if a == b)
}

fn phones_match(left: &Record, right: &Record) -> bool {
    match (left.first_phone(), right.first_phone()) {
        (Some(a), Some(b)) => normalize_phone(a) == normalize_phone(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{find_match, match_reason, Match, MatchReason};
    use crate::domain::{FieldValue, Record};
    use std::collections::HashSet;

    fn contact(name: Option<&str>, phone: Option<&str>) -> Record {
        let mut record = Record::new();
        if let Some(name) = name {
            record.insert("FN", FieldValue::single(name));
        }
        if let Some(phone) = phone {
            record.insert("TEL", FieldValue::single(phone));
        }
        record
    }

    #[test]
    fn first_fit_prefers_earliest_candidate() {
        let alice = contact(Some("Alice"), None);
        let candidates = vec![alice.clone(), alice.clone()];
        let found = find_match(&alice, &candidates, &HashSet::new());
        assert_eq!(
            found,
            Some(Match {
                index: 0,
                reason: MatchReason::Name
            })
        );
    }

    #[test]
    fn consumed_candidates_are_skipped() {
        let alice = contact(Some("Alice"), None);
        let candidates = vec![alice.clone(), alice.clone()];
        let consumed = HashSet::from([0]);
        assert_eq!(find_match(&alice, &candidates, &consumed).map(|m| m.index), Some(1));

        let consumed = HashSet::from([0, 1]);
        assert!(find_match(&alice, &candidates, &consumed).is_none());
    }

    #[test]
    fn phone_match_ignores_formatting_and_names() {
        let bob = contact(Some("Bob"), Some("555-1234"));
        let robert = contact(Some("Robert"), Some("(555) 1234"));
        assert_eq!(match_reason(&bob, &robert), Some(MatchReason::Phone));
    }

    #[test]
    fn name_reason_wins_when_both_signals_fire() {
        let left = contact(Some("Bob"), Some("555-1234"));
        let right = contact(Some("Bob"), Some("555 1234"));
        assert_eq!(match_reason(&left, &right), Some(MatchReason::Name));
    }

    #[test]
    fn later_phone_match_beats_nothing() {
        let bob = contact(Some("Bob"), Some("555-1234"));
        let candidates = vec![
            contact(Some("Carol"), Some("555-9999")),
            contact(Some("Robert"), Some("5551234")),
        ];
        let found = find_match(&bob, &candidates, &HashSet::new()).expect("match");
        assert_eq!(found.index, 1);
        assert_eq!(found.reason, MatchReason::Phone);
    }

    #[test]
    fn records_without_signals_never_match() {
        let empty = contact(None, None);
        let candidates = vec![empty.clone(), contact(Some("Dave"), Some("1"))];
        assert!(find_match(&empty, &candidates, &HashSet::new()).is_none());
    }

    #[test]
    fn phone_only_on_one_side_is_not_a_match() {
        let left = contact(Some("Eve"), Some("555"));
        let right = contact(Some("Mallory"), None);
        assert_eq!(match_reason(&left, &right), None);
    }

    #[test]
    fn missing_names_on_both_sides_do_not_match() {
        let left = contact(None, Some("111"));
        let right = contact(None, Some("222"));
        assert_eq!(match_reason(&left, &right), None);
    }

    #[test]
    fn blank_names_compare_exactly() {
        let blank = contact(Some(""), None);
        assert_eq!(match_reason(&blank, &blank.clone()), Some(MatchReason::Name));

        let alice = contact(Some("Alice"), None);
        let padded = contact(Some("Alice "), None);
        assert_eq!(match_reason(&alice, &padded), None);
    }

    #[test]
    fn phones_without_digits_match_each_other() {
        let left = contact(Some("Eve"), Some("ext"));
        let right = contact(Some("Mallory"), Some("n/a"));
        assert_eq!(match_reason(&left, &right), Some(MatchReason::Phone));
    }

    #[test]
    fn reason_labels_round_trip() {
        for reason in MatchReason::all() {
            assert_eq!(MatchReason::parse(reason.as_str()), Some(*reason));
        }
        assert!(MatchReason::parse("email").is_none());
    }
}
