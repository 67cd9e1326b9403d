pub mod matcher;
pub mod orchestrator;
pub mod policy;

pub use matcher::{find_match, match_reason, Match, MatchReason};
pub use orchestrator::{merge, merge_with_report, MergeOrigin, MergeReport, MergeStats, MergedRecord};
pub use policy::merge_fields;
