use crate::export::ExportOptions;
use cardmerge_core::domain::{Record, ADDRESS_FIELD, EMAIL_FIELD, NAME_FIELD, PHONE_FIELD};

pub const CSV_HEADER: &str = "Name,Email,Phone,Address";

/// One quoted row per record under a fixed `Name,Email,Phone,Address` header.
pub fn export_csv(records: &[Record], options: &ExportOptions) -> String {
    let eol = options.line_ending.as_str();
    let mut out = String::from(CSV_HEADER);
    out.push_str(eol);
    for record in records {
        let address = record
            .get(ADDRESS_FIELD)
            .map(|value| value.components().join(", "))
            .unwrap_or_default();
        let row = [
            record.first_value(NAME_FIELD).unwrap_or_default(),
            record.first_value(EMAIL_FIELD).unwrap_or_default(),
            record.first_value(PHONE_FIELD).unwrap_or_default(),
            address.as_str(),
        ]
        .iter()
        .map(|cell| quote(cell))
        .collect::<Vec<_>>()
        .join(",");
        out.push_str(&row);
        out.push_str(eol);
    }
    out
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
