use crate::error::{FormatError, Result};
use crate::export::ExportOptions;
use cardmerge_core::domain::{
    is_structural_field, Entry, EntryValue, FieldValue, Param, Record, VERSION_FIELD,
};
use std::collections::BTreeMap;

pub const EXPORT_VERSION: &str = "4.0";

/// Properties whose values are `;`-separated component lists.
const COMPOSITE_FIELDS: [&str; 4] = ["N", "ADR", "ORG", "GENDER"];

#[derive(Debug, Clone)]
pub struct ParsedVcf {
    pub records: Vec<Record>,
    pub warnings: Vec<String>,
}

pub fn parse_vcf(data: &str) -> Result<ParsedVcf> {
    let mut warnings = Vec::new();
    let mut records = Vec::new();
    let mut cards_seen = 0usize;

    let mut current: Option<RawCard> = None;
    for line in unfold_lines(data) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("BEGIN:VCARD") {
            if let Some(card) = current.take() {
                warnings.push("nested BEGIN:VCARD encountered; closing previous card".to_string());
                records.push(card.into_record());
            }
            current = Some(RawCard::default());
            cards_seen += 1;
            continue;
        }

        if trimmed.eq_ignore_ascii_case("END:VCARD") {
            match current.take() {
                Some(card) => records.push(card.into_record()),
                None => warnings.push("END:VCARD without matching BEGIN:VCARD".to_string()),
            }
            continue;
        }

        let Some(card) = current.as_mut() else {
            continue;
        };

        let Some(property) = split_property(trimmed) else {
            warnings.push(format!("malformed property line skipped: {trimmed}"));
            continue;
        };

        if property.name == "BEGIN" || property.name == "END" {
            warnings.push(format!("unexpected {} marker skipped", property.name));
            continue;
        }

        card.push(property);
    }

    if let Some(card) = current.take() {
        warnings.push("missing END:VCARD at end of file".to_string());
        records.push(card.into_record());
    }

    if cards_seen == 0 && !data.trim().is_empty() {
        return Err(FormatError::Parse("no vCard entries found".to_string()));
    }

    Ok(ParsedVcf { records, warnings })
}

pub fn export_vcf(records: &[Record], options: &ExportOptions) -> String {
    let eol = options.line_ending.as_str();
    let mut out = String::new();
    for record in records {
        out.push_str("BEGIN:VCARD");
        out.push_str(eol);
        out.push_str(&format!("{VERSION_FIELD}:{EXPORT_VERSION}"));
        out.push_str(eol);

        for (name, value) in record.iter() {
            if is_structural_field(name) {
                continue;
            }
            match value {
                FieldValue::Text(text) => {
                    out.push_str(&format!("{name}:{}", escape_vcard_value(text)));
                    out.push_str(eol);
                }
                FieldValue::Entries(entries) => {
                    for entry in entries {
                        out.push_str(&format_entry(name, entry));
                        out.push_str(eol);
                    }
                }
            }
        }

        out.push_str("END:VCARD");
        out.push_str(eol);
    }
    out
}

fn format_entry(name: &str, entry: &Entry) -> String {
    let mut line = String::from(name);
    for param in &entry.params {
        line.push(';');
        line.push_str(&param.name);
        line.push('=');
        if param.value.contains(|ch: char| matches!(ch, ':' | ';')) {
            line.push('"');
            line.push_str(&param.value.replace('"', "'"));
            line.push('"');
        } else {
            line.push_str(&param.value);
        }
    }
    line.push(':');
    match &entry.value {
        EntryValue::Text(text) => line.push_str(&escape_vcard_value(text)),
        EntryValue::Composite(parts) => {
            let escaped: Vec<String> = parts.iter().map(|part| escape_vcard_value(part)).collect();
            line.push_str(&escaped.join(";"));
        }
    }
    line
}

#[derive(Debug)]
struct Property {
    name: String,
    params: Vec<Param>,
    value: String,
}

#[derive(Default)]
struct RawCard {
    version: Option<String>,
    fields: BTreeMap<String, Vec<Entry>>,
}

impl RawCard {
    fn push(&mut self, property: Property) {
        if property.name == VERSION_FIELD {
            self.version = Some(unescape_vcard_value(&property.value).trim().to_string());
            return;
        }

        let value = if COMPOSITE_FIELDS.contains(&property.name.as_str()) {
            EntryValue::Composite(
                split_escaped(&property.value, ';')
                    .iter()
                    .map(|part| unescape_vcard_value(part))
                    .collect(),
            )
        } else {
            EntryValue::Text(unescape_vcard_value(&property.value))
        };

        self.fields.entry(property.name).or_default().push(Entry {
            params: property.params,
            value,
        });
    }

    fn into_record(self) -> Record {
        let mut record: Record = self
            .fields
            .into_iter()
            .map(|(name, entries)| (name, FieldValue::Entries(entries)))
            .collect();
        if let Some(version) = self.version {
            record.insert(VERSION_FIELD, FieldValue::Text(version));
        }
        record
    }
}

/// Splits on CRLF, LF or bare CR and joins continuation lines onto their predecessor.
fn unfold_lines(input: &str) -> Vec<String> {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .split('\n')
        .fold(Vec::new(), |mut lines: Vec<String>, line| {
            let continuation = line.strip_prefix(|ch: char| ch == ' ' || ch == '\t');
            match (continuation, lines.last_mut()) {
                (Some(rest), Some(last)) => last.push_str(rest),
                (Some(rest), None) => lines.push(rest.to_string()),
                (None, _) => lines.push(line.to_string()),
            }
            lines
        })
}

/// `[group.]NAME[;PARAM...]:value`, honouring quoted parameter values.
fn split_property(line: &str) -> Option<Property> {
    let mut in_quotes = false;
    let mut split_at = None;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                split_at = Some(index);
                break;
            }
            _ => {}
        }
    }
    let split_at = split_at?;
    let (left, value) = (&line[..split_at], &line[split_at + 1..]);

    let mut segments = split_params(left).into_iter();
    let raw_name = segments.next()?;
    let mut name = raw_name.trim();
    if let Some((_, ungrouped)) = name.rsplit_once('.') {
        name = ungrouped;
    }
    if name.is_empty() {
        return None;
    }

    let params = segments
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => Param::new(
                key.trim().to_ascii_uppercase(),
                value.trim().trim_matches('"'),
            ),
            None => Param::new("TYPE", segment.trim()),
        })
        .collect();

    Some(Property {
        name: name.to_ascii_uppercase(),
        params,
        value: value.to_string(),
    })
}

fn split_params(left: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (index, ch) in left.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&left[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(&left[start..]);
    segments
}

/// Splits on `separator` unless it is backslash-escaped; escapes stay in the parts.
fn split_escaped(value: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, ch) in value.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == separator {
            parts.push(value[start..index].to_string());
            start = index + ch.len_utf8();
        }
    }
    parts.push(value[start..].to_string());
    parts
}

fn escape_vcard_value(value: &str) -> String {
    value
        .chars()
        .fold(String::with_capacity(value.len()), |mut out, ch| {
            match ch {
                '\\' | ';' | ',' => {
                    out.push('\\');
                    out.push(ch);
                }
                '\n' | '\r' => out.push_str("\\n"),
                _ => out.push(ch),
            }
            out
        })
}

fn unescape_vcard_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for ch in value.chars() {
        if escaped {
            out.push(if ch.eq_ignore_ascii_case(&'n') { '\n' } else { ch });
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            out.push(ch);
        }
    }
    out
}
