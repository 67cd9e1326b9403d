use crate::error::CoreError;

pub const BEGIN_FIELD: &str = "BEGIN";
pub const END_FIELD: &str = "END";
pub const VERSION_FIELD: &str = "VERSION";

/// Record markers that are always mapped onto themselves.
pub const STRUCTURAL_FIELDS: [&str; 3] = [BEGIN_FIELD, END_FIELD, VERSION_FIELD];

pub const NAME_FIELD: &str = "FN";
pub const PHONE_FIELD: &str = "TEL";
pub const EMAIL_FIELD: &str = "EMAIL";
pub const ADDRESS_FIELD: &str = "ADR";

pub fn is_structural_field(name: &str) -> bool {
    let trimmed = name.trim();
    STRUCTURAL_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(trimmed))
}

/// Property names are case-insensitive; the canonical form is upper case.
pub fn normalize_field_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidFieldName(raw.to_string()));
    }
    if trimmed
        .chars()
        .any(|ch| ch.is_whitespace() || matches!(ch, ':' | ';' | '='))
    {
        return Err(CoreError::InvalidFieldName(raw.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}
