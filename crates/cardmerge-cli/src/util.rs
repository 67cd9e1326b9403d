use crate::error::invalid_input;
use anyhow::Result;

/// `FIELD=TARGET` as given to `--map`.
pub fn parse_mapping_pair(raw: &str) -> Result<(String, String)> {
    let Some((field, target)) = raw.split_once('=') else {
        return Err(invalid_input(format!(
            "invalid mapping {raw:?}: expected FIELD=TARGET"
        )));
    };
    if field.trim().is_empty() || target.trim().is_empty() {
        return Err(invalid_input(format!(
            "invalid mapping {raw:?}: field names cannot be empty"
        )));
    }
    Ok((field.trim().to_string(), target.trim().to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub index: usize,
    pub field: String,
    pub value: String,
}

/// `INDEX:FIELD=VALUE` as given to `--edit`. The value may contain `=` and `:`.
pub fn parse_field_edit(raw: &str) -> Result<FieldEdit> {
    let invalid = || invalid_input(format!("invalid edit {raw:?}: expected INDEX:FIELD=VALUE"));
    let (index, rest) = raw.split_once(':').ok_or_else(invalid)?;
    let (field, value) = rest.split_once('=').ok_or_else(invalid)?;
    let index = index.trim().parse::<usize>().map_err(|_| invalid())?;
    if field.trim().is_empty() {
        return Err(invalid());
    }
    Ok(FieldEdit {
        index,
        field: field.trim().to_string(),
        value: value.to_string(),
    })
}

pub fn join_or_dash<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::{join_or_dash, parse_field_edit, parse_mapping_pair, FieldEdit};

    #[test]
    fn parse_mapping_pair_trims_names() {
        let (field, target) = parse_mapping_pair(" NOTE = X-NOTES ").expect("pair");
        assert_eq!(field, "NOTE");
        assert_eq!(target, "X-NOTES");
    }

    #[test]
    fn parse_mapping_pair_rejects_missing_parts() {
        assert!(parse_mapping_pair("NOTE").is_err());
        assert!(parse_mapping_pair("=NOTE").is_err());
        assert!(parse_mapping_pair("NOTE=").is_err());
    }

    #[test]
    fn parse_field_edit_keeps_value_verbatim() {
        let edit = parse_field_edit("2:NOTE=call at 10:30 = late").expect("edit");
        assert_eq!(
            edit,
            FieldEdit {
                index: 2,
                field: "NOTE".to_string(),
                value: "call at 10:30 = late".to_string(),
            }
        );
    }

    #[test]
    fn parse_field_edit_rejects_bad_index() {
        assert!(parse_field_edit("x:NOTE=a").is_err());
        assert!(parse_field_edit("1:=a").is_err());
        assert!(parse_field_edit("1:NOTE").is_err());
    }

    #[test]
    fn join_or_dash_handles_empty() {
        assert_eq!(join_or_dash(Vec::<&str>::new()), "-");
        assert_eq!(join_or_dash(["FN", "TEL"]), "FN, TEL");
    }
}
