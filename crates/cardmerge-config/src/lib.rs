use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cardmerge_core::{normalize_field_name, CoreError, FieldMapping, RecordSet};
use cardmerge_formats::{ExportFormat, ExportOptions, LineEnding};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "cardmerge";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_HIDDEN_FIELDS: [&str; 1] = ["CATEGORIES"];

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub mapping: MappingConfig,
    pub export: ExportConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// Seed the mapping with identity suggestions before applying overrides.
    pub suggest: bool,
    pub overrides: FieldMapping,
    pub ignore: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub line_ending: LineEnding,
}

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub hidden_fields: BTreeSet<String>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            suggest: true,
            overrides: FieldMapping::new(),
            ignore: BTreeSet::new(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            hidden_fields: DEFAULT_HIDDEN_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
        }
    }
}

impl MappingConfig {
    /// Starting mapping for a pair of sets: suggestion, then overrides, minus ignored fields.
    pub fn seed(&self, primary: &RecordSet, partner: &RecordSet) -> FieldMapping {
        let mut mapping = if self.suggest {
            FieldMapping::suggested_for(primary, partner)
        } else {
            FieldMapping::new()
        };
        mapping.overlay(&self.overrides);
        mapping.retain(|field, _| !self.ignore.contains(field));
        mapping
    }
}

impl ExportConfig {
    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            line_ending: self.line_ending,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid mapping entry {field:?}: {source}")]
    InvalidMapping {
        field: String,
        #[source]
        source: CoreError,
    },
    #[error("invalid preview field {field:?}: {source}")]
    InvalidPreviewField {
        field: String,
        #[source]
        source: CoreError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    mapping: Option<MappingFile>,
    export: Option<ExportFile>,
    preview: Option<PreviewFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingFile {
    suggest: Option<bool>,
    overrides: Option<BTreeMap<String, String>>,
    ignore: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportFile {
    format: Option<ExportFormat>,
    line_ending: Option<LineEnding>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PreviewFile {
    hidden_fields: Option<Vec<String>>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(mapping) = parsed.mapping {
        if let Some(suggest) = mapping.suggest {
            config.mapping.suggest = suggest;
        }
        if let Some(overrides) = mapping.overrides {
            for (field, target) in overrides {
                config
                    .mapping
                    .overrides
                    .set(&field, &target)
                    .map_err(|source| ConfigError::InvalidMapping { field, source })?;
            }
        }
        if let Some(ignore) = mapping.ignore {
            for field in ignore {
                let name = normalize_field_name(&field)
                    .map_err(|source| ConfigError::InvalidMapping { field, source })?;
                config.mapping.ignore.insert(name);
            }
        }
    }

    if let Some(export) = parsed.export {
        if let Some(format) = export.format {
            config.export.format = format;
        }
        if let Some(line_ending) = export.line_ending {
            config.export.line_ending = line_ending;
        }
    }

    if let Some(preview) = parsed.preview {
        if let Some(hidden) = preview.hidden_fields {
            let mut fields = BTreeSet::new();
            for field in hidden {
                let name = normalize_field_name(&field)
                    .map_err(|source| ConfigError::InvalidPreviewField { field, source })?;
                fields.insert(name);
            }
            config.preview.hidden_fields = fields;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, resolve_config_path, ConfigError, ConfigFile, ExportFile,
        MappingFile, PreviewFile,
    };
    use cardmerge_core::{CoreError, FieldValue, Record, RecordSet};
    use cardmerge_formats::{ExportFormat, LineEnding};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn set(fields: &[&str]) -> RecordSet {
        let record = fields.iter().fold(Record::new(), |record, field| {
            record.with(*field, FieldValue::single("x"))
        });
        RecordSet::new("set", vec![record])
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            mapping: Some(MappingFile {
                suggest: Some(false),
                overrides: Some(BTreeMap::from([("note".to_string(), "x-notes".to_string())])),
                ignore: Some(vec!["photo".to_string()]),
            }),
            export: Some(ExportFile {
                format: Some(ExportFormat::Csv),
                line_ending: Some(LineEnding::Lf),
            }),
            preview: Some(PreviewFile {
                hidden_fields: Some(vec!["uid".to_string()]),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert!(!merged.mapping.suggest);
        assert_eq!(merged.mapping.overrides.get("NOTE"), Some("X-NOTES"));
        assert!(merged.mapping.ignore.contains("PHOTO"));
        assert_eq!(merged.export.format, ExportFormat::Csv);
        assert_eq!(merged.export.line_ending, LineEnding::Lf);
        assert!(merged.preview.hidden_fields.contains("UID"));
        assert!(!merged.preview.hidden_fields.contains("CATEGORIES"));
    }

    #[test]
    fn merge_config_rejects_structural_override() {
        let parsed = ConfigFile {
            mapping: Some(MappingFile {
                overrides: Some(BTreeMap::from([("VERSION".to_string(), "FN".to_string())])),
                ..MappingFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidMapping {
                source: CoreError::StructuralField(_),
                ..
            }
        ));
    }

    #[test]
    fn seed_combines_suggestion_overrides_and_ignores() {
        let parsed = ConfigFile {
            mapping: Some(MappingFile {
                overrides: Some(BTreeMap::from([("NOTE".to_string(), "X-NOTES".to_string())])),
                ignore: Some(vec!["TEL".to_string()]),
                ..MappingFile::default()
            }),
            ..ConfigFile::default()
        };
        let config = merge_config(parsed).expect("merge");
        let mapping = config
            .mapping
            .seed(&set(&["FN", "TEL", "NOTE"]), &set(&["FN", "TEL", "X-NOTES"]));
        let entries: Vec<(&str, &str)> = mapping.entries().collect();
        assert_eq!(entries, vec![("FN", "FN"), ("NOTE", "X-NOTES")]);
    }

    #[test]
    fn resolve_config_path_rejects_empty_custom_path() {
        let err = resolve_config_path(Some(PathBuf::new())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfigPath(_)));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[mapping]\noverrides = { NOTE = \"X-NOTES\" }\n[export]\nformat = \"csv\"\nline_ending = \"lf\"\n",
        )
        .expect("write config");

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert!(config.mapping.suggest);
        assert_eq!(config.mapping.overrides.get("NOTE"), Some("X-NOTES"));
        assert_eq!(config.export.format, ExportFormat::Csv);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[export]\nformat = \"csv\"\ncolour = true\n").expect("write config");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
