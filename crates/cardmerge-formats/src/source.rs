use crate::error::{FormatError, Result};
use crate::vcf;
use cardmerge_core::RecordSet;
use std::fs;
use std::path::PathBuf;

pub trait VcfSource {
    fn source_name(&self) -> String;
    fn fetch_vcf(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VcfSource for FileSource {
    fn source_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn fetch_vcf(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| FormatError::Read {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSet {
    pub set: RecordSet,
    pub warnings: Vec<String>,
}

pub fn load_record_set(source: &dyn VcfSource) -> Result<LoadedSet> {
    let name = source.source_name();
    let data = source.fetch_vcf()?;
    let parsed = vcf::parse_vcf(&data)
        .map_err(|err| match err {
            FormatError::Parse(message) => FormatError::Parse(format!("{name}: {message}")),
            other => other,
        })?;
    Ok(LoadedSet {
        set: RecordSet::new(name, parsed.records),
        warnings: parsed.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::{load_record_set, FileSource, VcfSource};
    use crate::error::FormatError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_source_labels_set_with_file_name() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("work.vcf");
        fs::write(&path, "BEGIN:VCARD\nVERSION:4.0\nFN:Ada\nEND:VCARD\n").expect("write");

        let loaded = load_record_set(&FileSource::new(&path)).expect("load");
        assert_eq!(loaded.set.source, "work.vcf");
        assert_eq!(loaded.set.len(), 1);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let temp = TempDir::new().expect("tempdir");
        let source = FileSource::new(temp.path().join("missing.vcf"));
        assert_eq!(source.source_name(), "missing.vcf");
        let err = load_record_set(&source).unwrap_err();
        assert!(matches!(err, FormatError::Read { .. }));
        assert!(err.to_string().contains("missing.vcf"));
    }

    #[test]
    fn parse_errors_name_the_source() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("notes.txt");
        fs::write(&path, "just some text\n").expect("write");
        let err = load_record_set(&FileSource::new(&path)).unwrap_err();
        assert!(err.to_string().contains("notes.txt"));
    }
}
