pub mod csv;
pub mod error;
pub mod export;
pub mod source;
pub mod vcf;

pub use error::{FormatError, Result};
pub use export::{export, ExportFormat, ExportOptions, LineEnding};
pub use source::{load_record_set, FileSource, LoadedSet, VcfSource};
