use crate::error::invalid_input;
use crate::util::parse_mapping_pair;
use anyhow::{Context as _, Result};
use cardmerge_config::AppConfig;
use cardmerge_core::{CoreError, FieldMapping, MergeSession};
use cardmerge_formats::{load_record_set, FileSource};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod completions;
pub mod fields;
pub mod merge;
pub mod preview;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[derive(Debug, Args)]
pub struct MappingArgs {
    /// Map a field of the first file onto a field of the second (repeatable)
    #[arg(long = "map", value_name = "FIELD=TARGET")]
    pub map: Vec<String>,
    /// Drop a field from the mapping (repeatable)
    #[arg(long = "unmap", value_name = "FIELD")]
    pub unmap: Vec<String>,
}

/// Loads both files and prepares the mapping: config seed, then `--map`, then `--unmap`.
pub fn open_session(ctx: &Context<'_>, files: &[PathBuf], args: &MappingArgs) -> Result<MergeSession> {
    if files.len() != 2 {
        return Err(CoreError::WrongCardinality(files.len()).into());
    }

    let mut sets = Vec::with_capacity(files.len());
    for path in files {
        let loaded = load_record_set(&FileSource::new(path))
            .with_context(|| format!("load vcard file {}", path.display()))?;
        for warning in &loaded.warnings {
            warn!(source = %loaded.set.source, "{warning}");
        }
        debug!(
            source = %loaded.set.source,
            records = loaded.set.len(),
            "record set loaded"
        );
        sets.push(loaded.set);
    }

    let mut session = MergeSession::new(sets)?;
    let seeded = ctx
        .config
        .mapping
        .seed(session.primary(), session.partner());
    session.set_mapping(seeded);
    apply_mapping_args(session.mapping_mut(), args)?;
    debug!(entries = session.mapping().len(), "field mapping prepared");
    Ok(session)
}

fn apply_mapping_args(mapping: &mut FieldMapping, args: &MappingArgs) -> Result<()> {
    for raw in &args.map {
        let (field, target) = parse_mapping_pair(raw)?;
        mapping
            .set(&field, &target)
            .with_context(|| format!("map {field} -> {target}"))?;
    }
    for field in &args.unmap {
        if mapping
            .unset(field)
            .with_context(|| format!("unmap {field}"))?
            .is_none()
        {
            return Err(invalid_input(format!("field {field} is not mapped")));
        }
    }
    Ok(())
}
