use crate::commands::{open_session, print_json, Context, MappingArgs};
use crate::error::invalid_input;
use crate::util::parse_field_edit;
use anyhow::{Context as _, Result};
use cardmerge_core::MergeStats;
use cardmerge_formats::{export, ExportFormat};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// The two vCard files, primary first
    #[arg(required = true, num_args = 1.., value_name = "FILE")]
    pub files: Vec<PathBuf>,
    #[command(flatten)]
    pub mapping: MappingArgs,
    /// Output format (defaults to the configured format)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Write the export to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Leave a merged record out of the export (repeatable)
    #[arg(long = "exclude", value_name = "INDEX")]
    pub exclude: Vec<usize>,
    /// Overwrite one field of a merged record (repeatable)
    #[arg(long = "edit", value_name = "INDEX:FIELD=VALUE")]
    pub edit: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Vcard,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Vcard => ExportFormat::Vcard,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Debug, Serialize)]
struct MergeSummary {
    format: String,
    output: Option<String>,
    exported: usize,
    stats: MergeStats,
}

pub fn merge_files(ctx: &Context<'_>, args: MergeArgs) -> Result<()> {
    if ctx.json && args.out.is_none() {
        return Err(invalid_input("--json requires --out for merge"));
    }

    let mut session = open_session(ctx, &args.files, &args.mapping)?;
    let stats = session.merge();
    info!(
        total = stats.total,
        matched = stats.matched,
        "merge finished"
    );

    for raw in &args.edit {
        let edit = parse_field_edit(raw)?;
        session
            .edit_field(edit.index, &edit.field, &edit.value)
            .with_context(|| format!("edit record {}", edit.index))?;
    }
    for index in &args.exclude {
        session
            .set_selected(*index, false)
            .with_context(|| format!("exclude record {index}"))?;
    }

    let format = args
        .format
        .map(ExportFormat::from)
        .unwrap_or(ctx.config.export.format);
    let records = session.selected_records();
    debug!(
        format = format.as_str(),
        selected = records.len(),
        "exporting merged records"
    );
    let data = export(format, &records, &ctx.config.export.options());

    let summary = MergeSummary {
        format: format.as_str().to_string(),
        output: args.out.as_ref().map(|path| path.display().to_string()),
        exported: records.len(),
        stats,
    };
    write_export(ctx, &summary, args.out.as_deref(), &data)
}

fn write_export(ctx: &Context<'_>, summary: &MergeSummary, out: Option<&Path>, data: &str) -> Result<()> {
    let message = format!(
        "Merge complete: {} contacts matched out of {} total",
        summary.stats.matched, summary.stats.total
    );
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("create export directory {}", parent.display()))?;
                }
            }
            fs::write(path, data)
                .with_context(|| format!("write export file {}", path.display()))?;
            if ctx.json {
                print_json(summary)?;
            } else {
                println!("{message}");
                println!("Exported {} contacts to {}", summary.exported, path.display());
            }
        }
        None => {
            print!("{data}");
            eprintln!("{message}");
        }
    }
    Ok(())
}
