use crate::commands::{open_session, print_json, Context, MappingArgs};
use anyhow::Result;
use cardmerge_core::{is_structural_field, MergeOrigin, MergedRecord};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// The two vCard files, primary first
    #[arg(required = true, num_args = 1.., value_name = "FILE")]
    pub files: Vec<PathBuf>,
    #[command(flatten)]
    pub mapping: MappingArgs,
    /// Show fields that are hidden by default
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct PreviewItem {
    index: usize,
    origin: MergeOrigin,
    fields: BTreeMap<String, String>,
}

pub fn preview(ctx: &Context<'_>, args: PreviewArgs) -> Result<()> {
    let mut session = open_session(ctx, &args.files, &args.mapping)?;
    let stats = session.merge();

    let items = session
        .merged()
        .iter()
        .enumerate()
        .map(|(index, merged)| PreviewItem {
            index,
            origin: merged.origin,
            fields: visible_fields(ctx, merged, args.all),
        })
        .collect::<Vec<_>>();

    if ctx.json {
        return print_json(&items);
    }

    for item in &items {
        println!("[{}] {}", item.index, origin_label(&item.origin));
        for (field, value) in &item.fields {
            println!("  {field}: {value}");
        }
    }
    println!(
        "{} contacts, {} matched, {} only in first file, {} only in second file",
        stats.total, stats.matched, stats.primary_only, stats.partner_only
    );
    Ok(())
}

fn visible_fields(ctx: &Context<'_>, merged: &MergedRecord, all: bool) -> BTreeMap<String, String> {
    merged
        .record
        .iter()
        .filter(|(field, _)| !is_structural_field(field))
        .filter(|(field, _)| all || !ctx.config.preview.hidden_fields.contains(*field))
        .filter(|(_, value)| !value.is_empty())
        .map(|(field, value)| (field.to_string(), value.display()))
        .collect()
}

fn origin_label(origin: &MergeOrigin) -> String {
    match origin {
        MergeOrigin::Matched {
            primary,
            partner,
            reason,
        } => format!(
            "matched by {} (first #{primary}, second #{partner})",
            reason.as_str()
        ),
        MergeOrigin::PrimaryOnly { index } => format!("first file only (#{index})"),
        MergeOrigin::PartnerOnly { index } => format!("second file only (#{index})"),
    }
}
