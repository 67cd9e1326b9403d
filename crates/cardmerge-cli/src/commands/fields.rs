use crate::commands::{open_session, print_json, Context, MappingArgs};
use crate::util::join_or_dash;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// The two vCard files, primary first
    #[arg(required = true, num_args = 1.., value_name = "FILE")]
    pub files: Vec<PathBuf>,
    #[command(flatten)]
    pub mapping: MappingArgs,
}

#[derive(Debug, Serialize)]
struct FieldsReport {
    primary: SetFields,
    partner: SetFields,
    mapping: Vec<MappingRow>,
    unmapped: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SetFields {
    source: String,
    records: usize,
    fields: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MappingRow {
    field: String,
    target: String,
    structural: bool,
}

pub fn show_fields(ctx: &Context<'_>, args: FieldsArgs) -> Result<()> {
    let session = open_session(ctx, &args.files, &args.mapping)?;
    let primary_vocab = session.primary().vocabulary();
    let partner_vocab = session.partner().vocabulary();

    let user_fields: BTreeSet<&str> = session.mapping().entries().map(|(field, _)| field).collect();
    let mapping = session
        .mapping()
        .effective_entries()
        .map(|(field, target)| MappingRow {
            field: field.to_string(),
            target: target.to_string(),
            structural: !user_fields.contains(field),
        })
        .collect::<Vec<_>>();
    let unmapped = primary_vocab
        .iter()
        .filter(|field| session.mapping().get(field).is_none())
        .cloned()
        .collect::<Vec<_>>();

    let report = FieldsReport {
        primary: SetFields {
            source: session.primary().source.clone(),
            records: session.primary().len(),
            fields: primary_vocab.into_iter().collect(),
        },
        partner: SetFields {
            source: session.partner().source.clone(),
            records: session.partner().len(),
            fields: partner_vocab.into_iter().collect(),
        },
        mapping,
        unmapped,
    };

    if ctx.json {
        return print_json(&report);
    }

    for set in [&report.primary, &report.partner] {
        println!(
            "{} ({} contacts): {}",
            set.source,
            set.records,
            join_or_dash(set.fields.iter().map(String::as_str))
        );
    }
    println!("mapping:");
    for row in &report.mapping {
        if row.structural {
            println!("  {} -> {} (fixed)", row.field, row.target);
        } else {
            println!("  {} -> {}", row.field, row.target);
        }
    }
    println!(
        "unmapped: {}",
        join_or_dash(report.unmapped.iter().map(String::as_str))
    );
    Ok(())
}
