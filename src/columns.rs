//! Column resolution report.
//!
//! Lists every canonical field with the input column it resolved to, the
//! candidate name that matched, and the match tier, so a changed export
//! layout can be diagnosed before publishing.

use anyhow::Result;
use log::{info, warn};

use crate::{
    cli::ColumnsArgs,
    load_input,
    schema::{CanonicalField, resolve_columns},
    table::TextTable,
};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let input = load_input(&args.source)?;
    let headers = input.table.headers();
    let columns = resolve_columns(headers, &input.config.columns);

    let mut table = TextTable::new(["field", "column", "candidate", "match"]);
    for (field, _) in input.config.columns.iter() {
        let row = match columns.get(field) {
            Some(resolved) => vec![
                field.to_string(),
                resolved.label.clone(),
                resolved.candidate.clone(),
                resolved.tier.to_string(),
            ],
            None => vec![field.to_string(), "-".into(), "-".into(), "unresolved".into()],
        };
        table.push_row(row);
    }
    table.print();

    let unused = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !columns.iter().any(|(_, column)| column.index == *idx))
        .map(|(_, header)| header.as_str())
        .collect::<Vec<_>>();
    if !unused.is_empty() {
        info!("Unused input column(s): {}", unused.join(", "));
    }
    if !columns.contains(CanonicalField::Title) {
        warn!("No title column resolved; every row would be dropped");
    }
    info!(
        "Resolved {} of {} field(s) from {:?}",
        columns.len(),
        input.config.columns.len(),
        input.path
    );
    Ok(())
}
