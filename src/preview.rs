use anyhow::Result;
use log::info;

use crate::{
    cli::PreviewArgs,
    dataset::Pipeline,
    load_input,
    table::{Align, TextTable},
};

const TITLE_WIDTH: usize = 40;

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let input = load_input(&args.source)?;
    let pipeline = Pipeline::new(input.config)?;
    let columns = pipeline.resolve(&input.table);
    let records = pipeline.normalize(&input.table, &columns);

    let mut table = TextTable::new([
        "title",
        "date",
        "type",
        "impressions",
        "views",
        "ctr",
        "likes",
        "collects",
        "followers",
    ])
    .max_width(0, TITLE_WIDTH);
    for column in 3..9 {
        table = table.align(column, Align::Right);
    }
    for record in records.iter().take(args.rows) {
        table.push_row(vec![
            record.title.clone(),
            record.date.clone().unwrap_or_default(),
            record.note_type.as_str().to_string(),
            record.impressions.to_string(),
            record.views.to_string(),
            format!("{:.3}", record.ctr),
            record.likes.to_string(),
            record.collects.to_string(),
            record.followers.to_string(),
        ]);
    }
    table.print();
    info!(
        "Displayed {} of {} note(s) from {:?}",
        table.len(),
        records.len(),
        input.path
    );
    Ok(())
}
