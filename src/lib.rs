pub mod cli;
pub mod columns;
pub mod config;
pub mod data;
pub mod dataset;
pub mod io_utils;
pub mod keywords;
pub mod loader;
pub mod locate;
pub mod normalize;
pub mod preview;
pub mod publish;
pub mod push;
pub mod rows;
pub mod schema;
pub mod table;

use std::{env, path::PathBuf, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, InputArgs},
    config::PipelineConfig,
    dataset::Pipeline,
    keywords::KeywordAnalyzer,
    loader::LoadOptions,
    rows::RawTable,
    table::{Align, TextTable},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("notes_dashboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => handle_build(&args),
        Commands::Publish(args) => handle_publish(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Keywords(args) => handle_keywords(&args),
        Commands::Columns(args) => columns::execute(&args),
        Commands::Config(args) => handle_config(&args),
    }
}

/// Configuration, input path and loaded table for one command invocation.
pub(crate) struct LoadedInput {
    pub config: PipelineConfig,
    pub path: PathBuf,
    pub table: RawTable,
}

pub(crate) fn load_input(args: &InputArgs) -> Result<LoadedInput> {
    let config = PipelineConfig::load_or_default(args.config.as_deref())?;
    let path = match (&args.input, &args.dir) {
        (Some(input), _) => input.clone(),
        (None, Some(dir)) => locate::locate_latest(dir, &config.input_patterns)?,
        (None, None) => return Err(anyhow!("Either --input or --dir is required")),
    };
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        sheet: args.sheet.clone(),
    };
    let table = loader::load_table(&path, &options)?;
    Ok(LoadedInput {
        config,
        path,
        table,
    })
}

fn handle_build(args: &cli::BuildArgs) -> Result<()> {
    let input = load_input(&args.source)?;
    let pipeline = Pipeline::new(input.config)?;
    let dataset = pipeline.assemble(&input.table);
    let json = publish::render_dataset_json(&dataset)?;
    io_utils::write_text(args.output.as_deref(), &json)?;
    info!(
        "Dataset with {} note(s) from {:?} written to {}",
        dataset.records.len(),
        input.path,
        args.output
            .as_ref()
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "stdout".to_string())
    );
    Ok(())
}

fn handle_publish(args: &cli::PublishArgs) -> Result<()> {
    let input = load_input(&args.source)?;
    let pipeline = Pipeline::new(input.config)?;
    let dataset = pipeline.assemble(&input.table);
    publish::publish_to_file(&args.document, &dataset)
        .with_context(|| format!("Publishing to {:?}", args.document))?;
    if args.push {
        let message = args
            .message
            .clone()
            .unwrap_or_else(push::default_commit_message);
        push::push_document(&args.document, &message)
            .with_context(|| format!("Pushing {:?}", args.document))?;
    }
    Ok(())
}

fn handle_keywords(args: &cli::KeywordsArgs) -> Result<()> {
    let input = load_input(&args.source)?;
    let mut keyword_config = input.config.keywords.clone();
    if let Some(selection) = args.selection {
        keyword_config.selection_size = selection;
    }
    if let Some(top) = args.top {
        keyword_config.output_size = top;
    }
    let pipeline = Pipeline::new(input.config)?;
    let columns = pipeline.resolve(&input.table);
    let records = pipeline.normalize(&input.table, &columns);
    let analyzer = KeywordAnalyzer::new(keyword_config)?;
    let ranked = analyzer.analyze(&records, args.metric);

    let mut table = TextTable::new(["#", "keyword", "count"])
        .align(0, Align::Right)
        .align(2, Align::Right);
    for (idx, (keyword, count)) in ranked.iter().enumerate() {
        table.push_row(vec![(idx + 1).to_string(), keyword.clone(), count.to_string()]);
    }
    table.print();
    info!(
        "Ranked {} keyword(s) from the top {} note(s) by {}",
        ranked.len(),
        analyzer.config().selection_size.min(records.len()),
        args.metric
    );
    Ok(())
}

fn handle_config(args: &cli::ConfigArgs) -> Result<()> {
    let yaml = PipelineConfig::default().to_yaml_string()?;
    io_utils::write_text(args.output.as_deref(), &yaml)?;
    if let Some(path) = &args.output {
        info!("Default configuration written to {path:?}");
    }
    Ok(())
}
