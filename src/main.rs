use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

mod core;
mod formatters;
mod index;

use crate::core::{model_graph, ComponentFinder, Model, ModelDefinition};
use crate::formatters::{JsonGraphFormatter, MarkdownFormatter};
use crate::index::source::SourceIndexer;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "archmap",
    version = "0.1.0",
    author = "archmap developers",
    about = "Discovers architectural components in Spring codebases and maps their dependencies"
)]
struct Cli {
    /// Root directory of the Java sources to analyze
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Package prefix bounding the reference scan
    #[arg(short, long, value_name = "PACKAGE")]
    package: String,

    /// Model definition file naming software systems and containers
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Software system owning the scanned container
    #[arg(long, value_name = "NAME", default_value = "Software System")]
    system: String,

    /// Container the discovered components belong to
    #[arg(long, value_name = "NAME", default_value = "Application")]
    container: String,

    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "ARCHITECTURE.md")]
    output: PathBuf,

    /// Output format: markdown, json
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Disable the on-disk parse cache
    #[arg(long)]
    no_cache: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        input,
        package,
        model,
        system,
        container,
        output,
        format,
        no_cache,
    } = cli;

    let start_time = Instant::now();

    println!("ARCHMAP - Component discovery for Spring codebases");
    println!("Input: {}", input.display());
    println!("Scan package: {}", package);
    println!("Output: {} ({})", output.display(), format.as_str());

    let mut arch_model = match &model {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read model definition {}", path.display()))?;
            let definition: ModelDefinition = serde_json::from_str(&text)
                .with_context(|| format!("Invalid model definition {}", path.display()))?;
            definition.build()
        }
        None => Model::new(),
    };

    let system_id = match arch_model.software_system_by_name(&system) {
        Some(id) => id,
        None => arch_model.add_software_system(&system, ""),
    };
    let container_id = match arch_model.container_with_name(system_id, &container) {
        Some(id) => id,
        None => arch_model.add_container(system_id, &container, "", ""),
    };

    let mut indexer = if no_cache {
        SourceIndexer::without_disk_cache()
    } else {
        SourceIndexer::new()
    };
    let index = indexer.index(&input)?;

    println!("Discovering components...");
    let discovery_start = Instant::now();

    let mut finder = ComponentFinder::new(&mut arch_model, container_id, &package);
    finder.run(&index, &index)?;

    let component_count = finder.registry().len();
    let warnings: Vec<String> = finder
        .diagnostics()
        .entries()
        .iter()
        .map(|diagnostic| diagnostic.to_string())
        .collect();
    drop(finder);

    println!(
        "Discovered {} components, {} dependencies in {:.2}s",
        component_count,
        arch_model.relationships().len(),
        discovery_start.elapsed().as_secs_f64()
    );
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    match format {
        OutputFormat::Markdown => {
            MarkdownFormatter::new().format_to_file(&arch_model, &output)?;
        }
        OutputFormat::Json => {
            let graph = model_graph(&arch_model);
            JsonGraphFormatter::new().format_to_file(&graph, &output)?;
        }
    }

    println!("Generated {}", output.display());
    println!(
        "Total execution time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
