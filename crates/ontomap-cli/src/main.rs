mod serve;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use ontomap_core::{Config, MappingResult, OntologyService};

#[derive(Parser)]
#[command(name = "ontomap")]
#[command(about = "Classify datasets against ontology classes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Map names to ontology classes and print the decisions
    Map {
        /// Comma-separated ontology classes
        #[arg(long, value_delimiter = ',', required = true)]
        classes: Vec<String>,
        /// Embedding model to use instead of the configured one
        #[arg(long)]
        model: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Map every CSV in a folder and export the Turtle graph
    Build {
        #[arg(long, value_delimiter = ',', required = true)]
        classes: Vec<String>,
        #[arg(long)]
        input_dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the default configuration file
    Config,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Serve { host, port } => {
            let serve_config = serve::ServeConfig {
                host: host.unwrap_or_else(|| config.server.host.clone()),
                port: port.unwrap_or(config.server.port),
            };
            let service = Arc::new(OntologyService::new(config));
            serve::start_server(service, serve_config).await?;
        }
        Commands::Map {
            classes,
            model,
            json,
            texts,
        } => {
            let service = OntologyService::new(config);
            let spinner = spinner("Mapping")?;
            let results = service
                .map_texts(texts, classes, model.as_deref())
                .await;
            spinner.finish_and_clear();
            let results = results?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_mappings(&results);
            }
        }
        Commands::Build {
            classes,
            input_dir,
            output_dir,
            model,
        } => {
            if let Some(dir) = input_dir {
                config.builder.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.builder.output_dir = dir;
            }
            let service = OntologyService::new(config);
            let spinner = spinner("Building ontology")?;
            let outcome = service.build_from_folder(classes, model.as_deref()).await;
            spinner.finish_and_clear();
            let outcome = outcome?;

            let report = &outcome.report;
            print_mappings(&report.mappings);
            println!();
            for (method, count) in &report.method_counts {
                println!("  {:<13} {}", method, count);
            }
            println!("  {:<13} {}", "skipped", report.skipped);
            match &report.export_path {
                Some(path) => println!("Graph written to {}", path.display()),
                None => println!("No CSV files found; nothing exported"),
            }
        }
        Commands::Config => {
            print!("{}", Config::default_config_string());
        }
    }

    Ok(())
}

fn spinner(message: &'static str) -> color_eyre::Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    Ok(bar)
}

fn print_mappings(results: &[MappingResult]) {
    println!(
        "{:<32} {:<32} {:<24} {:>10}  {}",
        "SOURCE", "INTERPRETED AS", "CLASS", "CONFIDENCE", "METHOD"
    );
    for result in results {
        println!(
            "{:<32} {:<32} {:<24} {:>10.3}  {}",
            result.source_text,
            result.interpreted_as,
            result.mapped_class,
            result.confidence,
            result.method
        );
    }
}
