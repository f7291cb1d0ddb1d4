use std::path::PathBuf;

use clap::Parser;

pub mod cloud;
pub mod config;
pub mod directive;
pub mod discovery;
pub mod graphql;
pub mod pipeline;
pub mod resources;
pub mod synth;
pub mod template;
pub mod writer;

use cloud::aws::AwsCloudQuery;
use graphql::{CodegenOptions, CommandCodeGenerator, SampleOperations};
use synth::Generators;

/// Generate client configuration files from a deployed CFN stack
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file listing the stacks and their outputs
    #[arg(short, long, default_value = "./config.yaml")]
    config: PathBuf,

    /// Only generate the outputs of this stack
    #[arg(long)]
    stack: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CFN_CLIENT_CONFIG_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(cli).await {
        for cause in error.chain() {
            eprintln!("{cause}")
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::parse(&cli.config)?;
    let operations = SampleOperations::default();

    let mut matched = false;
    for config_entry in &config {
        if let Some(stack) = &cli.stack {
            if config_entry.stack_name() != stack.as_str() {
                continue;
            }
        }
        matched = true;

        let cloud = AwsCloudQuery::new(config_entry.region.as_ref()).await?;
        let client_code = CommandCodeGenerator::new(config_entry.codegen_command());
        let generators = Generators {
            operations: &operations,
            client_code: &client_code,
            options: CodegenOptions::default(),
        };

        let written = pipeline::generate(config_entry, &cloud, &cloud.region, &generators).await?;
        tracing::info!(
            stack = config_entry.stack_name(),
            files = written.len(),
            "Client configuration generated"
        );
    }

    if let Some(stack) = &cli.stack {
        anyhow::ensure!(matched, "Stack {} is not listed in {}", stack, cli.config.display());
    }

    return Ok(());
}
