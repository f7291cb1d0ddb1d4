use std::path::PathBuf;

use chrono::Utc;

use crate::cloud::{self, CloudQuery};
use crate::config::{self, ConfigEntry};
use crate::discovery;
use crate::synth::{self, Generators, SynthContext};
use crate::template::{self, Template};
use crate::writer;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),

    #[error(transparent)]
    Cloud(#[from] cloud::Error),

    #[error(transparent)]
    Template(#[from] template::Error),

    #[error(transparent)]
    Discovery(#[from] discovery::Error),

    #[error(transparent)]
    Synthesis(#[from] synth::Error),

    #[error(transparent)]
    Write(#[from] writer::Error),
}

/// A missing template at the default location only means clients stay unresolved.
fn load_template(entry: &ConfigEntry) -> Result<Template, template::Error> {
    let path = entry.template_path();

    match Template::load(&path) {
        Ok(template) => Ok(template),
        Err(template::Error::FileNotFound(path)) if entry.template.is_none() => {
            tracing::warn!(path = %path, "No compiled template found, user pool clients will not be resolved");
            Ok(Template::default())
        }
        Err(error) => Err(error),
    }
}

/// Generates every output of `entry`, in order, stopping at the first failure.
pub async fn generate(
    entry: &ConfigEntry,
    cloud: &dyn CloudQuery,
    region: &str,
    generators: &Generators<'_>,
) -> Result<Vec<PathBuf>, Error> {
    let directives = entry.directives()?;
    let template = load_template(entry)?;
    let context = SynthContext {
        region: region.to_string(),
        stage: entry.stage().to_string(),
        generated_at: Utc::now(),
    };

    let stack_name = entry.stack_name();
    tracing::info!(stack = stack_name, region, outputs = directives.len(), "Generating client configuration");

    let summaries = discovery::enumerate(cloud, stack_name).await?;
    let records = discovery::describe(cloud, &template, &summaries).await?;

    let mut written = Vec::with_capacity(directives.len());
    for directive in &directives {
        tracing::debug!(
            output = %directive.name(),
            format = directive.format.as_str(),
            "Synthesizing output"
        );
        let contents = synth::synthesize(&records, directive, &context, generators).await?;
        writer::write(&directive.output_path, &contents)?;
        written.push(directive.output_path.clone());
    }

    return Ok(written);
}
