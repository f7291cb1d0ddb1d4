//! Renders described resources into the output formats a directive asks for.

use chrono::{DateTime, Utc};

use crate::directive::{ConfigurationDirective, OutputFormat};
use crate::graphql::{self, ClientCodeGenerator, CodegenOptions, OperationSynthesizer};
use crate::resources::ResourceRecord;

pub mod native;
pub mod resolve;
pub mod schema;
pub mod script;

pub use resolve::{resolve, ResolvedConfiguration};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("{directive}: the stack has no {resource}")]
    MissingResource {
        directive: String,
        resource: &'static str,
    },

    #[error("{directive}: resource {logical_id} not found")]
    ResourceNotFound {
        directive: String,
        logical_id: String,
    },

    #[error("{directive}: the user pool of app client {logical_id} could not be resolved")]
    UnresolvedAppClient {
        directive: String,
        logical_id: String,
    },

    #[error("{directive}: {reason}")]
    Render { directive: String, reason: String },

    #[error("{directive}: {source}")]
    Graphql {
        directive: String,
        source: graphql::Error,
    },
}

/// Values shared by every directive of one run.
#[derive(Debug, Clone)]
pub struct SynthContext {
    pub region: String,
    pub stage: String,
    pub generated_at: DateTime<Utc>,
}

/// External generators used by the GraphQL-based formats.
pub struct Generators<'a> {
    pub operations: &'a dyn OperationSynthesizer,
    pub client_code: &'a dyn ClientCodeGenerator,
    pub options: CodegenOptions,
}

pub async fn synthesize(
    records: &[ResourceRecord],
    directive: &ConfigurationDirective,
    context: &SynthContext,
    generators: &Generators<'_>,
) -> Result<String, Error> {
    let render_error = |error: serde_json::Error| Error::Render {
        directive: directive.name(),
        reason: error.to_string(),
    };

    match directive.format {
        OutputFormat::Native => {
            let resolved = resolve(records, directive, context)?;
            native::render(&resolved).map_err(render_error)
        }
        OutputFormat::ScriptModule => {
            let resolved = resolve(records, directive, context)?;
            script::render(&resolved, context, false).map_err(render_error)
        }
        OutputFormat::TypedScriptModule => {
            let resolved = resolve(records, directive, context)?;
            script::render(&resolved, context, true).map_err(render_error)
        }
        OutputFormat::SchemaDocument => schema::schema_document(records, directive),
        OutputFormat::OperationStubs => schema::operation_stubs(records, directive, generators).await,
        OutputFormat::GeneratedClientCode => schema::client_code(records, directive, generators).await,
    }
}
