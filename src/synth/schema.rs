//! Formats derived from the GraphQL API's introspection schema.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use super::{Error, Generators};
use crate::directive::{ConfigurationDirective, TargetLanguage};
use crate::resources::{Metadata, ResourceRecord};

const SCHEMA_FILE: &str = "schema.json";
const OPERATIONS_FILE: &str = "operations.graphql";

fn introspection_schema<'a>(
    records: &'a [ResourceRecord],
    directive: &ConfigurationDirective,
) -> Result<&'a Value, Error> {
    let mut schemas = records.iter().filter_map(|record| match &record.metadata {
        Metadata::GraphqlApi { schema, .. } => Some((record.logical_id(), schema)),
        _ => None,
    });

    let (logical_id, schema) = schemas.next().ok_or_else(|| Error::MissingResource {
        directive: directive.name(),
        resource: "GraphQL API",
    })?;

    if schemas.next().is_some() {
        tracing::warn!(
            directive = %directive.name(),
            used = logical_id,
            "Stack has more than one GraphQL API, using the first"
        );
    }

    return Ok(schema);
}

fn io_error(directive: &ConfigurationDirective, error: std::io::Error) -> Error {
    Error::Render {
        directive: directive.name(),
        reason: error.to_string(),
    }
}

fn graphql_error(directive: &ConfigurationDirective, source: crate::graphql::Error) -> Error {
    Error::Graphql {
        directive: directive.name(),
        source,
    }
}

/// Writes the schema into a fresh temporary directory, removed when the `TempDir` drops.
async fn schema_workspace(
    schema: &Value,
    directive: &ConfigurationDirective,
) -> Result<(TempDir, PathBuf), Error> {
    let workspace = tempfile::tempdir().map_err(|error| io_error(directive, error))?;
    let schema_file = workspace.path().join(SCHEMA_FILE);

    tokio::fs::write(&schema_file, schema.to_string())
        .await
        .map_err(|error| io_error(directive, error))?;

    return Ok((workspace, schema_file));
}

fn artifact_name(directive: &ConfigurationDirective, stem: &str) -> PathBuf {
    match directive.extension() {
        Some(extension) => PathBuf::from(format!("{}.{}", stem, extension)),
        None => PathBuf::from(stem),
    }
}

async fn read_artifact(path: &Path, directive: &ConfigurationDirective) -> Result<String, Error> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|error| io_error(directive, error))
}

pub fn schema_document(
    records: &[ResourceRecord],
    directive: &ConfigurationDirective,
) -> Result<String, Error> {
    let schema = introspection_schema(records, directive)?;

    let mut contents = serde_json::to_string_pretty(schema).map_err(|error| Error::Render {
        directive: directive.name(),
        reason: error.to_string(),
    })?;
    contents.push('\n');

    return Ok(contents);
}

pub async fn operation_stubs(
    records: &[ResourceRecord],
    directive: &ConfigurationDirective,
    generators: &Generators<'_>,
) -> Result<String, Error> {
    let schema = introspection_schema(records, directive)?;
    let (workspace, schema_file) = schema_workspace(schema, directive).await?;
    let output_file = workspace.path().join(artifact_name(directive, "operations"));

    generators
        .operations
        .generate_operations(&schema_file, &output_file)
        .await
        .map_err(|error| graphql_error(directive, error))?;

    read_artifact(&output_file, directive).await
}

pub async fn client_code(
    records: &[ResourceRecord],
    directive: &ConfigurationDirective,
    generators: &Generators<'_>,
) -> Result<String, Error> {
    let target = TargetLanguage::from_path(&directive.output_path).ok_or_else(|| {
        graphql_error(
            directive,
            crate::graphql::Error::UnsupportedLanguage(directive.name()),
        )
    })?;

    let schema = introspection_schema(records, directive)?;
    let (workspace, schema_file) = schema_workspace(schema, directive).await?;

    let operations_file = workspace.path().join(OPERATIONS_FILE);
    generators
        .operations
        .generate_operations(&schema_file, &operations_file)
        .await
        .map_err(|error| graphql_error(directive, error))?;

    let output_file = workspace.path().join(artifact_name(directive, "API"));
    generators
        .client_code
        .generate(
            &[operations_file],
            &schema_file,
            &output_file,
            target,
            &generators.options,
        )
        .await
        .map_err(|error| graphql_error(directive, error))?;

    read_artifact(&output_file, directive).await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directive::OutputFormat;
    use crate::graphql::introspection::tests::blog_schema;
    use crate::graphql::{ClientCodeGenerator, CodegenOptions, SampleOperations};
    use crate::synth::fixtures::records;

    /// Records every invocation and writes a one-line stand-in for generated code.
    #[derive(Default)]
    struct RecordingCodegen {
        invocations: Mutex<Vec<(usize, String, String)>>,
    }

    #[async_trait]
    impl ClientCodeGenerator for RecordingCodegen {
        async fn generate(
            &self,
            operation_files: &[PathBuf],
            schema_file: &Path,
            output_file: &Path,
            target: TargetLanguage,
            _options: &CodegenOptions,
        ) -> Result<(), crate::graphql::Error> {
            let operations = std::fs::read_to_string(&operation_files[0]).unwrap();
            let schema = std::fs::read_to_string(schema_file).unwrap();
            self.invocations.lock().unwrap().push((
                operation_files.len(),
                target.as_str().to_string(),
                schema,
            ));
            std::fs::write(
                output_file,
                format!("// {} client for {} operations\n", target.as_str(), operations.matches("query ").count()),
            )
            .unwrap();
            Ok(())
        }
    }

    fn generators<'a>(
        operations: &'a SampleOperations,
        client_code: &'a RecordingCodegen,
    ) -> Generators<'a> {
        Generators {
            operations,
            client_code,
            options: CodegenOptions::default(),
        }
    }

    #[test]
    fn schema_document_round_trips() {
        let directive = ConfigurationDirective::new("schema.json", OutputFormat::SchemaDocument);

        let contents = schema_document(&records(), &directive).unwrap();

        let parsed: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(blog_schema(), parsed);
    }

    #[test]
    fn schema_document_needs_an_api() {
        let directive = ConfigurationDirective::new("schema.json", OutputFormat::SchemaDocument);
        let records: Vec<ResourceRecord> = records()
            .into_iter()
            .filter(|record| !matches!(record.metadata, Metadata::GraphqlApi { .. }))
            .collect();

        assert_eq!(
            Error::MissingResource {
                directive: String::from("schema.json"),
                resource: "GraphQL API",
            },
            schema_document(&records, &directive).unwrap_err()
        );
    }

    #[tokio::test]
    async fn operation_stubs_in_requested_language() {
        let operations = SampleOperations::default();
        let codegen = RecordingCodegen::default();
        let directive = ConfigurationDirective::new("src/graphql/operations.js", OutputFormat::OperationStubs);

        let contents = operation_stubs(&records(), &directive, &generators(&operations, &codegen))
            .await
            .unwrap();

        assert!(contents.contains("export const getPost = /* GraphQL */ `"));
        assert!(codegen.invocations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn client_code_for_extension_target() {
        let operations = SampleOperations::default();
        let codegen = RecordingCodegen::default();
        let directive = ConfigurationDirective::new("ios/API.swift", OutputFormat::GeneratedClientCode);

        let contents = client_code(&records(), &directive, &generators(&operations, &codegen))
            .await
            .unwrap();

        assert_eq!("// swift client for 3 operations\n", contents);
        let invocations = codegen.invocations.lock().unwrap();
        assert_eq!(1, invocations.len());
        assert_eq!(1, invocations[0].0);
        assert_eq!("swift", invocations[0].1);
        let schema: Value = serde_json::from_str(&invocations[0].2).unwrap();
        assert_eq!(blog_schema(), schema);
    }

    #[tokio::test]
    async fn client_code_needs_an_api() {
        let operations = SampleOperations::default();
        let codegen = RecordingCodegen::default();
        let directive = ConfigurationDirective::new("API.ts", OutputFormat::GeneratedClientCode);

        match client_code(&[], &directive, &generators(&operations, &codegen))
            .await
            .unwrap_err()
        {
            Error::MissingResource { .. } => {}
            other => panic!("Expected `MissingResource`, got {:?}", other),
        }
    }
}
