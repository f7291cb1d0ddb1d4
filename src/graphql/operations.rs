use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use super::introspection::{Field, Schema, TypeKind};
use super::{Error, OperationSynthesizer};
use crate::directive::OperationsLanguage;

const GENERATED_NOTICE: &str = "this is an auto generated file. This will be overwritten";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    fn keyword(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub field_name: String,
    pub document: String,
}

/// One sample operation per root field, selecting nested objects up to `max_depth` levels.
pub fn sample_operations(schema: &Schema, max_depth: usize) -> Vec<Operation> {
    let roots = [
        (OperationKind::Query, &schema.query_type),
        (OperationKind::Mutation, &schema.mutation_type),
        (OperationKind::Subscription, &schema.subscription_type),
    ];

    let mut operations = Vec::new();
    for (kind, root) in roots {
        let fields = root
            .as_ref()
            .and_then(|root| schema.find_type(&root.name))
            .and_then(|root| root.fields.as_ref());

        for field in fields.into_iter().flatten() {
            operations.push(Operation {
                kind,
                field_name: field.name.clone(),
                document: render_operation(schema, kind, field, max_depth),
            });
        }
    }

    operations
}

fn operation_name(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_operation(schema: &Schema, kind: OperationKind, field: &Field, max_depth: usize) -> String {
    let mut document = format!("{} {}", kind.keyword(), operation_name(&field.name));

    if !field.args.is_empty() {
        let variables: Vec<String> = field
            .args
            .iter()
            .map(|arg| format!("${}: {}", arg.name, arg.value_type.render()))
            .collect();
        document.push_str(&format!("({})", variables.join(", ")));
    }
    document.push_str(" {\n  ");
    document.push_str(&field.name);

    if !field.args.is_empty() {
        let arguments: Vec<String> = field
            .args
            .iter()
            .map(|arg| format!("{}: ${}", arg.name, arg.name))
            .collect();
        document.push_str(&format!("({})", arguments.join(", ")));
    }

    match render_selection(schema, field.field_type.named(), 1, max_depth, 4) {
        Some(selection) => document.push_str(&format!(" {{\n{}  }}\n", selection)),
        None => document.push('\n'),
    }
    document.push_str("}\n");

    document
}

fn render_selection(
    schema: &Schema,
    type_name: &str,
    depth: usize,
    max_depth: usize,
    indent: usize,
) -> Option<String> {
    let full_type = schema.find_type(type_name)?;
    let padding = " ".repeat(indent);

    match full_type.kind {
        TypeKind::Union => return Some(format!("{}__typename\n", padding)),
        TypeKind::Object | TypeKind::Interface => {}
        _ => return None,
    }

    let mut selection = String::new();
    for field in full_type.fields.iter().flatten() {
        // Nested fields can't be given values, so skip any that need them.
        if field.args.iter().any(|arg| arg.value_type.is_non_null()) {
            continue;
        }

        let named = field.field_type.named();
        match schema.find_type(named).map(|nested| nested.kind) {
            Some(TypeKind::Object) | Some(TypeKind::Interface) | Some(TypeKind::Union) => {
                if depth >= max_depth {
                    continue;
                }
                if let Some(nested) = render_selection(schema, named, depth + 1, max_depth, indent + 2) {
                    selection.push_str(&format!("{}{} {{\n{}{}}}\n", padding, field.name, nested, padding));
                }
            }
            _ => selection.push_str(&format!("{}{}\n", padding, field.name)),
        }
    }

    // An object selection can't be empty.
    if selection.is_empty() {
        selection = format!("{}__typename\n", padding);
    }

    Some(selection)
}

pub fn render_operations(operations: &[Operation], language: OperationsLanguage) -> String {
    match language {
        OperationsLanguage::Graphql => {
            let mut contents = format!("# {}\n", GENERATED_NOTICE);
            for operation in operations {
                contents.push('\n');
                contents.push_str(&operation.document);
            }
            contents
        }
        OperationsLanguage::JavaScript | OperationsLanguage::TypeScript | OperationsLanguage::Flow => {
            let mut contents = String::new();
            if language == OperationsLanguage::Flow {
                contents.push_str("// @flow\n");
            }
            contents.push_str(&format!("/* eslint-disable */\n// {}\n", GENERATED_NOTICE));
            for operation in operations {
                let indented: Vec<String> = operation
                    .document
                    .lines()
                    .map(|line| format!("  {}", line))
                    .collect();
                contents.push_str(&format!(
                    "\nexport const {} = /* GraphQL */ `\n{}\n`;\n",
                    operation.field_name,
                    indented.join("\n")
                ));
            }
            contents
        }
    }
}

/// Built-in [`OperationSynthesizer`] producing one sample operation per root field.
pub struct SampleOperations {
    pub max_depth: usize,
}

impl Default for SampleOperations {
    fn default() -> Self {
        Self { max_depth: 2 }
    }
}

#[async_trait]
impl OperationSynthesizer for SampleOperations {
    async fn generate_operations(&self, schema_file: &Path, output_file: &Path) -> Result<(), Error> {
        let language = OperationsLanguage::from_path(output_file)
            .ok_or_else(|| Error::UnsupportedLanguage(output_file.display().to_string()))?;

        let contents = tokio::fs::read(schema_file)
            .await
            .map_err(|error| Error::Io(error.to_string()))?;
        let document: Value =
            serde_json::from_slice(&contents).map_err(|error| Error::ParsingError(error.to_string()))?;
        let schema = Schema::from_document(&document)?;

        let operations = sample_operations(&schema, self.max_depth);
        tracing::debug!(count = operations.len(), "Generated sample operations");

        tokio::fs::write(output_file, render_operations(&operations, language))
            .await
            .map_err(|error| Error::Io(error.to_string()))
    }
}
