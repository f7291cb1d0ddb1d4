use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::directive::TargetLanguage;

pub mod codegen;
pub mod introspection;
pub mod operations;

pub use codegen::CommandCodeGenerator;
pub use operations::SampleOperations;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Document has no `__schema` introspection result")]
    MissingSchema,

    #[error("Introspection schema parsing error: {0}")]
    ParsingError(String),

    #[error("No operations language for {0}")]
    UnsupportedLanguage(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Code generation failed: {0}")]
    CodegenFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodegenOptions {
    pub add_typename: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self { add_typename: true }
    }
}

/// Turns an introspection schema file into a file of sample operations.
#[async_trait]
pub trait OperationSynthesizer: Send + Sync {
    async fn generate_operations(&self, schema_file: &Path, output_file: &Path) -> Result<(), Error>;
}

/// Turns operations and a schema into typed client code.
#[async_trait]
pub trait ClientCodeGenerator: Send + Sync {
    async fn generate(
        &self,
        operation_files: &[PathBuf],
        schema_file: &Path,
        output_file: &Path,
        target: TargetLanguage,
        options: &CodegenOptions,
    ) -> Result<(), Error>;
}
