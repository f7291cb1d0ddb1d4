use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::{ClientCodeGenerator, CodegenOptions, Error};
use crate::directive::TargetLanguage;

pub const DEFAULT_CODEGEN_COMMAND: &str = "aws-appsync-codegen";

/// Runs an external code generator as
/// `<program> generate <operations...> --schema <schema> --output <output> --target <language> [--add-typename]`.
pub struct CommandCodeGenerator {
    program: String,
}

impl CommandCodeGenerator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODEGEN_COMMAND)
    }
}

#[async_trait]
impl ClientCodeGenerator for CommandCodeGenerator {
    async fn generate(
        &self,
        operation_files: &[PathBuf],
        schema_file: &Path,
        output_file: &Path,
        target: TargetLanguage,
        options: &CodegenOptions,
    ) -> Result<(), Error> {
        let mut command = Command::new(&self.program);
        command
            .arg("generate")
            .args(operation_files)
            .arg("--schema")
            .arg(schema_file)
            .arg("--output")
            .arg(output_file)
            .arg("--target")
            .arg(target.as_str());
        if options.add_typename {
            command.arg("--add-typename");
        }

        tracing::debug!(program = %self.program, target = target.as_str(), "Running client code generator");
        let output = command
            .output()
            .await
            .map_err(|error| Error::Io(format!("{}: {}", self.program, error)))?;

        if !output.status.success() {
            return Err(Error::CodegenFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        return Ok(());
    }
}
