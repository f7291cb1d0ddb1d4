use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};
use validator::{Validate, ValidationError};

use crate::directive::{BucketSelection, ConfigurationDirective, OutputFormat};
use crate::graphql::codegen::DEFAULT_CODEGEN_COMMAND;
use crate::template::DEFAULT_TEMPLATE_PATH;

const DEFAULT_STAGE: &str = "dev";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Validation errors: {0}")]
    ValidationError(String),

    #[error("Invalid output #{index} of stack {stack}: {reason}")]
    InvalidDirective {
        stack: String,
        index: usize,
        reason: String,
    },

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_output_extension"))]
pub struct OutputEntry {
    #[validate(required)]
    pub filename: Option<PathBuf>,

    #[serde(rename = "type")]
    #[validate(required, custom = "validate_format")]
    pub format: Option<String>,

    #[serde(rename = "appClient", skip_serializing_if = "Option::is_none")]
    pub app_client: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3bucket: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ConfigEntry {
    #[validate(required)]
    pub stack_name: Option<String>,

    pub region: Option<String>,

    pub stage: Option<String>,

    pub template: Option<PathBuf>,

    pub codegen_command: Option<String>,

    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
}

impl ConfigEntry {
    pub fn stack_name(&self) -> &str {
        self.stack_name.as_deref().unwrap_or_default()
    }

    pub fn stage(&self) -> &str {
        self.stage.as_deref().unwrap_or(DEFAULT_STAGE)
    }

    pub fn template_path(&self) -> PathBuf {
        match &self.template {
            Some(template) => template.clone(),
            None => PathBuf::from(DEFAULT_TEMPLATE_PATH),
        }
    }

    pub fn codegen_command(&self) -> &str {
        self.codegen_command
            .as_deref()
            .unwrap_or(DEFAULT_CODEGEN_COMMAND)
    }

    /// Every output of the entry as a directive; the first invalid one fails the whole list.
    pub fn directives(&self) -> Result<Vec<ConfigurationDirective>, Error> {
        let mut directives = Vec::with_capacity(self.outputs.len());

        for (index, output) in self.outputs.iter().enumerate() {
            let invalid = |reason: String| Error::InvalidDirective {
                stack: self.stack_name().to_string(),
                index,
                reason,
            };

            if let Err(error) = output.validate() {
                return Err(invalid(error.to_string()));
            }

            let format = output.format.as_deref().and_then(OutputFormat::parse);
            let (filename, format) = match (&output.filename, format) {
                (Some(filename), Some(format)) => (filename, format),
                _ => return Err(invalid(String::from("`filename` and `type` are required"))),
            };

            directives.push(ConfigurationDirective {
                output_path: filename.clone(),
                format,
                app_client: output.app_client.clone(),
                storage_bucket: BucketSelection::from_option(output.s3bucket.as_deref()),
            });
        }

        return Ok(directives);
    }
}

pub type Config = Vec<ConfigEntry>;
pub fn parse(path: &PathBuf) -> Result<Config, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(raw_contents) => Ok(raw_contents),
        Err(error) => match error.kind() {
            io::ErrorKind::NotFound => Err(Error::FileNotFound(path.display().to_string())),
            _ => Err(Error::Unknown(error.to_string())),
        },
    }?;

    let config: Config = match serde_yaml::from_str(&contents) {
        Ok(data) => Ok(data),
        Err(error) => Err(Error::ParsingError(error.to_string())),
    }?;

    for config_entry in &config {
        match config_entry.validate() {
            Ok(_) => (),
            Err(error) => return Err(Error::ValidationError(error.to_string())),
        }
        config_entry.directives()?;
    }

    return Ok(config);
}

fn validate_format(format: &str) -> Result<(), ValidationError> {
    match OutputFormat::parse(format) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("Unknown output type")),
    }
}

fn validate_output_extension(output: &OutputEntry) -> Result<(), ValidationError> {
    let format = match output.format.as_deref().and_then(OutputFormat::parse) {
        Some(format) => format,
        None => return Ok(()),
    };

    let file_extension = match output
        .filename
        .as_ref()
        .and_then(|filename| filename.extension())
        .and_then(|extension| extension.to_str())
    {
        Some(extension) => extension,
        None => {
            return Err(ValidationError::new(
                "Unable to parse the extension of the output file location",
            ))
        }
    };
    if !format.accepts_extension(file_extension) {
        return Err(ValidationError::new(
            "The output file extension does not match the output type",
        ));
    }

    return Ok(());
}
