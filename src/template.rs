use std::collections::HashMap;
use std::{fs, io, path::Path};

use serde::Deserialize;
use serde_json::Value;

/// Where the deployment framework leaves the compiled stack template.
pub const DEFAULT_TEMPLATE_PATH: &str = ".serverless/cloudformation-template-update-stack.json";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Template {0} not found")]
    FileNotFound(String),

    #[error("Template parsing error: {0}")]
    ParsingError(String),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

#[derive(Debug, Deserialize)]
struct TemplateResource {
    #[serde(rename = "Properties", default)]
    properties: Value,
}

/// Compiled CloudFormation template, reduced to the resource properties.
#[derive(Debug, Default, Deserialize)]
pub struct Template {
    #[serde(rename = "Resources", default)]
    resources: HashMap<String, TemplateResource>,
}

/// How a user-pool client names its parent pool in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolReference {
    /// `{"Ref": "<logical id>"}` to a pool declared in the same deployment.
    Logical(String),
    /// A literal pool id.
    Physical(String),
}

impl Template {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = match fs::read_to_string(path) {
            Ok(raw_contents) => Ok(raw_contents),
            Err(error) => match error.kind() {
                io::ErrorKind::NotFound => Err(Error::FileNotFound(path.display().to_string())),
                _ => Err(Error::Unknown(error.to_string())),
            },
        }?;

        return Self::parse(&contents);
    }

    pub fn parse(contents: &str) -> Result<Self, Error> {
        serde_json::from_str(contents).map_err(|error| Error::ParsingError(error.to_string()))
    }

    #[cfg(test)]
    pub fn from_value(value: Value) -> Result<Self, Error> {
        serde_json::from_value(value).map_err(|error| Error::ParsingError(error.to_string()))
    }

    /// Parent pool declared by the user-pool client `client_logical_id`.
    pub fn user_pool_of_client(&self, client_logical_id: &str) -> Option<PoolReference> {
        let resource = self.resources.get(client_logical_id)?;

        match resource.properties.get("UserPoolId")? {
            Value::String(pool_id) => Some(PoolReference::Physical(pool_id.clone())),
            Value::Object(reference) => match reference.get("Ref") {
                Some(Value::String(logical_id)) => Some(PoolReference::Logical(logical_id.clone())),
                _ => None,
            },
            _ => None,
        }
    }
}
