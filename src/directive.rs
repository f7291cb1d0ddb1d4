use std::path::{Path, PathBuf};

/// Value of `s3bucket` that turns the storage section off for a directive.
pub const BUCKET_DISABLED: &str = "disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Native,
    ScriptModule,
    TypedScriptModule,
    SchemaDocument,
    OperationStubs,
    GeneratedClientCode,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        let format = match value {
            "native" => OutputFormat::Native,
            "javascript" => OutputFormat::ScriptModule,
            "typescript" => OutputFormat::TypedScriptModule,
            "schema.json" => OutputFormat::SchemaDocument,
            "graphql" => OutputFormat::OperationStubs,
            "appsync" => OutputFormat::GeneratedClientCode,
            _ => return None,
        };

        return Some(format);
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Native => "native",
            OutputFormat::ScriptModule => "javascript",
            OutputFormat::TypedScriptModule => "typescript",
            OutputFormat::SchemaDocument => "schema.json",
            OutputFormat::OperationStubs => "graphql",
            OutputFormat::GeneratedClientCode => "appsync",
        }
    }

    /// Whether a file with this extension can hold the output of this format.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        match self {
            OutputFormat::Native | OutputFormat::SchemaDocument => extension == "json",
            OutputFormat::ScriptModule => extension == "js",
            OutputFormat::TypedScriptModule => extension == "ts",
            OutputFormat::OperationStubs => OperationsLanguage::from_extension(extension).is_some(),
            OutputFormat::GeneratedClientCode => TargetLanguage::from_extension(extension).is_some(),
        }
    }
}

/// Which storage bucket a directive wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketSelection {
    Auto,
    Named(String),
    Disabled,
}

impl BucketSelection {
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            None => BucketSelection::Auto,
            Some(BUCKET_DISABLED) => BucketSelection::Disabled,
            Some(name) => BucketSelection::Named(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationDirective {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub app_client: Option<String>,
    pub storage_bucket: BucketSelection,
}

#[cfg(test)]
impl ConfigurationDirective {
    pub fn new(output_path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        return Self {
            output_path: output_path.into(),
            format,
            app_client: None,
            storage_bucket: BucketSelection::Auto,
        };
    }

    pub fn with_app_client(mut self, app_client: impl Into<String>) -> Self {
        self.app_client = Some(app_client.into());
        self
    }

    pub fn with_storage_bucket(mut self, storage_bucket: BucketSelection) -> Self {
        self.storage_bucket = storage_bucket;
        self
    }
}

impl ConfigurationDirective {
    /// Label used in error messages and logs.
    pub fn name(&self) -> String {
        self.output_path.display().to_string()
    }

    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.output_path)
    }
}

pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|extension| extension.to_str())
}

/// Language of a sample-operations artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationsLanguage {
    Graphql,
    JavaScript,
    TypeScript,
    Flow,
}

impl OperationsLanguage {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "graphql" | "gql" => Some(OperationsLanguage::Graphql),
            "js" => Some(OperationsLanguage::JavaScript),
            "ts" => Some(OperationsLanguage::TypeScript),
            "flow" => Some(OperationsLanguage::Flow),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        extension_of(path).and_then(Self::from_extension)
    }
}

/// Target of the external client code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLanguage {
    Swift,
    TypeScript,
    Flow,
    Scala,
    Json,
}

impl TargetLanguage {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "swift" => Some(TargetLanguage::Swift),
            "ts" => Some(TargetLanguage::TypeScript),
            "flow" => Some(TargetLanguage::Flow),
            "scala" => Some(TargetLanguage::Scala),
            "json" => Some(TargetLanguage::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        extension_of(path).and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::Swift => "swift",
            TargetLanguage::TypeScript => "typescript",
            TargetLanguage::Flow => "flow",
            TargetLanguage::Scala => "scala",
            TargetLanguage::Json => "json",
        }
    }
}
