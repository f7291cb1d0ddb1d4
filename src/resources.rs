//! Deployed resources as seen by the generator.
//!
//! A [`ResourceSummary`] is what the stack listing reports. A [`ResourceRecord`]
//! is a summary enriched with the type-specific metadata the describe pass
//! fetched for it.

use serde_json::Value;

/// Logical id of the bucket the deployment framework uploads artifacts to.
pub const DEPLOYMENT_BUCKET: &str = "ServerlessDeploymentBucket";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceType {
    GraphqlApi,
    IdentityPool,
    UserPool,
    UserPoolClient,
    Bucket,
    RestApi,
    NestedStack,
    Other(String),
}

impl ResourceType {
    pub fn from_cfn(resource_type: &str) -> Self {
        match resource_type {
            "AWS::AppSync::GraphQLApi" => ResourceType::GraphqlApi,
            "AWS::Cognito::IdentityPool" => ResourceType::IdentityPool,
            "AWS::Cognito::UserPool" => ResourceType::UserPool,
            "AWS::Cognito::UserPoolClient" => ResourceType::UserPoolClient,
            "AWS::S3::Bucket" => ResourceType::Bucket,
            "AWS::ApiGateway::RestApi" => ResourceType::RestApi,
            "AWS::CloudFormation::Stack" => ResourceType::NestedStack,
            other => ResourceType::Other(other.to_string()),
        }
    }

    pub fn as_cfn(&self) -> &str {
        match self {
            ResourceType::GraphqlApi => "AWS::AppSync::GraphQLApi",
            ResourceType::IdentityPool => "AWS::Cognito::IdentityPool",
            ResourceType::UserPool => "AWS::Cognito::UserPool",
            ResourceType::UserPoolClient => "AWS::Cognito::UserPoolClient",
            ResourceType::Bucket => "AWS::S3::Bucket",
            ResourceType::RestApi => "AWS::ApiGateway::RestApi",
            ResourceType::NestedStack => "AWS::CloudFormation::Stack",
            ResourceType::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary {
    pub resource_type: ResourceType,
    pub logical_id: String,
    pub physical_id: String,
}

impl ResourceSummary {
    pub fn new(
        resource_type: ResourceType,
        logical_id: impl Into<String>,
        physical_id: impl Into<String>,
    ) -> Self {
        return Self {
            resource_type,
            logical_id: logical_id.into(),
            physical_id: physical_id.into(),
        };
    }

    /// AppSync reports its API as an ARN (`arn:aws:appsync:...:apis/<id>`).
    pub fn graphql_api_id(&self) -> &str {
        match self.physical_id.rsplit_once("apis/") {
            Some((_, api_id)) => api_id,
            None => &self.physical_id,
        }
    }

    /// Nested stacks are reported as stack ARNs (`arn:aws:cloudformation:...:stack/<name>/<guid>`).
    pub fn nested_stack_name(&self) -> &str {
        match self.physical_id.split('/').nth(1) {
            Some(name) if !name.is_empty() => name,
            _ => &self.physical_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlApi {
    pub api_id: String,
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub authentication_type: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CognitoProvider {
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentityPool {
    pub pool_id: String,
    pub name: Option<String>,
    pub cognito_providers: Vec<CognitoProvider>,
    /// Provider domain (e.g. `accounts.google.com`) to the app id registered with it.
    pub login_providers: Vec<(String, String)>,
}

impl IdentityPool {
    pub fn federates_client(&self, client_id: &str) -> bool {
        self.cognito_providers
            .iter()
            .any(|provider| provider.client_id.as_deref() == Some(client_id))
    }

    pub fn login_provider(&self, domain: &str) -> Option<&str> {
        self.login_providers
            .iter()
            .find(|(key, _)| key == domain)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserPool {
    pub pool_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserPoolClient {
    pub client_id: String,
    pub user_pool_id: String,
    pub client_name: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    GraphqlApi { api: GraphqlApi, schema: Value },
    IdentityPool(IdentityPool),
    UserPool(UserPool),
    /// `None` when the client's parent pool could not be resolved from the template.
    UserPoolClient(Option<UserPoolClient>),
    Bucket,
    RestApi,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    pub summary: ResourceSummary,
    pub metadata: Metadata,
}

impl Metadata {
    /// Human readable name reported by the service, when it has one.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Metadata::GraphqlApi { api, .. } => api.name.as_deref(),
            Metadata::IdentityPool(pool) => pool.name.as_deref(),
            Metadata::UserPool(pool) => pool.name.as_deref(),
            Metadata::UserPoolClient(client) => client.as_ref().and_then(|client| client.client_name.as_deref()),
            Metadata::Bucket | Metadata::RestApi => None,
        }
    }
}

impl ResourceRecord {
    pub fn logical_id(&self) -> &str {
        &self.summary.logical_id
    }

    pub fn physical_id(&self) -> &str {
        &self.summary.physical_id
    }
}
