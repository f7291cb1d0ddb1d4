use async_trait::async_trait;

use crate::resources::{GraphqlApi, IdentityPool, UserPool, UserPoolClient};

pub mod aws;
#[cfg(test)]
pub mod mock;

#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum Error {
    #[error("Service error ocurred: {0}.")]
    ServiceError(String),

    #[error("Unknown error ocurred: {0}.")]
    UnknownError(String),

    #[error("Resource not found: {0}")]
    NotFoundError(String),

    #[error("No region configured and none could be resolved from the environment")]
    MissingRegion,
}

/// One entry of a stack resource listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StackResource {
    pub resource_type: String,
    pub logical_id: String,
    /// Missing while a resource is still being created or after it failed to create.
    pub physical_id: Option<String>,
}

impl StackResource {
    pub fn new(resource_type: &str, logical_id: &str, physical_id: &str) -> Self {
        return Self {
            resource_type: resource_type.to_string(),
            logical_id: logical_id.to_string(),
            physical_id: Some(physical_id.to_string()),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourcePage {
    pub items: Vec<StackResource>,
    pub next_token: Option<String>,
}

/// Read-only access to the deployed control plane.
#[async_trait]
pub trait CloudQuery: Send + Sync {
    async fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<ResourcePage, Error>;

    /// `api_key` is always left empty, keys come from [`CloudQuery::list_api_keys`].
    async fn get_graphql_api(&self, api_id: &str) -> Result<GraphqlApi, Error>;

    /// Introspection schema serialized as JSON.
    async fn get_introspection_schema(&self, api_id: &str) -> Result<Vec<u8>, Error>;

    async fn list_api_keys(&self, api_id: &str) -> Result<Vec<String>, Error>;

    async fn describe_identity_pool(&self, pool_id: &str) -> Result<IdentityPool, Error>;

    async fn describe_user_pool(&self, pool_id: &str) -> Result<UserPool, Error>;

    async fn describe_user_pool_client(
        &self,
        pool_id: &str,
        client_id: &str,
    ) -> Result<UserPoolClient, Error>;
}
