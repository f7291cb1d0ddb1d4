use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CloudQuery, Error, ResourcePage, StackResource};
use crate::resources::{CognitoProvider, GraphqlApi, IdentityPool, UserPool, UserPoolClient};

/// In-memory control plane. Stack listings are served in the pages they were
/// registered with; the continuation token is the index of the next page.
#[derive(Default)]
pub struct MockCloud {
    stacks: HashMap<String, Vec<Vec<StackResource>>>,
    graphql_apis: HashMap<String, GraphqlApi>,
    schemas: HashMap<String, Vec<u8>>,
    api_keys: HashMap<String, Vec<String>>,
    identity_pools: HashMap<String, IdentityPool>,
    user_pools: HashMap<String, UserPool>,
    user_pool_clients: HashMap<(String, String), UserPoolClient>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stack(mut self, stack_name: &str, pages: Vec<Vec<StackResource>>) -> Self {
        self.stacks.insert(stack_name.to_string(), pages);
        self
    }

    pub fn with_graphql_api(mut self, api_id: &str, authentication_type: &str, schema: &str) -> Self {
        self.graphql_apis.insert(
            api_id.to_string(),
            GraphqlApi {
                api_id: api_id.to_string(),
                name: Some(format!("{}-name", api_id)),
                endpoint: Some(format!(
                    "https://{}.appsync-api.eu-west-1.amazonaws.com/graphql",
                    api_id
                )),
                authentication_type: Some(authentication_type.to_string()),
                api_key: None,
            },
        );
        self.schemas
            .insert(api_id.to_string(), schema.as_bytes().to_vec());
        self
    }

    pub fn with_api_key(mut self, api_id: &str, key: &str) -> Self {
        self.api_keys
            .entry(api_id.to_string())
            .or_default()
            .push(key.to_string());
        self
    }

    pub fn with_identity_pool(
        mut self,
        pool_id: &str,
        client_ids: &[&str],
        login_providers: &[(&str, &str)],
    ) -> Self {
        self.identity_pools.insert(
            pool_id.to_string(),
            IdentityPool {
                pool_id: pool_id.to_string(),
                name: None,
                cognito_providers: client_ids
                    .iter()
                    .map(|client_id| CognitoProvider {
                        client_id: Some(client_id.to_string()),
                    })
                    .collect(),
                login_providers: login_providers
                    .iter()
                    .map(|(domain, app_id)| (domain.to_string(), app_id.to_string()))
                    .collect(),
            },
        );
        self
    }

    pub fn with_user_pool(mut self, pool_id: &str) -> Self {
        self.user_pools.insert(
            pool_id.to_string(),
            UserPool {
                pool_id: pool_id.to_string(),
                name: None,
            },
        );
        self
    }

    pub fn with_user_pool_client(mut self, pool_id: &str, client_id: &str, secret: Option<&str>) -> Self {
        self.user_pool_clients.insert(
            (pool_id.to_string(), client_id.to_string()),
            UserPoolClient {
                client_id: client_id.to_string(),
                user_pool_id: pool_id.to_string(),
                client_name: None,
                client_secret: secret.map(|secret| secret.to_string()),
            },
        );
        self
    }

    /// Every call touching `id` fails with a service error.
    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, id: &str) -> Result<(), Error> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(id) {
            return Err(Error::ServiceError(format!("{} is failing", id)));
        }
        Ok(())
    }
}

fn not_found<T>(id: &str, found: Option<&T>) -> Result<T, Error>
where
    T: Clone,
{
    found
        .cloned()
        .ok_or_else(|| Error::NotFoundError(id.to_string()))
}

#[async_trait]
impl CloudQuery for MockCloud {
    async fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<ResourcePage, Error> {
        self.record(
            format!("list_stack_resources {} {:?}", stack_name, next_token),
            stack_name,
        )?;

        let pages = match self.stacks.get(stack_name) {
            Some(pages) => pages,
            None => {
                return Err(Error::ServiceError(format!(
                    "Stack with id {} does not exist",
                    stack_name
                )))
            }
        };

        let index: usize = next_token
            .map(|token| token.parse().unwrap())
            .unwrap_or(0);
        let next_token = if index + 1 < pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(ResourcePage {
            items: pages.get(index).cloned().unwrap_or_default(),
            next_token,
        })
    }

    async fn get_graphql_api(&self, api_id: &str) -> Result<GraphqlApi, Error> {
        self.record(format!("get_graphql_api {}", api_id), api_id)?;
        not_found(api_id, self.graphql_apis.get(api_id))
    }

    async fn get_introspection_schema(&self, api_id: &str) -> Result<Vec<u8>, Error> {
        self.record(format!("get_introspection_schema {}", api_id), api_id)?;
        not_found(api_id, self.schemas.get(api_id))
    }

    async fn list_api_keys(&self, api_id: &str) -> Result<Vec<String>, Error> {
        self.record(format!("list_api_keys {}", api_id), api_id)?;
        Ok(self.api_keys.get(api_id).cloned().unwrap_or_default())
    }

    async fn describe_identity_pool(&self, pool_id: &str) -> Result<IdentityPool, Error> {
        self.record(format!("describe_identity_pool {}", pool_id), pool_id)?;
        not_found(pool_id, self.identity_pools.get(pool_id))
    }

    async fn describe_user_pool(&self, pool_id: &str) -> Result<UserPool, Error> {
        self.record(format!("describe_user_pool {}", pool_id), pool_id)?;
        not_found(pool_id, self.user_pools.get(pool_id))
    }

    async fn describe_user_pool_client(
        &self,
        pool_id: &str,
        client_id: &str,
    ) -> Result<UserPoolClient, Error> {
        self.record(
            format!("describe_user_pool_client {} {}", pool_id, client_id),
            client_id,
        )?;
        not_found(
            client_id,
            self.user_pool_clients
                .get(&(pool_id.to_string(), client_id.to_string())),
        )
    }
}
