use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_appsync::model::OutputType;
use aws_sdk_cloudformation::types::SdkError;
use aws_types::region::Region;

use super::{CloudQuery, Error, ResourcePage, StackResource};
use crate::resources::{CognitoProvider, GraphqlApi, IdentityPool, UserPool, UserPoolClient};

pub struct AwsCloudQuery {
    pub region: String,

    cloudformation: aws_sdk_cloudformation::Client,
    appsync: aws_sdk_appsync::Client,
    identity: aws_sdk_cognitoidentity::Client,
    user_pools: aws_sdk_cognitoidentityprovider::Client,
}

impl AwsCloudQuery {
    pub async fn new(region: Option<&String>) -> Result<Self, Error> {
        let region = match region {
            Some(provided_region) => Region::new(provided_region.clone()),
            None => match RegionProviderChain::default_provider().region().await {
                Some(resolved_region) => resolved_region,
                None => return Err(Error::MissingRegion),
            },
        };

        let region_name = region.to_string();
        let sdk_config = aws_config::from_env().region(region).load().await;

        return Ok(Self {
            region: region_name,
            cloudformation: aws_sdk_cloudformation::Client::new(&sdk_config),
            appsync: aws_sdk_appsync::Client::new(&sdk_config),
            identity: aws_sdk_cognitoidentity::Client::new(&sdk_config),
            user_pools: aws_sdk_cognitoidentityprovider::Client::new(&sdk_config),
        });
    }
}

fn sdk_error<E>(error: SdkError<E>) -> Error
where
    E: std::error::Error + 'static,
{
    match error {
        SdkError::ServiceError { err, .. } => Error::ServiceError(err.to_string()),
        err => Error::UnknownError(err.to_string()),
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(|value| value.to_string())
}

#[async_trait]
impl CloudQuery for AwsCloudQuery {
    async fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<ResourcePage, Error> {
        let result = self
            .cloudformation
            .list_stack_resources()
            .stack_name(stack_name)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(sdk_error)?;

        let items = result
            .stack_resource_summaries()
            .unwrap_or_else(|| &[])
            .iter()
            .map(|summary| StackResource {
                resource_type: summary.resource_type().unwrap_or_default().to_string(),
                logical_id: summary.logical_resource_id().unwrap_or_default().to_string(),
                physical_id: owned(summary.physical_resource_id()),
            })
            .collect();

        return Ok(ResourcePage {
            items,
            next_token: owned(result.next_token()),
        });
    }

    async fn get_graphql_api(&self, api_id: &str) -> Result<GraphqlApi, Error> {
        let result = self
            .appsync
            .get_graphql_api()
            .api_id(api_id)
            .send()
            .await
            .map_err(sdk_error)?;

        let api = match result.graphql_api() {
            Some(api) => api,
            None => return Err(Error::NotFoundError(api_id.to_string())),
        };

        return Ok(GraphqlApi {
            api_id: api_id.to_string(),
            name: owned(api.name()),
            endpoint: api.uris().and_then(|uris| uris.get("GRAPHQL")).cloned(),
            authentication_type: api
                .authentication_type()
                .map(|authentication_type| authentication_type.as_str().to_string()),
            api_key: None,
        });
    }

    async fn get_introspection_schema(&self, api_id: &str) -> Result<Vec<u8>, Error> {
        let result = self
            .appsync
            .get_introspection_schema()
            .api_id(api_id)
            .format(OutputType::Json)
            .send()
            .await
            .map_err(sdk_error)?;

        match result.schema() {
            Some(schema) => Ok(schema.as_ref().to_vec()),
            None => Err(Error::NotFoundError(format!("schema of {}", api_id))),
        }
    }

    async fn list_api_keys(&self, api_id: &str) -> Result<Vec<String>, Error> {
        let result = self
            .appsync
            .list_api_keys()
            .api_id(api_id)
            .send()
            .await
            .map_err(sdk_error)?;

        let keys = result
            .api_keys()
            .unwrap_or_else(|| &[])
            .iter()
            .filter_map(|key| owned(key.id()))
            .collect();

        return Ok(keys);
    }

    async fn describe_identity_pool(&self, pool_id: &str) -> Result<IdentityPool, Error> {
        let result = self
            .identity
            .describe_identity_pool()
            .identity_pool_id(pool_id)
            .send()
            .await
            .map_err(sdk_error)?;

        let cognito_providers = result
            .cognito_identity_providers()
            .unwrap_or_else(|| &[])
            .iter()
            .map(|provider| CognitoProvider {
                client_id: owned(provider.client_id()),
            })
            .collect();

        let mut login_providers: Vec<(String, String)> = result
            .supported_login_providers()
            .map(|providers| {
                providers
                    .iter()
                    .map(|(domain, app_id)| (domain.clone(), app_id.clone()))
                    .collect()
            })
            .unwrap_or_default();
        login_providers.sort();

        return Ok(IdentityPool {
            pool_id: pool_id.to_string(),
            name: owned(result.identity_pool_name()),
            cognito_providers,
            login_providers,
        });
    }

    async fn describe_user_pool(&self, pool_id: &str) -> Result<UserPool, Error> {
        let result = self
            .user_pools
            .describe_user_pool()
            .user_pool_id(pool_id)
            .send()
            .await
            .map_err(sdk_error)?;

        let pool = match result.user_pool() {
            Some(pool) => pool,
            None => return Err(Error::NotFoundError(pool_id.to_string())),
        };

        return Ok(UserPool {
            pool_id: pool_id.to_string(),
            name: owned(pool.name()),
        });
    }

    async fn describe_user_pool_client(
        &self,
        pool_id: &str,
        client_id: &str,
    ) -> Result<UserPoolClient, Error> {
        let result = self
            .user_pools
            .describe_user_pool_client()
            .user_pool_id(pool_id)
            .client_id(client_id)
            .send()
            .await
            .map_err(sdk_error)?;

        let client = match result.user_pool_client() {
            Some(client) => client,
            None => return Err(Error::NotFoundError(client_id.to_string())),
        };

        return Ok(UserPoolClient {
            client_id: client_id.to_string(),
            user_pool_id: client.user_pool_id().unwrap_or(pool_id).to_string(),
            client_name: owned(client.client_name()),
            client_secret: owned(client.client_secret()),
        });
    }
}
