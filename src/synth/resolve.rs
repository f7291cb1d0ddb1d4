//! Cross-resource resolution for a single directive.

use crate::directive::{BucketSelection, ConfigurationDirective};
use crate::resources::{
    IdentityPool, Metadata, ResourceRecord, ResourceType, UserPoolClient, DEPLOYMENT_BUCKET,
};

use super::{Error, SynthContext};

pub const GOOGLE_PROVIDER: &str = "accounts.google.com";
pub const FACEBOOK_PROVIDER: &str = "graph.facebook.com";
pub const AMAZON_PROVIDER: &str = "www.amazon.com";

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationPool {
    pub pool_id: String,
    pub app_client_id: Option<String>,
    pub app_client_secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FederatedIdentity {
    pub pool_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphApi {
    pub endpoint: Option<String>,
    pub auth_mode: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStorage {
    pub bucket: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestEndpoint {
    pub name: String,
    pub endpoint: String,
}

/// App ids registered with third-party identity providers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FederatedProviderLinks {
    pub google_client_id: Option<String>,
    pub facebook_app_id: Option<String>,
    pub amazon_app_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    pub region: String,
    pub authentication_pool: Option<AuthenticationPool>,
    pub federated_identity: Option<FederatedIdentity>,
    pub graph_api: Option<GraphApi>,
    pub object_storage: Option<ObjectStorage>,
    pub rest_endpoints: Vec<RestEndpoint>,
    pub federated_provider_links: FederatedProviderLinks,
}

pub fn resolve(
    records: &[ResourceRecord],
    directive: &ConfigurationDirective,
    context: &SynthContext,
) -> Result<ResolvedConfiguration, Error> {
    let app_client = select_app_client(records, directive)?;

    let authentication_pool = match app_client {
        Some(client) => Some(AuthenticationPool {
            pool_id: client.user_pool_id.clone(),
            app_client_id: Some(client.client_id.clone()),
            app_client_secret: client.client_secret.clone(),
        }),
        None => records.iter().find_map(|record| match &record.metadata {
            Metadata::UserPool(pool) => Some(AuthenticationPool {
                pool_id: pool.pool_id.clone(),
                app_client_id: None,
                app_client_secret: None,
            }),
            _ => None,
        }),
    };

    let requested_client_id = match &directive.app_client {
        Some(_) => app_client.map(|client| client.client_id.as_str()),
        None => None,
    };
    let identity_pool = select_identity_pool(records, requested_client_id);

    return Ok(ResolvedConfiguration {
        region: context.region.clone(),
        authentication_pool,
        federated_identity: identity_pool.map(|pool| FederatedIdentity {
            pool_id: pool.pool_id.clone(),
        }),
        graph_api: select_graph_api(records, directive),
        object_storage: select_bucket(records, directive)?,
        rest_endpoints: rest_endpoints(records, context),
        federated_provider_links: identity_pool.map(provider_links).unwrap_or_default(),
    });
}

fn select_app_client<'a>(
    records: &'a [ResourceRecord],
    directive: &ConfigurationDirective,
) -> Result<Option<&'a UserPoolClient>, Error> {
    let name = match &directive.app_client {
        Some(name) => name,
        None => {
            return Ok(records.iter().find_map(|record| match &record.metadata {
                Metadata::UserPoolClient(Some(client)) => Some(client),
                _ => None,
            }))
        }
    };

    let record = records
        .iter()
        .find(|record| {
            record.summary.resource_type == ResourceType::UserPoolClient && record.logical_id() == name
        })
        .ok_or_else(|| Error::ResourceNotFound {
            directive: directive.name(),
            logical_id: name.clone(),
        })?;

    match &record.metadata {
        Metadata::UserPoolClient(Some(client)) => Ok(Some(client)),
        _ => Err(Error::UnresolvedAppClient {
            directive: directive.name(),
            logical_id: name.clone(),
        }),
    }
}

/// The pool federating `client_id` if there is one, else the first pool.
fn select_identity_pool<'a>(
    records: &'a [ResourceRecord],
    client_id: Option<&str>,
) -> Option<&'a IdentityPool> {
    let pools: Vec<&IdentityPool> = records
        .iter()
        .filter_map(|record| match &record.metadata {
            Metadata::IdentityPool(pool) => Some(pool),
            _ => None,
        })
        .collect();

    let federating = client_id.and_then(|client_id| {
        pools
            .iter()
            .find(|pool| pool.federates_client(client_id))
            .copied()
    });

    federating.or_else(|| pools.first().copied())
}

fn select_graph_api(records: &[ResourceRecord], directive: &ConfigurationDirective) -> Option<GraphApi> {
    let mut apis = records.iter().filter_map(|record| match &record.metadata {
        Metadata::GraphqlApi { api, .. } => Some((record.logical_id(), api)),
        _ => None,
    });

    let (logical_id, api) = apis.next()?;
    if apis.next().is_some() {
        tracing::warn!(
            directive = %directive.name(),
            used = logical_id,
            "Stack has more than one GraphQL API, using the first"
        );
    }

    Some(GraphApi {
        endpoint: api.endpoint.clone(),
        auth_mode: api.authentication_type.clone(),
        api_key: api.api_key.clone(),
    })
}

fn select_bucket(
    records: &[ResourceRecord],
    directive: &ConfigurationDirective,
) -> Result<Option<ObjectStorage>, Error> {
    let mut buckets = records.iter().filter(|record| {
        record.metadata == Metadata::Bucket && record.logical_id() != DEPLOYMENT_BUCKET
    });

    let bucket = match &directive.storage_bucket {
        BucketSelection::Disabled => None,
        BucketSelection::Auto => buckets.next(),
        BucketSelection::Named(name) => Some(
            buckets
                .find(|record| record.logical_id() == name)
                .ok_or_else(|| Error::ResourceNotFound {
                    directive: directive.name(),
                    logical_id: name.clone(),
                })?,
        ),
    };

    Ok(bucket.map(|record| ObjectStorage {
        bucket: record.physical_id().to_string(),
    }))
}

fn rest_endpoints(records: &[ResourceRecord], context: &SynthContext) -> Vec<RestEndpoint> {
    records
        .iter()
        .filter(|record| record.metadata == Metadata::RestApi)
        .map(|record| RestEndpoint {
            name: record.logical_id().to_string(),
            endpoint: format!(
                "https://{}.execute-api.{}.amazonaws.com/{}",
                record.physical_id(),
                context.region,
                context.stage
            ),
        })
        .collect()
}

fn provider_links(pool: &IdentityPool) -> FederatedProviderLinks {
    FederatedProviderLinks {
        google_client_id: pool.login_provider(GOOGLE_PROVIDER).map(String::from),
        facebook_app_id: pool.login_provider(FACEBOOK_PROVIDER).map(String::from),
        amazon_app_id: pool.login_provider(AMAZON_PROVIDER).map(String::from),
    }
}
