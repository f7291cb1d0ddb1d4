//! Two-phase description of enumerated resources.
//!
//! Phase one describes every resource that can be looked up on its own. Phase
//! two describes user-pool clients: a client lookup needs its parent pool's
//! physical id, which comes from the template reference resolved against the
//! [`UserPoolTable`] built from phase one's output.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::Value;

use super::Error;
use crate::cloud::CloudQuery;
use crate::graphql::introspection::Schema;
use crate::resources::{Metadata, ResourceRecord, ResourceSummary, ResourceType};
use crate::template::{PoolReference, Template};

const API_KEY_AUTHENTICATION: &str = "API_KEY";

/// Logical id of each described user pool to its physical id.
#[derive(Debug, Default)]
pub struct UserPoolTable {
    pools: HashMap<String, String>,
}

impl UserPoolTable {
    /// Nested stacks may reuse a logical id; the first pool in enumeration order is kept.
    pub fn from_records(records: &[ResourceRecord]) -> Self {
        let mut pools = HashMap::new();

        for record in records {
            let pool = match &record.metadata {
                Metadata::UserPool(pool) => pool,
                _ => continue,
            };

            match pools.entry(record.logical_id().to_string()) {
                Entry::Vacant(entry) => {
                    entry.insert(pool.pool_id.clone());
                }
                Entry::Occupied(entry) => tracing::warn!(
                    logical_id = record.logical_id(),
                    kept = %entry.get(),
                    ignored = %pool.pool_id,
                    "Several user pools share a logical id"
                ),
            }
        }

        Self { pools }
    }

    /// Physical id of the pool a client's template reference points at.
    pub fn resolve<'a>(&'a self, reference: &'a PoolReference) -> Option<&'a str> {
        match reference {
            PoolReference::Logical(logical_id) => self.pools.get(logical_id).map(|id| id.as_str()),
            PoolReference::Physical(pool_id) => Some(pool_id.as_str()),
        }
    }
}

/// Describes `summaries`; user-pool clients come after every other record.
pub async fn describe(
    cloud: &dyn CloudQuery,
    template: &Template,
    summaries: &[ResourceSummary],
) -> Result<Vec<ResourceRecord>, Error> {
    let mut records = describe_resources(cloud, summaries).await?;

    let pools = UserPoolTable::from_records(&records);
    let clients = describe_user_pool_clients(cloud, template, &pools, summaries).await?;
    records.extend(clients);

    tracing::info!(count = records.len(), "Described resources");
    return Ok(records);
}

/// Phase one: everything except user-pool clients, in enumeration order.
pub async fn describe_resources(
    cloud: &dyn CloudQuery,
    summaries: &[ResourceSummary],
) -> Result<Vec<ResourceRecord>, Error> {
    let mut records = Vec::new();

    for summary in summaries {
        let metadata = match &summary.resource_type {
            ResourceType::GraphqlApi => describe_graphql_api(cloud, summary).await?,
            ResourceType::IdentityPool => Metadata::IdentityPool(
                cloud
                    .describe_identity_pool(&summary.physical_id)
                    .await
                    .map_err(|source| describe_error(summary, source))?,
            ),
            ResourceType::UserPool => Metadata::UserPool(
                cloud
                    .describe_user_pool(&summary.physical_id)
                    .await
                    .map_err(|source| describe_error(summary, source))?,
            ),
            ResourceType::Bucket => Metadata::Bucket,
            ResourceType::RestApi => Metadata::RestApi,
            ResourceType::UserPoolClient => continue,
            ResourceType::NestedStack | ResourceType::Other(_) => {
                tracing::debug!(
                    logical_id = %summary.logical_id,
                    resource_type = summary.resource_type.as_cfn(),
                    "Ignoring resource"
                );
                continue;
            }
        };

        tracing::debug!(
            logical_id = %summary.logical_id,
            name = metadata.display_name().unwrap_or_default(),
            "Described resource"
        );
        records.push(ResourceRecord {
            summary: summary.clone(),
            metadata,
        });
    }

    return Ok(records);
}

/// Phase two: user-pool clients, parents resolved through the template and `pools`.
pub async fn describe_user_pool_clients(
    cloud: &dyn CloudQuery,
    template: &Template,
    pools: &UserPoolTable,
    summaries: &[ResourceSummary],
) -> Result<Vec<ResourceRecord>, Error> {
    let mut records = Vec::new();

    for summary in summaries {
        if summary.resource_type != ResourceType::UserPoolClient {
            continue;
        }

        let pool_id = template
            .user_pool_of_client(&summary.logical_id)
            .and_then(|reference| pools.resolve(&reference).map(|id| id.to_string()));

        let client = match pool_id {
            Some(pool_id) => Some(
                cloud
                    .describe_user_pool_client(&pool_id, &summary.physical_id)
                    .await
                    .map_err(|source| describe_error(summary, source))?,
            ),
            None => {
                tracing::warn!(
                    logical_id = %summary.logical_id,
                    "Could not resolve the user pool of this client"
                );
                None
            }
        };

        let metadata = Metadata::UserPoolClient(client);
        tracing::debug!(
            logical_id = %summary.logical_id,
            name = metadata.display_name().unwrap_or_default(),
            "Described user pool client"
        );
        records.push(ResourceRecord {
            summary: summary.clone(),
            metadata,
        });
    }

    return Ok(records);
}

async fn describe_graphql_api(
    cloud: &dyn CloudQuery,
    summary: &ResourceSummary,
) -> Result<Metadata, Error> {
    let api_id = summary.graphql_api_id();

    let mut api = cloud
        .get_graphql_api(api_id)
        .await
        .map_err(|source| describe_error(summary, source))?;

    if api.authentication_type.as_deref() == Some(API_KEY_AUTHENTICATION) {
        let keys = cloud
            .list_api_keys(api_id)
            .await
            .map_err(|source| describe_error(summary, source))?;
        api.api_key = keys.into_iter().next();
    }

    let payload = cloud
        .get_introspection_schema(api_id)
        .await
        .map_err(|source| describe_error(summary, source))?;

    let schema: Value = serde_json::from_slice(&payload).map_err(|error| Error::Schema {
        logical_id: summary.logical_id.clone(),
        reason: error.to_string(),
    })?;
    Schema::from_document(&schema).map_err(|error| Error::Schema {
        logical_id: summary.logical_id.clone(),
        reason: error.to_string(),
    })?;

    return Ok(Metadata::GraphqlApi { api, schema });
}

fn describe_error(summary: &ResourceSummary, source: crate::cloud::Error) -> Error {
    Error::Describe {
        logical_id: summary.logical_id.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::cloud::mock::MockCloud;
    use crate::graphql::introspection::tests::blog_schema;

    fn template() -> Template {
        Template::from_value(json!({
            "Resources": {
                "WebClient": {
                    "Type": "AWS::Cognito::UserPoolClient",
                    "Properties": { "UserPoolId": { "Ref": "CognitoUserPool" } }
                },
                "OrphanClient": {
                    "Type": "AWS::Cognito::UserPoolClient",
                    "Properties": { "UserPoolId": { "Ref": "RemovedPool" } }
                }
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn clients_are_described_after_their_pools() {
        let cloud = MockCloud::new()
            .with_user_pool("eu-west-1_abc")
            .with_user_pool_client("eu-west-1_abc", "client-web", Some("s3cr3t"));
        let summaries = vec![
            ResourceSummary::new(ResourceType::UserPoolClient, "WebClient", "client-web"),
            ResourceSummary::new(ResourceType::UserPool, "CognitoUserPool", "eu-west-1_abc"),
        ];

        let records = describe(&cloud, &template(), &summaries).await.unwrap();

        assert_eq!(
            vec![
                String::from("describe_user_pool eu-west-1_abc"),
                String::from("describe_user_pool_client eu-west-1_abc client-web"),
            ],
            cloud.calls()
        );
        match &records[1].metadata {
            Metadata::UserPoolClient(Some(client)) => {
                assert_eq!("eu-west-1_abc", client.user_pool_id);
                assert_eq!(Some(String::from("s3cr3t")), client.client_secret);
            }
            other => panic!("Expected a described client, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn repeated_pool_logical_id_keeps_the_first_pool() {
        let cloud = MockCloud::new()
            .with_user_pool("eu-west-1_root")
            .with_user_pool("eu-west-1_nested")
            .with_user_pool_client("eu-west-1_root", "client-web", None);
        let summaries = vec![
            ResourceSummary::new(ResourceType::UserPool, "CognitoUserPool", "eu-west-1_root"),
            ResourceSummary::new(ResourceType::UserPool, "CognitoUserPool", "eu-west-1_nested"),
            ResourceSummary::new(ResourceType::UserPoolClient, "WebClient", "client-web"),
        ];

        let records = describe(&cloud, &template(), &summaries).await.unwrap();

        assert_eq!(
            Some("eu-west-1_root"),
            UserPoolTable::from_records(&records)
                .resolve(&PoolReference::Logical(String::from("CognitoUserPool")))
        );
        assert!(cloud
            .calls()
            .contains(&String::from("describe_user_pool_client eu-west-1_root client-web")));
    }

    #[tokio::test]
    async fn client_without_resolvable_pool_is_kept_undescribed() {
        let cloud = MockCloud::new();
        let summaries = vec![
            ResourceSummary::new(ResourceType::UserPoolClient, "OrphanClient", "client-orphan"),
            ResourceSummary::new(ResourceType::UserPoolClient, "NotInTemplate", "client-gone"),
        ];

        let records = describe(&cloud, &template(), &summaries).await.unwrap();

        assert_eq!(2, records.len());
        assert!(records
            .iter()
            .all(|record| record.metadata == Metadata::UserPoolClient(None)));
        assert!(cloud.calls().is_empty());
    }

    #[tokio::test]
    async fn drops_unsupported_types() {
        let cloud = MockCloud::new();
        let summaries = vec![
            ResourceSummary::new(ResourceType::Bucket, "Uploads", "uploads-bucket"),
            ResourceSummary::new(
                ResourceType::Other(String::from("AWS::Lambda::Function")),
                "Handler",
                "app-dev-handler",
            ),
            ResourceSummary::new(ResourceType::RestApi, "ApiGatewayRestApi", "a1b2c3"),
        ];

        let records = describe(&cloud, &Template::default(), &summaries).await.unwrap();

        let metadata: Vec<&Metadata> = records.iter().map(|record| &record.metadata).collect();
        assert_eq!(vec![&Metadata::Bucket, &Metadata::RestApi], metadata);
    }

    #[tokio::test]
    async fn graphql_api_with_api_key() {
        let cloud = MockCloud::new()
            .with_graphql_api("abcdefghij", "API_KEY", &blog_schema().to_string())
            .with_api_key("abcdefghij", "da2-key");
        let summaries = vec![ResourceSummary::new(
            ResourceType::GraphqlApi,
            "GraphQlApi",
            "arn:aws:appsync:eu-west-1:123456789012:apis/abcdefghij",
        )];

        let records = describe(&cloud, &Template::default(), &summaries).await.unwrap();

        match &records[0].metadata {
            Metadata::GraphqlApi { api, schema } => {
                assert_eq!(Some(String::from("da2-key")), api.api_key);
                assert_eq!(&blog_schema(), schema);
            }
            other => panic!("Expected GraphQL metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cognito_authenticated_api_skips_keys() {
        let cloud = MockCloud::new().with_graphql_api(
            "abcdefghij",
            "AMAZON_COGNITO_USER_POOLS",
            &blog_schema().to_string(),
        );
        let summaries = vec![ResourceSummary::new(ResourceType::GraphqlApi, "GraphQlApi", "abcdefghij")];

        describe(&cloud, &Template::default(), &summaries).await.unwrap();

        assert!(!cloud.calls().iter().any(|call| call.starts_with("list_api_keys")));
    }

    #[tokio::test]
    async fn malformed_schema_is_a_schema_error() {
        let cloud = MockCloud::new().with_graphql_api("abcdefghij", "AWS_IAM", "type Query {");
        let summaries = vec![ResourceSummary::new(ResourceType::GraphqlApi, "GraphQlApi", "abcdefghij")];

        match describe(&cloud, &Template::default(), &summaries).await.unwrap_err() {
            Error::Schema { logical_id, .. } => assert_eq!("GraphQlApi", logical_id),
            other => panic!("Expected `Schema` error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn lookup_failure_is_tagged_with_logical_id() {
        let cloud = MockCloud::new()
            .with_identity_pool("eu-west-1:pool", &[], &[])
            .failing("eu-west-1:pool");
        let summaries = vec![ResourceSummary::new(
            ResourceType::IdentityPool,
            "CognitoIdentityPool",
            "eu-west-1:pool",
        )];

        match describe(&cloud, &Template::default(), &summaries).await.unwrap_err() {
            Error::Describe { logical_id, .. } => assert_eq!("CognitoIdentityPool", logical_id),
            other => panic!("Expected `Describe` error, got {:?}", other),
        }
    }
}
