//! `aws-exports` style source modules.

use chrono::SecondsFormat;
use serde::Serialize;

use super::resolve::ResolvedConfiguration;
use super::SynthContext;

/// Declared for every key the module can carry, whichever ones a stack populates.
const EXPORTS_INTERFACE: &str = "export interface AwsExports {
    aws_project_region: string;
    aws_cognito_identity_pool_id?: string;
    aws_cognito_region?: string;
    aws_user_pools_id?: string;
    aws_user_pools_web_client_id?: string;
    aws_appsync_graphqlEndpoint?: string;
    aws_appsync_region?: string;
    aws_appsync_authenticationType?: string;
    aws_appsync_apiKey?: string;
    aws_user_files_s3_bucket?: string;
    aws_user_files_s3_bucket_region?: string;
    aws_cloud_logic_custom?: {
        name: string;
        endpoint: string;
        region: string;
    }[];
}
";

#[derive(Serialize)]
struct CloudLogicEndpoint {
    name: String,
    endpoint: String,
    region: String,
}

#[derive(Serialize)]
struct ScriptConfiguration {
    aws_project_region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_cognito_identity_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_cognito_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_user_pools_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_user_pools_web_client_id: Option<String>,
    #[serde(rename = "aws_appsync_graphqlEndpoint", skip_serializing_if = "Option::is_none")]
    aws_appsync_graphql_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_appsync_region: Option<String>,
    #[serde(rename = "aws_appsync_authenticationType", skip_serializing_if = "Option::is_none")]
    aws_appsync_authentication_type: Option<String>,
    #[serde(rename = "aws_appsync_apiKey", skip_serializing_if = "Option::is_none")]
    aws_appsync_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_user_files_s3_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_user_files_s3_bucket_region: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    aws_cloud_logic_custom: Vec<CloudLogicEndpoint>,
}

impl ScriptConfiguration {
    fn from_resolved(resolved: &ResolvedConfiguration) -> Self {
        let region = &resolved.region;
        let pool = resolved.authentication_pool.as_ref();
        let api = resolved.graph_api.as_ref();
        let storage = resolved.object_storage.as_ref();

        let uses_cognito = pool.is_some() || resolved.federated_identity.is_some();

        Self {
            aws_project_region: region.clone(),
            aws_cognito_identity_pool_id: resolved
                .federated_identity
                .as_ref()
                .map(|identity| identity.pool_id.clone()),
            aws_cognito_region: uses_cognito.then(|| region.clone()),
            aws_user_pools_id: pool.map(|pool| pool.pool_id.clone()),
            aws_user_pools_web_client_id: pool.and_then(|pool| pool.app_client_id.clone()),
            aws_appsync_graphql_endpoint: api.and_then(|api| api.endpoint.clone()),
            aws_appsync_region: api.map(|_| region.clone()),
            aws_appsync_authentication_type: api.and_then(|api| api.auth_mode.clone()),
            aws_appsync_api_key: api.and_then(|api| api.api_key.clone()),
            aws_user_files_s3_bucket: storage.map(|storage| storage.bucket.clone()),
            aws_user_files_s3_bucket_region: storage.map(|_| region.clone()),
            aws_cloud_logic_custom: resolved
                .rest_endpoints
                .iter()
                .map(|endpoint| CloudLogicEndpoint {
                    name: endpoint.name.clone(),
                    endpoint: endpoint.endpoint.clone(),
                    region: region.clone(),
                })
                .collect(),
        }
    }
}

pub fn render(
    resolved: &ResolvedConfiguration,
    context: &SynthContext,
    typed: bool,
) -> Result<String, serde_json::Error> {
    let object = serde_json::to_string_pretty(&ScriptConfiguration::from_resolved(resolved))?;

    let mut contents = format!(
        "// WARNING: DO NOT EDIT. This file is automatically generated.\n// Written by {} on {}\n\n",
        env!("CARGO_PKG_NAME"),
        context
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    if typed {
        contents.push_str(EXPORTS_INTERFACE);
        contents.push_str(&format!("\nconst awsmobile: AwsExports = {};\n", object));
    } else {
        contents.push_str(&format!("const awsmobile = {};\n", object));
    }
    contents.push_str("\nexport default awsmobile;\n");

    return Ok(contents);
}
