//! `awsconfiguration.json` as read by the mobile SDKs.

use indexmap::IndexMap;
use serde::Serialize;

use super::resolve::ResolvedConfiguration;

const USER_AGENT: &str = "aws-amplify/cli";
const VERSION: &str = "0.1.0";

#[derive(Serialize)]
struct DefaultSection<T> {
    #[serde(rename = "Default")]
    default: T,
}

impl<T> DefaultSection<T> {
    fn new(default: T) -> Self {
        Self { default }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UserPoolSection {
    pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_client_secret: Option<String>,
    region: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct IdentityPoolSection {
    pool_id: String,
    region: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CredentialsProviderSection {
    cognito_identity: DefaultSection<IdentityPoolSection>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AppSyncSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TransferUtilitySection {
    bucket: String,
    region: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EndpointSection {
    endpoint: String,
    region: String,
}

#[derive(Serialize)]
struct GoogleSection {
    #[serde(rename = "Permissions")]
    permissions: &'static str,
    #[serde(rename = "ClientId-WebApp")]
    client_id_web_app: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AppIdSection {
    app_id: String,
    permissions: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct NativeConfiguration {
    user_agent: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cognito_user_pool: Option<DefaultSection<UserPoolSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials_provider: Option<CredentialsProviderSection>,
    #[serde(rename = "AppSync", skip_serializing_if = "Option::is_none")]
    app_sync: Option<DefaultSection<AppSyncSection>>,
    #[serde(rename = "S3TransferUtility", skip_serializing_if = "Option::is_none")]
    s3_transfer_utility: Option<DefaultSection<TransferUtilitySection>>,
    #[serde(rename = "APIGateway", skip_serializing_if = "Option::is_none")]
    api_gateway: Option<IndexMap<String, EndpointSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_signin: Option<GoogleSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    facebook_signin: Option<AppIdSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amazon_signin: Option<AppIdSection>,
}

impl NativeConfiguration {
    fn from_resolved(resolved: &ResolvedConfiguration) -> Self {
        let region = &resolved.region;
        let links = &resolved.federated_provider_links;

        let api_gateway = if resolved.rest_endpoints.is_empty() {
            None
        } else {
            Some(
                resolved
                    .rest_endpoints
                    .iter()
                    .map(|endpoint| {
                        (
                            endpoint.name.clone(),
                            EndpointSection {
                                endpoint: endpoint.endpoint.clone(),
                                region: region.clone(),
                            },
                        )
                    })
                    .collect(),
            )
        };

        Self {
            user_agent: USER_AGENT,
            version: VERSION,
            cognito_user_pool: resolved.authentication_pool.as_ref().map(|pool| {
                DefaultSection::new(UserPoolSection {
                    pool_id: pool.pool_id.clone(),
                    app_client_id: pool.app_client_id.clone(),
                    app_client_secret: pool.app_client_secret.clone(),
                    region: region.clone(),
                })
            }),
            credentials_provider: resolved.federated_identity.as_ref().map(|identity| {
                CredentialsProviderSection {
                    cognito_identity: DefaultSection::new(IdentityPoolSection {
                        pool_id: identity.pool_id.clone(),
                        region: region.clone(),
                    }),
                }
            }),
            app_sync: resolved.graph_api.as_ref().map(|api| {
                DefaultSection::new(AppSyncSection {
                    api_url: api.endpoint.clone(),
                    region: region.clone(),
                    auth_mode: api.auth_mode.clone(),
                    api_key: api.api_key.clone(),
                })
            }),
            s3_transfer_utility: resolved.object_storage.as_ref().map(|storage| {
                DefaultSection::new(TransferUtilitySection {
                    bucket: storage.bucket.clone(),
                    region: region.clone(),
                })
            }),
            api_gateway,
            google_signin: links.google_client_id.as_ref().map(|client_id| GoogleSection {
                permissions: "email,profile,openid",
                client_id_web_app: client_id.clone(),
            }),
            facebook_signin: links.facebook_app_id.as_ref().map(|app_id| AppIdSection {
                app_id: app_id.clone(),
                permissions: "public_profile",
            }),
            amazon_signin: links.amazon_app_id.as_ref().map(|app_id| AppIdSection {
                app_id: app_id.clone(),
                permissions: "profile",
            }),
        }
    }
}

pub fn render(resolved: &ResolvedConfiguration) -> Result<String, serde_json::Error> {
    let mut contents = serde_json::to_string_pretty(&NativeConfiguration::from_resolved(resolved))?;
    contents.push('\n');
    return Ok(contents);
}
