use anyhow::Context as _;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use shared::{extract_bearer_token, init_tracing, AppError, Claims, JwtValidator};
use std::collections::HashMap;
use tracing::{info, warn};

/// API Gateway TOKEN authorizer event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct AuthorizerRequest {
    #[serde(rename = "type")]
    request_type: String,
    authorization_token: Option<String>,
    method_arn: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizerResponse {
    principal_id: String,
    policy_document: PolicyDocument,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    context: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PolicyDocument {
    version: String,
    statement: Vec<Statement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Statement {
    action: String,
    effect: String,
    resource: String,
}

/// principalId reported when no caller could be identified
const ANONYMOUS_PRINCIPAL: &str = "user";

/// Single-statement policy for `execute-api:Invoke` on `resource`
fn generate_policy(effect: &str, resource: &str) -> PolicyDocument {
    PolicyDocument {
        version: "2012-10-17".to_string(),
        statement: vec![Statement {
            action: "execute-api:Invoke".to_string(),
            effect: effect.to_string(),
            resource: resource.to_string(),
        }],
    }
}

fn verify(validator: &JwtValidator, authorization: Option<&str>) -> Result<Claims, AppError> {
    let token = extract_bearer_token(authorization)?;
    validator.validate_token(token)
}

/// Allow for a verified token, Deny for anything else. Never fails: a
/// rejected token must produce a policy, not an invocation error.
fn authorize(validator: &JwtValidator, request: &AuthorizerRequest) -> AuthorizerResponse {
    match verify(validator, request.authorization_token.as_deref()) {
        Ok(claims) => {
            info!(user_id = %claims.sub, method_arn = %request.method_arn, "User authorized");
            let context = HashMap::from([("userId".to_string(), claims.sub.clone())]);
            AuthorizerResponse {
                principal_id: claims.sub,
                policy_document: generate_policy("Allow", &request.method_arn),
                context,
            }
        }
        Err(e) => {
            warn!(error = %e, method_arn = %request.method_arn, "User not authorized");
            AuthorizerResponse {
                principal_id: ANONYMOUS_PRINCIPAL.to_string(),
                policy_document: generate_policy("Deny", &request.method_arn),
                context: HashMap::new(),
            }
        }
    }
}

fn load_validator() -> anyhow::Result<JwtValidator> {
    let certificate = std::env::var("AUTH_CERTIFICATE")
        .context("AUTH_CERTIFICATE environment variable is not set")?;
    let validator = JwtValidator::from_rsa_pem(certificate.as_bytes())?;
    Ok(validator)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing()?;

    let validator = load_validator()?;
    info!("Lambda authorizer starting");

    run(service_fn(move |event: LambdaEvent<AuthorizerRequest>| {
        let response = authorize(&validator, &event.payload);
        async move { Ok::<_, Error>(response) }
    }))
    .await
}
