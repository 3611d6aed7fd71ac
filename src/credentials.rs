use std::time::SystemTime;

use anyhow::Context;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_cognitoidentity::Client;
use aws_sdk_dynamodb::config::Credentials;

use crate::config::AwsConfig;

pub const PROVIDER_NAME: &str = "CognitoIdentity";

/// Exchanges the anonymous identity pool id for temporary credentials.
pub async fn bootstrap(config: &AwsConfig) -> Result<Credentials, anyhow::Error> {
    log::info!("Connecting to AWS");

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .no_credentials()
        .load()
        .await;
    let client = Client::new(&sdk_config);

    let identity = client
        .get_id()
        .identity_pool_id(&config.identity_pool_id)
        .send()
        .await
        .with_context(|| format!("Failed to get identity from pool {}", config.identity_pool_id))?;
    let identity_id = identity
        .identity_id()
        .context("Identity pool returned no identity id")?;
    log::debug!("Using identity {identity_id}");

    let output = client
        .get_credentials_for_identity()
        .identity_id(identity_id)
        .send()
        .await
        .context("Failed to get credentials for identity")?;
    let credentials = output
        .credentials()
        .context("Identity pool returned no credentials")?;

    let credentials = Credentials::new(
        credentials
            .access_key_id()
            .context("Credentials are missing the access key id")?,
        credentials
            .secret_key()
            .context("Credentials are missing the secret key")?,
        credentials.session_token().map(str::to_string),
        credentials
            .expiration()
            .and_then(|t| SystemTime::try_from(*t).ok()),
        PROVIDER_NAME,
    );

    log::info!("Connected!");

    Ok(credentials)
}
