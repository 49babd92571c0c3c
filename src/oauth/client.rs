use anyhow::Context;
use oauth2::{basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};

use crate::{config::GoogleConfig, oauth::dto::GoogleProfile};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Build the OAuth client for Google's authorization-code flow.
pub fn oauth_client(google: &GoogleConfig) -> anyhow::Result<BasicClient> {
    let auth_url =
        AuthUrl::new(AUTH_URL.to_string()).context("invalid authorization endpoint URL")?;
    let token_url = TokenUrl::new(TOKEN_URL.to_string()).context("invalid token endpoint URL")?;
    let redirect_url =
        RedirectUrl::new(google.redirect_url.clone()).context("invalid redirect URL")?;

    Ok(BasicClient::new(
        ClientId::new(google.client_id.clone()),
        Some(ClientSecret::new(google.client_secret.clone())),
        auth_url,
        Some(token_url),
    )
    .set_redirect_uri(redirect_url))
}

/// Fetch the user's profile from the Google userinfo endpoint.
pub async fn fetch_profile(
    http: &reqwest::Client,
    access_token: &str,
) -> anyhow::Result<GoogleProfile> {
    let profile = http
        .get(USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await
        .context("userinfo request failed")?
        .error_for_status()
        .context("userinfo request rejected")?
        .json::<GoogleProfile>()
        .await
        .context("userinfo response was not valid JSON")?;

    Ok(profile)
}
