use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{FetchError, Follower, Profile, RemoteProfileClient};

/// Client for the public GitHub REST API.
///
/// Preconfigured with the `User-Agent` and `Accept` headers GitHub expects
/// and a whole-request timeout. The base URL is a constructor parameter so
/// tests can point the client at a local fake API.
pub struct GithubProfileClient {
    http: Client,
    base_url: String,
}

impl GithubProfileClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url: String = base_url.into();

        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static("github-profile-finder"));
        headers.insert(
            "Accept",
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        username: &str,
        url: String,
    ) -> std::result::Result<T, FetchError> {
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                username: username.to_string(),
            });
        }

        let response = response
            .error_for_status()
            .map_err(|err| FetchError::transport(err.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::transport(format!("invalid response body: {err}")))
    }
}

#[async_trait]
impl RemoteProfileClient for GithubProfileClient {
    async fn fetch_profile(&self, username: &str) -> std::result::Result<Profile, FetchError> {
        let url = format!("{}/users/{username}", self.base_url);
        debug!(username, url = %url, "github: fetching profile");
        self.get_json(username, url).await
    }

    async fn fetch_followers(
        &self,
        username: &str,
    ) -> std::result::Result<Vec<Follower>, FetchError> {
        let url = format!("{}/users/{username}/followers", self.base_url);
        debug!(username, url = %url, "github: fetching followers");
        self.get_json(username, url).await
    }
}

#[cfg(test)]
#[path = "tests/github_tests.rs"]
mod tests;
