//! Wikipedia-style resolver: `HEAD {base_url}/wiki/{title}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use tracing::{debug, warn};
use url::Url;

use super::{ReferenceResolver, ResolutionDegraded, WikiConfig};
use crate::keyword::Keyword;

/// Resolves keywords by checking whether `/wiki/<keyword>` answers 2xx.
pub struct WikiResolver {
    config: WikiConfig,
    client: Client,
}

/// Percent-encode a keyword for use as a single path segment.
///
/// Everything outside the RFC 3986 unreserved set is encoded, so a space
/// becomes `%20` and `/` becomes `%2F`. The segments `.` and `..` are fully
/// encoded so URL normalization cannot collapse them.
pub fn encode_title(keyword: &Keyword) -> String {
    let encoded = urlencoding::encode(keyword.as_str()).into_owned();
    if encoded == "." || encoded == ".." {
        encoded.replace('.', "%2E")
    } else {
        encoded
    }
}

impl WikiResolver {
    pub fn new(config: WikiConfig) -> Result<Self, reqwest::Error> {
        let policy = if config.follow_redirects {
            redirect::Policy::limited(10)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .redirect(policy)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// Canonical article address for a keyword.
    pub fn article_url(&self, keyword: &Keyword) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/wiki/{}",
            self.config.base_url.trim_end_matches('/'),
            encode_title(keyword)
        ))
    }

    /// Metadata-only existence check. Only a 2xx status counts.
    async fn article_exists(&self, url: &Url) -> Result<bool, reqwest::Error> {
        let resp = self.client.head(url.clone()).send().await?;
        debug!("HEAD {} -> {}", url, resp.status());
        Ok(resp.status().is_success())
    }
}

#[async_trait]
impl ReferenceResolver for WikiResolver {
    async fn resolve(&self, keyword: &Keyword) -> Result<Option<Url>, ResolutionDegraded> {
        let url = self
            .article_url(keyword)
            .map_err(|e| ResolutionDegraded::new(keyword, format!("invalid article URL: {}", e)))?;

        match self.article_exists(&url).await {
            Ok(true) => Ok(Some(url)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Article lookup for '{}' failed: {}", keyword, e);
                Err(ResolutionDegraded::new(keyword, e.to_string()))
            }
        }
    }
}
