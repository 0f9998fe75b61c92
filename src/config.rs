use thiserror::Error;
use url::Url;

use crate::quiz::Category;

const SITE_URL: &str = "SITE_URL";
const SHARE_ENDPOINT: &str = "SHARE_ENDPOINT";
const DEFAULT_SHARE_ENDPOINT: &str = "https://t.me/share/url";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} is not a valid url: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

fn parse(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })
}

/// Site the quiz links back to. Result images live under it as `/{category}.png`.
#[derive(Debug, Clone)]
pub struct Config {
    site_url: String,
    site_root: Url,
    share_endpoint: Url,
}

impl Config {
    /// Reads `SITE_URL` (required) and `SHARE_ENDPOINT` (defaults to Telegram's share page).
    pub fn from_env() -> Result<Self, ConfigError> {
        let site_url = std::env::var(SITE_URL).map_err(|_| ConfigError::Missing(SITE_URL))?;
        let mut config = Self::new(site_url)?;
        if let Ok(endpoint) = std::env::var(SHARE_ENDPOINT) {
            config.share_endpoint = parse(SHARE_ENDPOINT, &endpoint)?;
        }
        Ok(config)
    }

    pub fn new(site_url: impl Into<String>) -> Result<Self, ConfigError> {
        let site_url = site_url.into();
        Ok(Self {
            site_root: parse(SITE_URL, &site_url)?,
            share_endpoint: parse(SHARE_ENDPOINT, DEFAULT_SHARE_ENDPOINT)?,
            site_url,
        })
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn image_url(&self, category: Category) -> Url {
        let mut url = self.site_root.clone();
        url.set_path(&format!("/{category}.png"));
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Link that opens the share sheet pre-filled with `text`.
    pub fn share_url(&self, text: &str) -> Url {
        let mut url = self.share_endpoint.clone();
        url.query_pairs_mut().clear().append_pair("text", text);
        url
    }
}
