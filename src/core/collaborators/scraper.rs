use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::core::config::ScraperConfig;
use crate::core::error::{EngineError, EngineResult};

pub const MAX_SEARCH_RESULTS: usize = 10;

const PEOPLE_SEARCH_URL: &str = "https://www.linkedin.com/search/results/people/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProfile {
    pub name: String,
    pub title: String,
    pub profile_url: String,
}

/// People search on the professional network.
#[async_trait]
pub trait ProfileScraper: Send + Sync {
    async fn search(&self, keywords: &str, location: &str) -> EngineResult<Vec<ScrapedProfile>>;
}

pub fn people_search_url(keywords: &str) -> EngineResult<Url> {
    Url::parse_with_params(
        PEOPLE_SEARCH_URL,
        &[
            ("keywords", keywords),
            ("origin", "GLOBAL_SEARCH_HEADER"),
            ("sid", "G;O"),
        ],
    )
    .map_err(|e| EngineError::collaborator("Invalid LinkedIn search URL", e))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgentResponse {
    Bare(Vec<ScrapedProfile>),
    Wrapped { results: Vec<ScrapedProfile> },
}

/// Delegates the browser session to a scraping agent that holds the
/// `li_at` cookie on our behalf.
pub struct AgentScraper {
    config: ScraperConfig,
    client: Client,
}

impl AgentScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn fetch(
        &self,
        cookie: &str,
        keywords: &str,
        location: &str,
    ) -> EngineResult<Vec<ScrapedProfile>> {
        let agent_url = self
            .config
            .agent_url
            .as_deref()
            .ok_or_else(|| EngineError::Configuration("SCRAPER_AGENT_URL is not configured".into()))?;
        let search_url = people_search_url(keywords)?;
        debug!("Scraping {} via {}", search_url, agent_url);

        let res = self
            .client
            .post(agent_url)
            .header("Cookie", format!("li_at={}", cookie))
            .json(&json!({
                "keywords": keywords,
                "location": location,
                "searchUrl": search_url.as_str(),
            }))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(EngineError::Collaborator(format!(
                "Request failed with status {}",
                res.status()
            )));
        }

        let mut profiles = match res.json::<AgentResponse>().await? {
            AgentResponse::Bare(list) => list,
            AgentResponse::Wrapped { results } => results,
        };
        profiles.truncate(MAX_SEARCH_RESULTS);
        Ok(profiles)
    }
}

#[async_trait]
impl ProfileScraper for AgentScraper {
    async fn search(&self, keywords: &str, location: &str) -> EngineResult<Vec<ScrapedProfile>> {
        let cookie = self.config.session_cookie.as_deref().ok_or_else(|| {
            EngineError::Configuration("LinkedIn session cookie is not configured.".into())
        })?;
        self.fetch(cookie, keywords, location)
            .await
            .map_err(|e| e.with_prefix("LinkedIn search failed"))
    }
}
