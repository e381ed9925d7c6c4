use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::config::VaultConfig;
use crate::core::error::{EngineError, EngineResult};

/// Destination for rendered markdown notes.
#[async_trait]
pub trait NoteVault: Send + Sync {
    /// Store `content` under `filename` and return where it ended up.
    async fn write_note(&self, filename: &str, content: &str) -> EngineResult<String>;

    /// Human-readable vault location reported back to callers.
    fn location(&self) -> String;
}

pub fn from_config(config: &VaultConfig) -> Arc<dyn NoteVault> {
    match config {
        VaultConfig::Directory(path) => Arc::new(FsNoteVault::new(path.clone())),
        VaultConfig::Rest {
            base_url,
            vault_name,
            api_token,
        } => Arc::new(RestNoteVault::new(
            base_url.clone(),
            vault_name.clone(),
            api_token.clone(),
        )),
    }
}

pub struct FsNoteVault {
    root: PathBuf,
}

impl FsNoteVault {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl NoteVault for FsNoteVault {
    async fn write_note(&self, filename: &str, content: &str) -> EngineResult<String> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(filename);
        tokio::fs::write(&path, content).await?;
        info!("Wrote note {:?}", path);
        Ok(path.to_string_lossy().into_owned())
    }

    fn location(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }
}

/// Obsidian Local REST API style vault.
pub struct RestNoteVault {
    base_url: String,
    vault_name: String,
    api_token: Option<String>,
    client: Client,
}

impl RestNoteVault {
    pub fn new(base_url: String, vault_name: String, api_token: Option<String>) -> Self {
        Self {
            base_url,
            vault_name,
            api_token,
            client: Client::new(),
        }
    }

    fn note_url(&self, filename: &str) -> EngineResult<url::Url> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| EngineError::Configuration(format!("Invalid OBSIDIAN_BASE_URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                EngineError::Configuration("OBSIDIAN_BASE_URL cannot be a base URL".into())
            })?
            .pop_if_empty()
            .extend(["vault", self.vault_name.as_str(), filename]);
        Ok(url)
    }
}

#[async_trait]
impl NoteVault for RestNoteVault {
    async fn write_note(&self, filename: &str, content: &str) -> EngineResult<String> {
        let url = self.note_url(filename)?;
        debug!("PUT note to {}", url);

        let mut req = self.client.put(url).json(&json!({ "content": content }));
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(EngineError::Collaborator(format!(
                "Request failed with status {}",
                res.status()
            )));
        }
        Ok(format!("{}/{}", self.vault_name, filename))
    }

    fn location(&self) -> String {
        self.vault_name.clone()
    }
}
