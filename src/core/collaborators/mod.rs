pub mod analyzer;
pub mod database;
#[cfg(test)]
pub mod fakes;
pub mod scraper;
pub mod vault;
pub mod workflow;

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::core::config::EngineConfig;
use crate::core::error::EngineResult;
use crate::core::tracker::{KeyValueStore, SqliteKeyValueStore};

pub use analyzer::{AnalysisMode, ClaudeAnalyzer, ProfileAnalyzer};
pub use database::{QueryOutput, RelationalExecutor, SqliteExecutor};
pub use scraper::{AgentScraper, ProfileScraper, ScrapedProfile};
pub use vault::{FsNoteVault, NoteVault, RestNoteVault};
pub use workflow::{N8nClient, WorkflowTrigger};

/// Every external service the tools talk to, opened once at startup.
#[derive(Clone)]
pub struct Resources {
    pub database: Arc<dyn RelationalExecutor>,
    pub state: Arc<dyn KeyValueStore>,
    pub analyzer: Arc<dyn ProfileAnalyzer>,
    pub workflows: Arc<dyn WorkflowTrigger>,
    pub vault: Arc<dyn NoteVault>,
    pub scraper: Arc<dyn ProfileScraper>,
}

fn ensure_parent(path: &Path) -> EngineResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

impl Resources {
    pub fn open(config: &EngineConfig) -> EngineResult<Self> {
        ensure_parent(&config.database_path)?;
        ensure_parent(&config.state_db_path)?;

        let database = SqliteExecutor::open(&config.database_path)?;
        info!("Profile database opened at {:?}", config.database_path);
        let state = SqliteKeyValueStore::open(&config.state_db_path)?;
        info!("Execution store opened at {:?}", config.state_db_path);

        Ok(Self {
            database: Arc::new(database),
            state: Arc::new(state),
            analyzer: Arc::new(ClaudeAnalyzer::new(config.claude.clone())),
            workflows: Arc::new(N8nClient::new(config.n8n.clone())),
            vault: vault::from_config(&config.vault),
            scraper: Arc::new(AgentScraper::new(config.scraper.clone())),
        })
    }
}
