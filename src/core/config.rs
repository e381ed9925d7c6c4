use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CLAUDE_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-sonnet-20240229";

/// Process configuration. Credentials are optional here: a missing key only
/// fails the tool that needs it, when that tool is first called.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub state_db_path: PathBuf,
    pub claude: ClaudeConfig,
    pub n8n: N8nConfig,
    pub vault: VaultConfig,
    pub scraper: ScraperConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaudeConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct N8nConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VaultConfig {
    /// Notes are written straight into a vault directory on disk.
    Directory(PathBuf),
    /// Notes are PUT to an Obsidian REST endpoint.
    Rest {
        base_url: String,
        vault_name: String,
        api_token: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    pub agent_url: Option<String>,
    pub session_cookie: Option<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".prospect-mcp")
}

impl EngineConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = get("MCP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let vault = match get("OBSIDIAN_BASE_URL") {
            Some(base_url) => VaultConfig::Rest {
                base_url,
                vault_name: get("OBSIDIAN_VAULT_NAME").unwrap_or_default(),
                api_token: get("OBSIDIAN_API_TOKEN"),
            },
            None => VaultConfig::Directory(
                get("OBSIDIAN_VAULT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| data_dir.join("vault")),
            ),
        };

        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            log_level: get("MCP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("profiles.db")),
            state_db_path: get("STATE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("state.db")),
            claude: ClaudeConfig {
                api_key: get("CLAUDE_API_KEY"),
                api_url: get("CLAUDE_API_URL")
                    .unwrap_or_else(|| DEFAULT_CLAUDE_API_URL.to_string()),
                model: get("CLAUDE_MODEL").unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
            },
            n8n: N8nConfig {
                base_url: get("N8N_BASE_URL"),
                api_key: get("N8N_API_KEY"),
            },
            vault,
            scraper: ScraperConfig {
                agent_url: get("SCRAPER_AGENT_URL"),
                session_cookie: get("LINKEDIN_MCP_SERVER_COOKIE"),
            },
            data_dir,
        }
    }

    /// Apply `--host` / `--port` overrides from the command line.
    pub fn apply_cli_flags(&mut self, args: &[String], start: usize) {
        let mut i = start;
        while i < args.len() {
            match args[i].as_str() {
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        self.port = args[i + 1].parse().unwrap_or(self.port);
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "--host" => {
                    if i + 1 < args.len() {
                        self.host = args[i + 1].clone();
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
