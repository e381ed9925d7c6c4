//! In-process collaborators for handler and pipeline tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    AnalysisMode, NoteVault, ProfileAnalyzer, ProfileScraper, Resources, ScrapedProfile,
    SqliteExecutor, WorkflowTrigger,
};
use crate::core::error::{EngineError, EngineResult};
use crate::core::tracker::SqliteKeyValueStore;

/// Returns scores in call order; the `fail_on`-th call (1-based) errors.
/// `calls` records finished calls only.
#[derive(Default)]
pub struct FakeAnalyzer {
    pub scores: Vec<Option<f64>>,
    pub fail_on: Option<usize>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<(Value, AnalysisMode)>>,
}

impl FakeAnalyzer {
    pub fn scoring(scores: Vec<Option<f64>>) -> Self {
        Self {
            scores,
            ..Default::default()
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            scores: vec![Some(7.0); 16],
            fail_on: Some(call),
            ..Default::default()
        }
    }

    pub fn slow(scores: Vec<Option<f64>>, delay: Duration) -> Self {
        Self {
            scores,
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileAnalyzer for FakeAnalyzer {
    async fn analyze(&self, profile: &Value, mode: AnalysisMode) -> EngineResult<Value> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((profile.clone(), mode));
            calls.len()
        };
        if self.fail_on == Some(n) {
            return Err(EngineError::collaborator(
                "Claude analysis failed",
                "529 overloaded",
            ));
        }
        match self.scores.get(n - 1).copied().flatten() {
            Some(score) => Ok(json!({ "score": score, "reasoning": "fake" })),
            None => Ok(json!({ "reasoning": "no score" })),
        }
    }
}

#[derive(Default)]
pub struct FakeVault {
    pub notes: Mutex<Vec<(String, String)>>,
}

impl FakeVault {
    pub fn filenames(&self) -> Vec<String> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl NoteVault for FakeVault {
    async fn write_note(&self, filename: &str, content: &str) -> EngineResult<String> {
        self.notes
            .lock()
            .unwrap()
            .push((filename.to_string(), content.to_string()));
        Ok(format!("memory/{}", filename))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Default)]
pub struct FakeWorkflows {
    pub triggered: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl WorkflowTrigger for FakeWorkflows {
    async fn trigger(&self, workflow_id: &str, payload: &Value) -> EngineResult<Value> {
        self.triggered
            .lock()
            .unwrap()
            .push((workflow_id.to_string(), payload.clone()));
        Ok(json!({ "executionId": "n8n-1", "status": "triggered", "workflowId": workflow_id }))
    }
}

#[derive(Default)]
pub struct FakeScraper {
    pub profiles: Vec<ScrapedProfile>,
}

#[async_trait]
impl ProfileScraper for FakeScraper {
    async fn search(&self, _keywords: &str, _location: &str) -> EngineResult<Vec<ScrapedProfile>> {
        Ok(self.profiles.clone())
    }
}

/// Handles to the fakes behind a [`Resources`] bundle.
pub struct FakeWorld {
    pub resources: Resources,
    pub database: Arc<SqliteExecutor>,
    pub state: Arc<SqliteKeyValueStore>,
    pub analyzer: Arc<FakeAnalyzer>,
    pub vault: Arc<FakeVault>,
    pub workflows: Arc<FakeWorkflows>,
}

impl FakeWorld {
    pub fn new(analyzer: FakeAnalyzer) -> Self {
        Self::with_scraper(analyzer, FakeScraper::default())
    }

    pub fn with_scraper(analyzer: FakeAnalyzer, scraper: FakeScraper) -> Self {
        let database = Arc::new(SqliteExecutor::in_memory().unwrap());
        let analyzer = Arc::new(analyzer);
        let vault = Arc::new(FakeVault::default());
        let workflows = Arc::new(FakeWorkflows::default());
        let state = Arc::new(SqliteKeyValueStore::in_memory().unwrap());
        let resources = Resources {
            database: database.clone(),
            state: state.clone(),
            analyzer: analyzer.clone(),
            workflows: workflows.clone(),
            vault: vault.clone(),
            scraper: Arc::new(scraper),
        };
        Self {
            resources,
            database,
            state,
            analyzer,
            vault,
            workflows,
        }
    }

    /// Insert `(full_name, industry, ai_score)` rows in order; ids start at 1.
    pub async fn seed(&self, rows: &[(&str, &str, Option<f64>)]) {
        let db = self.database.get_db();
        let db = db.lock().await;
        for (name, industry, score) in rows {
            db.execute(
                "INSERT INTO client_profiles (full_name, title, company, location, industry, ai_score, linkedin_url, created_at)
                 VALUES (?1, 'Engineer', 'Acme', 'Berlin', ?2, ?3, 'https://linkedin.com/in/x', '2024-01-01 00:00:00')",
                rusqlite::params![name, industry, score],
            )
            .unwrap();
        }
    }

    pub async fn scores(&self) -> Vec<Option<f64>> {
        let db = self.database.get_db();
        let db = db.lock().await;
        let mut stmt = db
            .prepare("SELECT ai_score FROM client_profiles ORDER BY id")
            .unwrap();
        let scores = stmt
            .query_map([], |row| row.get::<_, Option<f64>>(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        scores
    }
}
