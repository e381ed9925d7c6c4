use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tracing::{debug, info};

use super::query::{SearchFilter, build_search_query};
use super::types::{AnalysisDepth, ProfileRow, StepSummary};
use crate::core::collaborators::Resources;
use crate::core::error::EngineResult;
use crate::core::handlers::notes::{NoteRequest, publish_note};

pub const MAX_ANALYZED: usize = 10;
pub const MAX_NOTES: usize = 5;

const UPDATE_SCORE_SQL: &str = "UPDATE client_profiles SET ai_score = :score WHERE id = :id";

/// State threaded through the stages of one orchestration.
pub struct PipelineState {
    pub resources: Resources,
    pub depth: AnalysisDepth,
    pub rows: Vec<ProfileRow>,
}

impl PipelineState {
    pub fn new(resources: Resources, depth: AnalysisDepth) -> Self {
        Self {
            resources,
            depth,
            rows: Vec::new(),
        }
    }
}

#[async_trait]
pub trait StageAction: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this stage runs at the given depth.
    fn gate(&self, depth: AnalysisDepth) -> bool;

    async fn run(&self, state: &mut PipelineState) -> EngineResult<StepSummary>;
}

/// Run gated stages in order. The first failure aborts the remaining stages;
/// side effects of earlier stages are kept.
pub async fn run_stages(
    stages: &[Box<dyn StageAction>],
    state: &mut PipelineState,
) -> EngineResult<Vec<StepSummary>> {
    let mut steps = Vec::new();
    for stage in stages {
        if !stage.gate(state.depth) {
            debug!("Skipping stage {} at depth {}", stage.name(), state.depth.as_str());
            continue;
        }
        let summary = stage.run(state).await?;
        info!("Stage {} finished: {:?}", stage.name(), summary);
        steps.push(summary);
    }
    Ok(steps)
}

fn by_score_desc_nulls_last(a: &ProfileRow, b: &ProfileRow) -> Ordering {
    match (a.score(), b.score()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable ranking by score, highest first, unscored rows last in arrival order.
pub fn rank_top(rows: &[ProfileRow], limit: usize) -> Vec<&ProfileRow> {
    let mut ranked: Vec<&ProfileRow> = rows.iter().collect();
    ranked.sort_by(|a, b| by_score_desc_nulls_last(a, b));
    ranked.truncate(limit);
    ranked
}

pub fn default_stages(filter: SearchFilter) -> Vec<Box<dyn StageAction>> {
    vec![
        Box::new(DatabaseSearch { filter }),
        Box::new(ProfileAnalysis),
        Box::new(NotePublishing),
    ]
}

pub struct DatabaseSearch {
    pub filter: SearchFilter,
}

#[async_trait]
impl StageAction for DatabaseSearch {
    fn name(&self) -> &'static str {
        "database_search"
    }

    fn gate(&self, _depth: AnalysisDepth) -> bool {
        true
    }

    async fn run(&self, state: &mut PipelineState) -> EngineResult<StepSummary> {
        let query = build_search_query(&self.filter);
        let output = state
            .resources
            .database
            .execute(&query.sql, &query.binds)
            .await?;
        state.rows = output.rows.into_iter().map(ProfileRow).collect();
        Ok(StepSummary::DatabaseSearch {
            count: state.rows.len(),
        })
    }
}

/// Scores the first rows in arrival order, one at a time, writing each score
/// back before the next call.
pub struct ProfileAnalysis;

#[async_trait]
impl StageAction for ProfileAnalysis {
    fn name(&self) -> &'static str {
        "ai_analysis"
    }

    fn gate(&self, depth: AnalysisDepth) -> bool {
        depth.runs_analysis()
    }

    async fn run(&self, state: &mut PipelineState) -> EngineResult<StepSummary> {
        let mode = state.depth.analysis_mode();
        let mut processed = 0;
        for row in state.rows.iter().take(MAX_ANALYZED) {
            let analysis = state.resources.analyzer.analyze(&row.to_value(), mode).await?;

            let mut binds = Map::new();
            binds.insert(
                "score".into(),
                analysis.get("score").cloned().unwrap_or(Value::Null),
            );
            binds.insert("id".into(), row.id().clone());
            state
                .resources
                .database
                .execute(UPDATE_SCORE_SQL, &binds)
                .await?;
            processed += 1;
        }
        Ok(StepSummary::AiAnalysis { processed })
    }
}

/// Publishes a client note for each of the top-ranked rows. Ranking uses the
/// scores as they were when the search ran.
pub struct NotePublishing;

#[async_trait]
impl StageAction for NotePublishing {
    fn name(&self) -> &'static str {
        "obsidian_notes"
    }

    fn gate(&self, depth: AnalysisDepth) -> bool {
        depth.publishes_notes()
    }

    async fn run(&self, state: &mut PipelineState) -> EngineResult<StepSummary> {
        let top = rank_top(&state.rows, MAX_NOTES);
        for row in &top {
            let request = NoteRequest {
                note_type: Some("client".into()),
                profile_data: Some(row.to_profile_data()),
                ai_summary: row.score().map(|s| format!("Fit score: {}/10", s)),
                custom_content: None,
            };
            publish_note(state.resources.vault.as_ref(), &request, Utc::now()).await?;
        }
        Ok(StepSummary::ObsidianNotes { created: top.len() })
    }
}
