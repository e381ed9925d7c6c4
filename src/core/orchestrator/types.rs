use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::core::collaborators::AnalysisMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Basic,
    Detailed,
    Comprehensive,
}

impl AnalysisDepth {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisDepth::Basic => "basic",
            AnalysisDepth::Detailed => "detailed",
            AnalysisDepth::Comprehensive => "comprehensive",
        }
    }

    pub fn runs_analysis(self) -> bool {
        self != AnalysisDepth::Basic
    }

    pub fn publishes_notes(self) -> bool {
        self == AnalysisDepth::Comprehensive
    }

    pub fn analysis_mode(self) -> AnalysisMode {
        match self {
            AnalysisDepth::Comprehensive => AnalysisMode::Research,
            _ => AnalysisMode::Scoring,
        }
    }
}

/// One completed stage. The count field name differs per stage on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepSummary {
    DatabaseSearch { count: usize },
    AiAnalysis { processed: usize },
    ObsidianNotes { created: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationSummary {
    pub total_found: usize,
    pub analyzed: usize,
    pub notes_created: usize,
}

impl OrchestrationSummary {
    /// Totals are read back from the steps that actually ran.
    pub fn from_steps(steps: &[StepSummary]) -> Self {
        steps
            .iter()
            .fold(OrchestrationSummary::default(), |mut acc, step| {
                match *step {
                    StepSummary::DatabaseSearch { count } => acc.total_found = count,
                    StepSummary::AiAnalysis { processed } => acc.analyzed = processed,
                    StepSummary::ObsidianNotes { created } => acc.notes_created = created,
                }
                acc
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    pub orchestration_id: String,
    pub search_params: Value,
    pub analysis_depth: AnalysisDepth,
    pub results: Vec<StepSummary>,
    pub summary: OrchestrationSummary,
}

/// A `client_profiles` search row in select order:
/// id, full_name, title, company, location, industry, ai_score, linkedin_url, created_at.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow(pub Vec<Value>);

impl ProfileRow {
    const ID: usize = 0;
    const NAME: usize = 1;
    const TITLE: usize = 2;
    const COMPANY: usize = 3;
    const LOCATION: usize = 4;
    const INDUSTRY: usize = 5;
    const SCORE: usize = 6;
    const PROFILE_URL: usize = 7;

    fn at(&self, index: usize) -> &Value {
        self.0.get(index).unwrap_or(&Value::Null)
    }

    pub fn id(&self) -> &Value {
        self.at(Self::ID)
    }

    pub fn name(&self) -> &Value {
        self.at(Self::NAME)
    }

    pub fn score(&self) -> Option<f64> {
        self.at(Self::SCORE).as_f64()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.clone())
    }

    /// Named fields in the shape the note renderer reads.
    pub fn to_profile_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("full_name".into(), self.name().clone());
        data.insert("title".into(), self.at(Self::TITLE).clone());
        data.insert("company".into(), self.at(Self::COMPANY).clone());
        data.insert("location".into(), self.at(Self::LOCATION).clone());
        data.insert("industry".into(), self.at(Self::INDUSTRY).clone());
        data.insert("linkedin_url".into(), self.at(Self::PROFILE_URL).clone());
        data.insert(
            "ai_score".into(),
            self.score().map(|s| json!(s)).unwrap_or(Value::Null),
        );
        data
    }
}
