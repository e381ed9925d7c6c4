use serde_json::{Map, Value};

use super::ToolDefinition;
use super::contract::{FieldKind, InputContract};

pub const ORACLE_QUERY: &str = "oracle-query";
pub const ANALYZE_PROFILE: &str = "analyze-profile";
pub const TRIGGER_WORKFLOW: &str = "trigger-workflow";
pub const CREATE_NOTE: &str = "create-note";
pub const ORCHESTRATE_SEARCH: &str = "orchestrate-search";
pub const GET_PERSON_PROFILE: &str = "get_person_profile";
pub const LIST_PROFILES: &str = "list_profiles";
pub const CREATE_OBSIDIAN_NOTE: &str = "create_obsidian_note";
pub const SEARCH_LINKEDIN: &str = "search_linkedin";

pub const ANALYSIS_TYPES: &[&str] = &["scoring", "outreach", "research"];
pub const ANALYSIS_DEPTHS: &[&str] = &["basic", "detailed", "comprehensive"];
pub const NOTE_TYPES: &[&str] = &["client", "lead", "analysis", "meeting"];

pub const RESOURCE_TYPES: &[(&str, &str)] = &[
    ("LINKEDIN_PROFILE", "linkedin-profile"),
    ("SEARCH_QUERY", "search-query"),
    ("CLIENT_ANALYSIS", "client-analysis"),
    ("OBSIDIAN_NOTE", "obsidian-note"),
    ("N8N_WORKFLOW", "n8n-workflow"),
];

pub fn resource_types() -> Value {
    let mut map = Map::new();
    for (key, value) in RESOURCE_TYPES {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Value::Object(map)
}

/// The fixed tool catalog, in discovery order.
pub fn builtin_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ORACLE_QUERY,
            "Execute Oracle database queries",
            InputContract::new()
                .optional("query", FieldKind::String)
                .optional("binds", FieldKind::Object),
        ),
        ToolDefinition::new(
            ANALYZE_PROFILE,
            "Analyze LinkedIn profile with Claude",
            InputContract::new()
                .optional("profileData", FieldKind::Object)
                .optional("analysisType", FieldKind::Enum(ANALYSIS_TYPES)),
        ),
        ToolDefinition::new(
            TRIGGER_WORKFLOW,
            "Trigger n8n workflow execution",
            InputContract::new()
                .optional("workflowId", FieldKind::String)
                .optional("payload", FieldKind::Object),
        ),
        ToolDefinition::new(
            CREATE_NOTE,
            "Create structured note in Obsidian",
            InputContract::new()
                .optional("noteType", FieldKind::String)
                .optional("data", FieldKind::Object),
        ),
        ToolDefinition::new(
            ORCHESTRATE_SEARCH,
            "Coordinate multi-tool search process",
            InputContract::new()
                .optional("searchParams", FieldKind::Object)
                .required("analysisDepth", FieldKind::Enum(ANALYSIS_DEPTHS)),
        ),
        ToolDefinition::new(
            GET_PERSON_PROFILE,
            "Get LinkedIn person profile data",
            InputContract::new()
                .optional("linkedinUrl", FieldKind::String)
                .optional("profileId", FieldKind::String),
        ),
        ToolDefinition::new(
            LIST_PROFILES,
            "List all profiles from the database",
            InputContract::new()
                .optional("limit", FieldKind::Number)
                .optional("offset", FieldKind::Number),
        ),
        ToolDefinition::new(
            CREATE_OBSIDIAN_NOTE,
            "Create a structured note in Obsidian vault",
            InputContract::new()
                .required("noteType", FieldKind::Enum(NOTE_TYPES))
                .required("profileData", FieldKind::Object)
                .optional("aiSummary", FieldKind::String)
                .optional("customContent", FieldKind::String),
        ),
        ToolDefinition::new(
            SEARCH_LINKEDIN,
            "Search LinkedIn for people profiles using keywords",
            InputContract::new()
                .required("keywords", FieldKind::String)
                .optional("location", FieldKind::String),
        ),
    ]
}
