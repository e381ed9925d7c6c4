//! Tool handlers bound to the built-in catalog.

pub mod analysis;
pub mod linkedin;
pub mod notes;
pub mod profiles;
pub mod query;
pub mod workflow;

use std::sync::Arc;

use crate::core::collaborators::Resources;
use crate::core::orchestrator::OrchestrateSearchTool;
use crate::core::tools::ToolRegistry;
use crate::core::tools::catalog;

/// Bind a handler to every catalog entry.
///
/// `create-note` and `create_obsidian_note` share the profile-note handler,
/// which takes `{noteType, profileData, aiSummary?, customContent?}`. The
/// older `{noteType, data}` shape of `create-note` is not handled.
pub fn register_builtin_tools(registry: &mut ToolRegistry, resources: &Resources) {
    let notes = Arc::new(notes::CreateNoteTool::new(resources.vault.clone()));

    registry.register(
        catalog::ORACLE_QUERY,
        Arc::new(query::OracleQueryTool::new(resources.database.clone())),
    );
    registry.register(
        catalog::ANALYZE_PROFILE,
        Arc::new(analysis::AnalyzeProfileTool::new(resources.analyzer.clone())),
    );
    registry.register(
        catalog::TRIGGER_WORKFLOW,
        Arc::new(workflow::TriggerWorkflowTool::new(resources.workflows.clone())),
    );
    registry.register(catalog::CREATE_NOTE, notes.clone());
    registry.register(
        catalog::ORCHESTRATE_SEARCH,
        Arc::new(OrchestrateSearchTool::new(resources.clone())),
    );
    registry.register(catalog::GET_PERSON_PROFILE, Arc::new(profiles::GetPersonProfileTool));
    registry.register(
        catalog::LIST_PROFILES,
        Arc::new(query::ListProfilesTool::new(resources.database.clone())),
    );
    registry.register(catalog::CREATE_OBSIDIAN_NOTE, notes);
    registry.register(
        catalog::SEARCH_LINKEDIN,
        Arc::new(linkedin::SearchLinkedinTool::new(resources.scraper.clone())),
    );
}
