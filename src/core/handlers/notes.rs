use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

use crate::core::collaborators::NoteVault;
use crate::core::error::{EngineError, EngineResult};
use crate::core::tools::{ToolHandler, check_input, parse_input};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub note_type: Option<String>,
    pub profile_data: Option<Map<String, Value>>,
    pub ai_summary: Option<String>,
    pub custom_content: Option<String>,
}

/// Non-empty text value of a profile field; numbers are rendered as-is.
fn field(profile: &Map<String, Value>, key: &str) -> Option<String> {
    match profile.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Keep ASCII alphanumerics and whitespace, then collapse whitespace runs to `_`.
pub fn safe_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn tag(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

pub fn note_filename(note_type: &str, profile: &Map<String, Value>, now: DateTime<Utc>) -> String {
    let name = field(profile, "full_name").unwrap_or_else(|| "Unknown".to_string());
    format!(
        "{}_{}_{}.md",
        note_type,
        safe_file_stem(&name),
        now.format("%Y-%m-%d")
    )
}

pub fn format_note(
    note_type: &str,
    profile: &Map<String, Value>,
    ai_summary: Option<&str>,
    custom_content: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let name = field(profile, "full_name");
    let company = field(profile, "company");
    let location = field(profile, "location");
    let or_na = |v: Option<String>| v.unwrap_or_else(|| "N/A".to_string());

    let mut content = String::new();
    let _ = writeln!(
        content,
        "# {}\n",
        name.as_deref().unwrap_or("Unknown Profile")
    );
    let _ = writeln!(content, "**Type:** {}", note_type);
    let _ = writeln!(
        content,
        "**Created:** {}",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    let _ = writeln!(
        content,
        "**Status:** {}\n",
        field(profile, "status").unwrap_or_else(|| "Unknown".to_string())
    );

    content.push_str("## Profile Information\n\n");
    let _ = writeln!(content, "- **Name:** {}", or_na(name.clone()));
    let _ = writeln!(content, "- **Title:** {}", or_na(field(profile, "title")));
    let _ = writeln!(content, "- **Company:** {}", or_na(company.clone()));
    let _ = writeln!(content, "- **Location:** {}", or_na(location.clone()));
    let linkedin = field(profile, "linkedin_url")
        .map(|url| format!("[View Profile]({})", url))
        .unwrap_or_else(|| "N/A".to_string());
    let _ = writeln!(content, "- **LinkedIn:** {}\n", linkedin);

    if let Some(summary) = ai_summary.filter(|s| !s.is_empty()) {
        let _ = write!(content, "## AI Analysis\n\n{}\n\n", summary);
    }
    if let Some(custom) = custom_content.filter(|s| !s.is_empty()) {
        let _ = write!(content, "## Additional Notes\n\n{}\n\n", custom);
    }

    content.push_str("## Tags\n\n");
    let _ = write!(content, "#{} #linkedin #profile", note_type);
    if let Some(company) = company {
        let _ = write!(content, " #{}", tag(&company));
    }
    if let Some(location) = location {
        let _ = write!(content, " #{}", tag(&location));
    }
    content
}

/// Render a note and hand it to the vault.
pub async fn publish_note(
    vault: &dyn NoteVault,
    request: &NoteRequest,
    now: DateTime<Utc>,
) -> EngineResult<Value> {
    let note_type = request
        .note_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| EngineError::Validation("noteType is required".into()))?;
    let profile = request
        .profile_data
        .as_ref()
        .ok_or_else(|| EngineError::Validation("profileData is required".into()))?;

    let content = format_note(
        note_type,
        profile,
        request.ai_summary.as_deref(),
        request.custom_content.as_deref(),
        now,
    );
    let filename = note_filename(note_type, profile, now);
    let path = vault.write_note(&filename, &content).await?;
    info!("Created {} note {}", note_type, filename);

    Ok(json!({
        "success": true,
        "filename": filename,
        "path": path,
        "noteType": note_type,
        "profileName": profile.get("full_name").cloned().unwrap_or(Value::Null),
        "vaultPath": vault.location(),
    }))
}

pub struct CreateNoteTool {
    vault: Arc<dyn NoteVault>,
}

impl CreateNoteTool {
    pub fn new(vault: Arc<dyn NoteVault>) -> Self {
        Self { vault }
    }
}

#[async_trait]
impl ToolHandler for CreateNoteTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        check_input::<NoteRequest>(input)
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let req: NoteRequest = parse_input(input)?;
        publish_note(self.vault.as_ref(), &req, Utc::now())
            .await
            .map_err(|e| e.with_prefix("Obsidian note creation failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collaborators::fakes::FakeVault;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).single().unwrap()
    }

    fn profile(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn file_stem_strips_punctuation_and_collapses_spaces() {
        assert_eq!(safe_file_stem("Dr. Ada  Lovelace-King"), "Dr_Ada_LovelaceKing");
        assert_eq!(safe_file_stem("José Núñez"), "Jos_Nez");
    }

    #[test]
    fn filename_uses_type_name_and_date() {
        let p = profile(json!({ "full_name": "Grace Hopper" }));
        assert_eq!(
            note_filename("lead", &p, fixed_now()),
            "lead_Grace_Hopper_2024-03-09.md"
        );
        assert_eq!(
            note_filename("lead", &Map::new(), fixed_now()),
            "lead_Unknown_2024-03-09.md"
        );
    }

    #[test]
    fn note_renders_sections_and_tags() {
        let p = profile(json!({
            "full_name": "Grace Hopper",
            "title": "Rear Admiral",
            "company": "US Navy",
            "location": "New York, NY",
            "linkedin_url": "https://linkedin.com/in/grace"
        }));
        let note = format_note("client", &p, Some("Fit score: 9/10"), None, fixed_now());

        assert!(note.starts_with("# Grace Hopper\n\n**Type:** client\n"));
        assert!(note.contains("**Created:** 2024-03-09T14:05:00.000Z\n"));
        assert!(note.contains("**Status:** Unknown\n\n"));
        assert!(note.contains("- **LinkedIn:** [View Profile](https://linkedin.com/in/grace)\n\n"));
        assert!(note.contains("## AI Analysis\n\nFit score: 9/10\n\n"));
        assert!(!note.contains("## Additional Notes"));
        assert!(note.ends_with("#client #linkedin #profile #us_navy #new_york__ny"));
    }

    #[test]
    fn missing_fields_render_as_placeholders() {
        let note = format_note("meeting", &Map::new(), None, Some("Call on Friday"), fixed_now());
        assert!(note.starts_with("# Unknown Profile\n"));
        assert!(note.contains("- **Title:** N/A\n"));
        assert!(note.contains("- **LinkedIn:** N/A\n"));
        assert!(note.contains("## Additional Notes\n\nCall on Friday\n\n"));
        assert!(note.ends_with("#meeting #linkedin #profile"));
    }

    #[tokio::test]
    async fn tool_writes_note_and_reports_location() {
        let vault = Arc::new(FakeVault::default());
        let tool = CreateNoteTool::new(vault.clone());
        let out = tool
            .call(json!({ "noteType": "client", "profileData": { "full_name": "Ada" } }))
            .await
            .unwrap();

        assert_eq!(out["success"], json!(true));
        assert_eq!(out["profileName"], json!("Ada"));
        assert_eq!(out["vaultPath"], json!("memory"));
        let filename = out["filename"].as_str().unwrap();
        assert!(filename.starts_with("client_Ada_"));
        assert_eq!(vault.filenames(), vec![filename.to_string()]);
    }

    #[tokio::test]
    async fn legacy_shape_without_profile_data_fails_in_handler() {
        let tool = CreateNoteTool::new(Arc::new(FakeVault::default()));
        let err = tool
            .call(json!({ "noteType": "client", "data": { "name": "Ada" } }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Obsidian note creation failed: profileData is required"
        );
    }
}
