use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SEARCH_SELECT: &str = "SELECT id, full_name, title, company, location, industry, ai_score, linkedin_url, created_at
    FROM client_profiles
    WHERE 1=1";

const SEARCH_ORDER: &str = " ORDER BY ai_score DESC NULLS LAST, created_at DESC";

/// Profile search criteria. Every field is a case-insensitive substring match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub industry: Option<String>,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub company_size: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: Map<String, Value>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn build_search_query(filter: &SearchFilter) -> BuiltQuery {
    let mut sql = String::from(SEARCH_SELECT);
    let mut binds = Map::new();

    let columns = [
        ("industry", "industry", &filter.industry),
        ("location", "location", &filter.location),
        ("title", "jobTitle", &filter.job_title),
        ("company_size", "companySize", &filter.company_size),
    ];
    for (column, bind, value) in columns {
        if let Some(value) = present(value) {
            sql.push_str(&format!(" AND UPPER({}) LIKE UPPER(:{})", column, bind));
            binds.insert(bind.to_string(), Value::String(format!("%{}%", value)));
        }
    }

    if let Some(keywords) = present(&filter.keywords) {
        sql.push_str(
            " AND (UPPER(full_name) LIKE UPPER(:keywords) OR UPPER(title) LIKE UPPER(:keywords) OR UPPER(company) LIKE UPPER(:keywords))",
        );
        binds.insert("keywords".into(), Value::String(format!("%{}%", keywords)));
    }

    sql.push_str(SEARCH_ORDER);
    BuiltQuery { sql, binds }
}
