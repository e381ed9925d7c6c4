use serde_json::json;

use crate::core::collaborators::RelationalExecutor;
use crate::core::collaborators::fakes::{FakeAnalyzer, FakeWorld};
use crate::core::orchestrator::{SearchFilter, build_search_query};

#[test]
fn empty_filter_builds_unfiltered_default_ordered_query() {
    let built = build_search_query(&SearchFilter::default());
    assert!(built.binds.is_empty());
    assert!(!built.sql.contains(" AND "));
    assert!(built.sql.contains("FROM client_profiles"));
    assert!(built.sql.contains("WHERE 1=1"));
    assert!(
        built
            .sql
            .ends_with(" ORDER BY ai_score DESC NULLS LAST, created_at DESC")
    );
}

#[test]
fn industry_alone_adds_one_case_insensitive_predicate() {
    let filter = SearchFilter {
        industry: Some("Tech".into()),
        ..Default::default()
    };
    let built = build_search_query(&filter);
    assert_eq!(built.sql.matches(" AND ").count(), 1);
    assert!(built.sql.contains(" AND UPPER(industry) LIKE UPPER(:industry)"));
    assert_eq!(built.binds.len(), 1);
    assert_eq!(built.binds["industry"], json!("%Tech%"));
}

#[test]
fn job_title_maps_to_title_column() {
    let filter: SearchFilter =
        serde_json::from_value(json!({ "jobTitle": "CTO", "location": "Berlin" })).unwrap();
    let built = build_search_query(&filter);
    assert!(built.sql.contains("UPPER(title) LIKE UPPER(:jobTitle)"));
    assert!(built.sql.contains("UPPER(location) LIKE UPPER(:location)"));
    assert_eq!(built.binds["jobTitle"], json!("%CTO%"));
}

#[test]
fn empty_strings_are_treated_as_absent() {
    let filter = SearchFilter {
        industry: Some(String::new()),
        keywords: Some(String::new()),
        ..Default::default()
    };
    assert!(build_search_query(&filter).binds.is_empty());
}

#[test]
fn keywords_share_one_bind_across_columns() {
    let filter = SearchFilter {
        keywords: Some("acme".into()),
        company_size: Some("51-200".into()),
        ..Default::default()
    };
    let built = build_search_query(&filter);
    assert_eq!(built.sql.matches(":keywords").count(), 3);
    assert_eq!(built.binds["keywords"], json!("%acme%"));
    assert_eq!(built.binds["companySize"], json!("%51-200%"));
}

#[tokio::test]
async fn industry_filter_matches_substring_case_insensitively() {
    let world = FakeWorld::new(FakeAnalyzer::default());
    world
        .seed(&[
            ("a", "FinTech", None),
            ("b", "Healthcare", None),
            ("c", "edtech platforms", None),
        ])
        .await;
    let built = build_search_query(&SearchFilter {
        industry: Some("tech".into()),
        ..Default::default()
    });
    let out = world
        .database
        .execute(&built.sql, &built.binds)
        .await
        .unwrap();
    let mut names: Vec<String> = out
        .rows
        .iter()
        .map(|r| r[1].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a", "c"]);
}
