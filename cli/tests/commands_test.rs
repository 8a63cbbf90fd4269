use dirsweep_cli::commands::{crawl, filter, targets};
use dirsweep_cli::state::AppState;
use dirsweep_core::AppConfig;
use serde_json::{json, Value};
use tempfile::TempDir;

fn state_in(tmp: &TempDir) -> AppState {
    let mut config = AppConfig::default();
    config.storage.data_dir = tmp.path().join("data");
    AppState::from_config(config).expect("build state")
}

#[tokio::test]
async fn test_filter_writes_deduplicated_file() {
    let tmp = TempDir::new().expect("create temp dir");
    let state = state_in(&tmp);

    let target_dir = tmp.path().join("data/trinity");
    std::fs::create_dir_all(&target_dir).expect("create target dir");
    let results = json!([
        {"name": "Doe, Sam", "email": "sam@example.edu"},
        {"name": "Lee, Kim", "email": "kim@example.edu"},
        {"name": "Doe, Samuel", "email": "sam@example.edu"}
    ]);
    std::fs::write(
        target_dir.join("results.json"),
        serde_json::to_string_pretty(&results).expect("serialize"),
    )
    .expect("write results");

    let report = filter::filter(&state, "trinity").await.expect("filter");
    assert_eq!(report.before, 3);
    assert_eq!(report.after, 2);

    let raw = std::fs::read_to_string(target_dir.join("filtered.json")).expect("read output");
    let filtered: Value = serde_json::from_str(&raw).expect("parse output");
    assert_eq!(
        filtered,
        json!([
            {"name": "Doe, Sam", "email": "sam@example.edu"},
            {"name": "Lee, Kim", "email": "kim@example.edu"}
        ])
    );
}

#[tokio::test]
async fn test_filter_unknown_target() {
    let tmp = TempDir::new().expect("create temp dir");
    let state = state_in(&tmp);

    assert!(filter::filter(&state, "nowhere").await.is_err());
}

#[test]
fn test_list_includes_loaded_definitions() {
    let tmp = TempDir::new().expect("create temp dir");
    let defs = tmp.path().join("targets");
    std::fs::create_dir_all(&defs).expect("create defs dir");
    std::fs::write(
        defs.join("state-u.toml"),
        r#"
[target]
id = "state-u"
name = "State University"
seed = "pairs"

[search]
method = "json-api"
url = "https://people.example.edu/search"
"#,
    )
    .expect("write definition");

    let mut config = AppConfig::default();
    config.targets.definitions_dir = Some(defs);
    let state = AppState::from_config(config).expect("build state");

    let listing = targets::list_targets(&state);
    let ids: Vec<_> = listing.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["psu", "state-u", "trinity"]);

    let state_u = &listing[1];
    assert_eq!(state_u.method, "json-api");
    assert_eq!(state_u.seeds, 676);
    assert!(state_u.to_string().contains("State University"));
}

#[test]
fn test_missing_definitions_dir_is_an_error() {
    let mut config = AppConfig::default();
    config.targets.definitions_dir = Some("/nonexistent/dirsweep/targets".into());

    assert!(AppState::from_config(config).is_err());
}

#[tokio::test]
async fn test_crawl_rejects_bad_options_before_querying() {
    let tmp = TempDir::new().expect("create temp dir");
    let state = state_in(&tmp);

    let bad_seed = crawl::CrawlOptions {
        seeds: vec!["two words".to_string()],
        ..crawl::CrawlOptions::default()
    };
    assert!(crawl::crawl(&state, "psu", bad_seed).await.is_err());

    let zero_cap = crawl::CrawlOptions {
        max_query_len: Some(0),
        ..crawl::CrawlOptions::default()
    };
    assert!(crawl::crawl(&state, "psu", zero_cap).await.is_err());

    assert!(!tmp.path().join("data/psu").exists());
}
