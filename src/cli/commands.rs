//! CLI command implementations
//!
//! Each command loads the configuration, does its work against the stores
//! under `data_dir`, and returns the response payload. `run_command` writes
//! the payload as a single JSON response.
//!
//! The last `analyze` result is kept in `last_analysis.json` so `apply`
//! refers to exactly the recommendations the user saw.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::advisor::{RandomSource, SeededRandom, ThreadRandom};
use crate::dashboard::{applied_for_query, DashboardMetrics};
use crate::ingest;
use crate::observability::{log_event_with_fields, set_min_severity, Event, ObservationScope};
use crate::orchestrator::{
    apply_recommendation, AppliedIndex, AppliedSet, BatchAnalysis, QueryAnalysisBundle,
    QueryAnalyzer, RawQuery,
};
use crate::planner::ExplainPlan;
use crate::store::{FileStore, RecordStore};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. Failures are
/// also reported as a JSON error response before being returned.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = write_error(e.code_str(), e.message());
            Err(e)
        }
    }
}

/// Run the appropriate command and write its response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = match cmd {
        Command::Upload { config, file } => upload(&load_config(&config)?, &file)?,
        Command::Analyze { config } => analyze(&load_config(&config)?)?,
        Command::Explain { config, sql } => explain(&load_config(&config)?, &sql)?,
        Command::Apply {
            config,
            query,
            recommendation,
        } => apply(&load_config(&config)?, &query, recommendation)?,
        Command::Applied { config } => applied(&load_config(&config)?)?,
        Command::Clear { config, applied } => clear(&load_config(&config)?, applied)?,
        Command::Dashboard { config } => dashboard(&load_config(&config)?)?,
    };
    write_response(data)
}

/// Loads the configuration and applies its log level.
pub fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    set_min_severity(config.severity()?);
    let path_field = path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", path_field.as_str())]);
    Ok(config)
}

/// Parse a query log and store its statements
pub fn upload(config: &Config, file: &Path) -> CliResult<Value> {
    let queries = ingest::load_file(file, &config.accepted_extensions)?;
    let store = query_store(config)?;
    for query in &queries {
        store.insert(&config.principal, query)?;
    }

    let count = queries.len().to_string();
    let file_name = queries
        .first()
        .map(|q| q.source_file.clone())
        .unwrap_or_default();
    log_event_with_fields(
        Event::QueriesUploaded,
        &[("count", count.as_str()), ("file", file_name.as_str())],
    );

    Ok(json!({
        "uploaded": queries.len(),
        "fileName": file_name,
        "queries": queries,
    }))
}

/// Analyze all stored queries and keep the result for `apply`
pub fn analyze(config: &Config) -> CliResult<Value> {
    let scope = ObservationScope::new("ANALYZE");

    let queries = query_store(config)?.list(&config.principal)?;
    let mut analyzer = QueryAnalyzer::with_random(random_source(config));
    let batch = analyzer.analyze_batch(&queries);
    save_analysis(config, &batch)?;

    let applied_set = AppliedSet::from_records(&applied_store(config)?.list(&config.principal)?);
    let bundles: Vec<Value> = batch
        .iter()
        .map(|bundle| bundle_view(bundle, &applied_set))
        .collect::<CliResult<_>>()?;

    let count = batch.len().to_string();
    scope.complete_with_fields(&[("queries", count.as_str())]);

    Ok(json!({
        "queryKeys": batch.keys(),
        "queries": bundles,
        "metrics": analyzer.metrics().snapshot(),
    }))
}

/// Plan and recommendations for one statement
pub fn explain(config: &Config, sql: &str) -> CliResult<Value> {
    let mut analyzer = QueryAnalyzer::with_random(random_source(config));
    let analysis = analyzer.analyze(sql);
    let plan = ExplainPlan::new(sql, &analysis.execution_plan);

    let total = plan.total_cost.to_string();
    log_event_with_fields(Event::ExplainComplete, &[("total_cost", total.as_str())]);

    Ok(json!({
        "sql": sql,
        "features": analysis.features,
        "executionPlan": analysis.execution_plan,
        "totalCost": plan.total_cost,
        "plan": plan.to_string(),
        "recommendations": analysis.recommendations,
    }))
}

/// Record a recommendation of the last analysis as applied
pub fn apply(config: &Config, query_key: &str, recommendation_id: u32) -> CliResult<Value> {
    let batch = load_analysis(config)?;
    let store = applied_store(config)?;

    let applied_set = AppliedSet::from_records(&store.list(&config.principal)?);
    if applied_set.contains(query_key, recommendation_id) {
        return Err(CliError::already_applied(query_key, recommendation_id));
    }

    let record = apply_recommendation(
        &batch,
        query_key,
        recommendation_id,
        &store,
        &config.principal,
    )?;

    Ok(serde_json::to_value(record)?)
}

/// List applied indexes
pub fn applied(config: &Config) -> CliResult<Value> {
    let records = applied_store(config)?.list(&config.principal)?;
    Ok(json!({
        "count": records.len(),
        "appliedIndexes": records,
    }))
}

/// Remove stored queries (and the last analysis), or applied indexes
pub fn clear(config: &Config, applied: bool) -> CliResult<Value> {
    let removed = if applied {
        let removed = applied_store(config)?.clear(&config.principal)?;
        let field = removed.to_string();
        log_event_with_fields(Event::AppliedCleared, &[("removed", field.as_str())]);
        removed
    } else {
        let removed = query_store(config)?.clear(&config.principal)?;
        remove_analysis(config)?;
        let field = removed.to_string();
        log_event_with_fields(Event::QueriesCleared, &[("removed", field.as_str())]);
        removed
    };

    Ok(json!({
        "cleared": if applied { "appliedIndexes" } else { "queries" },
        "removed": removed,
    }))
}

/// Simulated before/after metrics over stored data
pub fn dashboard(config: &Config) -> CliResult<Value> {
    let queries = query_store(config)?.list(&config.principal)?;
    let records = applied_store(config)?.list(&config.principal)?;

    let metrics = DashboardMetrics::compute(&queries, &records, &mut random_source(config));

    let per_query: Vec<Value> = queries
        .iter()
        .map(|query| query_view(query, &records))
        .collect();

    let count = queries.len().to_string();
    let applied_count = records.len().to_string();
    log_event_with_fields(
        Event::DashboardComputed,
        &[("applied", applied_count.as_str()), ("queries", count.as_str())],
    );

    Ok(json!({
        "metrics": metrics,
        "queries": per_query,
    }))
}

fn query_store(config: &Config) -> CliResult<FileStore<RawQuery>> {
    Ok(FileStore::open(config.queries_path())?)
}

fn applied_store(config: &Config) -> CliResult<FileStore<AppliedIndex>> {
    Ok(FileStore::open(config.applied_path())?)
}

fn random_source(config: &Config) -> Box<dyn RandomSource> {
    match config.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

fn save_analysis(config: &Config, batch: &BatchAnalysis) -> CliResult<()> {
    fs::create_dir_all(config.data_path())?;
    let content = serde_json::to_string(&batch.to_bundles())?;
    fs::write(config.analysis_path(), content)?;
    Ok(())
}

fn load_analysis(config: &Config) -> CliResult<BatchAnalysis> {
    let path = config.analysis_path();
    if !path.exists() {
        return Err(CliError::analysis_not_found());
    }
    let content = fs::read_to_string(path)?;
    let bundles: Vec<QueryAnalysisBundle> = serde_json::from_str(&content)?;
    Ok(BatchAnalysis::from_bundles(bundles))
}

fn remove_analysis(config: &Config) -> CliResult<()> {
    match fs::remove_file(config.analysis_path()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Bundle JSON plus the ids of its already-applied recommendations
fn bundle_view(bundle: &QueryAnalysisBundle, applied: &AppliedSet) -> CliResult<Value> {
    let applied_ids: Vec<u32> = bundle
        .recommendations
        .iter()
        .map(|rec| rec.id)
        .filter(|id| applied.contains(&bundle.query_id, *id))
        .collect();

    let mut view = serde_json::to_value(bundle)?;
    if let Value::Object(map) = &mut view {
        map.insert("appliedRecommendations".to_string(), json!(applied_ids));
    }
    Ok(view)
}

fn query_view(query: &RawQuery, records: &[AppliedIndex]) -> Value {
    let matched = applied_for_query(query, records);
    json!({
        "id": query.id(),
        "query": query.text,
        "fileName": query.source_file,
        "timestamp": query.timestamp,
        "appliedIndexes": matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        Config::from_json(&format!(
            r#"{{"data_dir":"{}","seed":7}}"#,
            dir.path().join("data").display()
        ))
        .unwrap()
    }

    fn upload_text(config: &Config, dir: &TempDir, text: &str) -> Value {
        let path = dir.path().join("log.txt");
        fs::write(&path, text).unwrap();
        upload(config, &path).unwrap()
    }

    #[test]
    fn test_upload_then_analyze() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let uploaded = upload_text(&config, &dir, "SELECT * FROM t\nSELECT * FROM u WHERE a = 1\n");
        assert_eq!(uploaded["uploaded"], 2);

        let result = analyze(&config).unwrap();
        assert_eq!(result["queryKeys"].as_array().unwrap().len(), 2);
        assert_eq!(result["queries"][0]["tables"], "t");
        assert_eq!(result["metrics"]["queriesAnalyzed"], 2);
        assert!(result["metrics"]["recommendationsEmitted"].as_u64().unwrap() >= 2);
        assert!(config.analysis_path().exists());
    }

    #[test]
    fn test_apply_requires_analysis() {
        let dir = TempDir::new().unwrap();
        let err = apply(&config(&dir), "x-0", 1).unwrap_err();
        assert_eq!(err.code_str(), "DBO_CLI_ANALYSIS_NOT_FOUND");
    }

    #[test]
    fn test_apply_once() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        upload_text(&config, &dir, "SELECT * FROM orders WHERE order_id = 3");
        let result = analyze(&config).unwrap();
        let key = result["queryKeys"][0].as_str().unwrap().to_string();

        let record = apply(&config, &key, 1).unwrap();
        assert_eq!(record["indexName"], "idx_orders_order_id");
        assert_eq!(record["type"], "Hash");

        let err = apply(&config, &key, 1).unwrap_err();
        assert_eq!(err.code_str(), "DBO_CLI_ALREADY_APPLIED");

        let listed = applied(&config).unwrap();
        assert_eq!(listed["count"], 1);

        let reanalyzed = analyze(&config).unwrap();
        assert_eq!(reanalyzed["queries"][0]["appliedRecommendations"], json!([1]));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        upload_text(&config, &dir, "SELECT 1\nSELECT 2");
        analyze(&config).unwrap();

        let cleared = clear(&config, false).unwrap();
        assert_eq!(cleared["removed"], 2);
        assert!(!config.analysis_path().exists());

        let cleared = clear(&config, true).unwrap();
        assert_eq!(cleared["removed"], 0);
    }

    #[test]
    fn test_explain() {
        let dir = TempDir::new().unwrap();
        let result = explain(&config(&dir), "SELECT * FROM orders WHERE amount > 100").unwrap();
        assert_eq!(result["totalCost"], 250);
        assert!(result["plan"].as_str().unwrap().contains("Filter (cost=100)"));
        assert_eq!(result["recommendations"][0]["type"], "B-tree");
    }

    #[test]
    fn test_dashboard_matches_applied() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        upload_text(&config, &dir, "SELECT * FROM users WHERE status = 'x'");
        let result = analyze(&config).unwrap();
        let key = result["queryKeys"][0].as_str().unwrap().to_string();
        apply(&config, &key, 1).unwrap();

        let board = dashboard(&config).unwrap();
        assert_eq!(board["metrics"]["indexesCreated"], 1);
        assert_eq!(board["metrics"]["indexDistribution"]["Bitmap"], 1);
        assert_eq!(
            board["queries"][0]["appliedIndexes"].as_array().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_upload_rejects_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.sql");
        fs::write(&path, "SELECT 1").unwrap();
        let err = upload(&config(&dir), &path).unwrap_err();
        assert_eq!(err.code_str(), "DBO_CLI_INGEST_ERROR");
    }
}
