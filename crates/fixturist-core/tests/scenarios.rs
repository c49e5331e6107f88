//! Fixture scenarios described in YAML.
//!
//! Each file under `tests/scenarios/` names a handler, the request to make and
//! the fixture key and status the run must produce. Runs go through the real
//! space adapter with verification enabled.

use fixturist_adapters::{Space, SpaceAdapter};
use fixturist_core::testing::FnHandler;
use fixturist_core::{Configuration, Scenario};
use fixturist_proto::{Method, Params, Request, Response};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Debug, Deserialize)]
struct ScenarioYaml {
    name: String,
    description: String,
    handler: String,
    method: Method,
    action: String,
    #[serde(default)]
    params: Params,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    session: BTreeMap<String, serde_json::Value>,
    expected: ExpectedYaml,
}

#[derive(Debug, Deserialize)]
struct ExpectedYaml {
    key: String,
    status: u16,
}

fn load_scenario(path: &str) -> ScenarioYaml {
    let content =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    serde_yaml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}

/// A tiny application: every handler name shares this routing.
fn application(request: &Request) -> anyhow::Result<Response> {
    match request.action.as_str() {
        "index" => Ok(Response::json(json!({
            "users": ["ada", "grace"],
            "role": request.session.get("role").cloned().unwrap_or(json!("guest")),
        }))),
        "show" => Ok(Response::json(json!({ "id": request.param("id") }))),
        "create" if request.header("authorization").is_some() => Ok(Response::json(
            json!({ "created": request.param("name") }),
        )
        .with_status(201)),
        "create" => Ok(Response::new(401).with_header("WWW-Authenticate", "Bearer")),
        other => anyhow::bail!("no route for action '{other}'"),
    }
}

fn run_scenario(yaml: ScenarioYaml) {
    let dir = TempDir::new().unwrap();
    let space = Arc::new(Space::new());
    let config = Configuration::builder()
        .fixture_path(dir.path())
        .mock_with(SpaceAdapter::new(Arc::clone(&space)))
        .verify_mocks(true)
        .build()
        .unwrap();

    let headers = yaml.headers.clone();
    let session = yaml.session.clone();
    let mut scenario = Scenario::new(yaml.name.clone())
        .with_handler(FnHandler::new(yaml.handler.clone(), application))
        .with_method(yaml.method)
        .with_action(yaml.action.clone())
        .with_params(yaml.params.clone())
        .with_setup(move |ctx| {
            for (name, value) in &headers {
                ctx.set_header(name.clone(), value.clone());
            }
            for (key, value) in &session {
                ctx.set_session(key.clone(), value.clone());
            }
            Ok(())
        });

    let path = scenario
        .run(&config)
        .unwrap_or_else(|e| panic!("{}: run failed: {}", yaml.name, e));

    let key = scenario.fixture_key().unwrap();
    assert_eq!(
        key.to_string(),
        yaml.expected.key,
        "{}: unexpected fixture key",
        yaml.name
    );
    assert_eq!(path, config.store().path_for(&key));

    let record = config.store().load(&key).unwrap();
    assert_eq!(
        record.response.status, yaml.expected.status,
        "{}: Expected status {}, got {}",
        yaml.name, yaml.expected.status, record.response.status
    );
    assert_eq!(record.method, yaml.method);
    assert!(space.is_empty(), "{}: mock space left dirty", yaml.name);

    println!("✓ {} passed", yaml.description);
}

#[test]
fn test_admin_index() {
    run_scenario(load_scenario("tests/scenarios/admin_index.yml"));
}

#[test]
fn test_unauthorized_create() {
    run_scenario(load_scenario("tests/scenarios/unauthorized_create.yml"));
}

#[test]
fn test_authorized_create() {
    run_scenario(load_scenario("tests/scenarios/authorized_create.yml"));
}

#[test]
fn test_show_report() {
    run_scenario(load_scenario("tests/scenarios/show_report.yml"));
}
