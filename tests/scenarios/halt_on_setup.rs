//! Scenario: scaffolding failures

use crate::helpers::*;
use frontgen::core::{ExecutionStatus, Stage};
use frontgen::execution::{ExecutionEvent, TraceLevel};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_failed_workspace_creation_halts_pipeline() {
    let ws = Workspace::new();
    let client = scripted_client();
    let runner = FakeRunner::new().failing_on("ng new");
    let halted = Arc::new(Mutex::new(None));
    let sink = halted.clone();

    let driver = ws
        .driver(client.clone(), runner.clone())
        .with_event_handler(move |event| {
            if let ExecutionEvent::StageHalted { stage, .. } = event {
                *sink.lock().unwrap() = Some(stage);
            }
        });
    let outcome = driver.run(ws.state()).await;

    assert_eq!(outcome.status, ExecutionStatus::Halted);
    assert_eq!(*halted.lock().unwrap(), Some(Stage::ExecuteSetup));

    // Nothing after the failing line ran
    assert_eq!(runner.lines().len(), 1);
    let setup_errors = errors_of(&outcome, "execute_setup");
    assert_eq!(setup_errors.len(), 1);
    assert!(setup_errors[0].contains("`ng new project_root --skip-git --routing --style=scss` failed"));

    // Later stages were skipped
    assert_eq!(client.count(prompt::COMPONENT), 0);
    assert!(outcome.state.ui_components.is_empty());
    assert!(outcome.state.preview_link.is_none());
    assert!(!ws.project_dir().exists());

    // Earlier stages kept their results
    assert!(outcome.state.document_analysis.is_some());
    assert!(outcome.state.setup_commands.is_some());

    let halt_entries: Vec<_> = outcome.trace.entries_at(TraceLevel::Error).collect();
    assert_eq!(halt_entries.len(), 1);
    assert_eq!(halt_entries[0].stage, Some(Stage::ExecuteSetup));
}

#[tokio::test]
async fn test_failed_dependency_install_is_recorded_and_run_continues() {
    let ws = Workspace::new();
    let runner = FakeRunner::new().failing_on("npm install");

    let outcome = ws.run(&scripted_client(), &runner).await;

    assert_eq!(outcome.status, ExecutionStatus::CompletedWithErrors);
    let setup_errors = errors_of(&outcome, "execute_setup");
    assert_eq!(setup_errors.len(), 1);
    assert!(setup_errors[0].starts_with("[execute_setup] `npm install @ngrx/store` failed"));

    // The mkdir after the failing install still ran
    assert!(ws.project_dir().join("src/app/services").is_dir());
    assert_eq!(outcome.state.ui_components.len(), 2);
    assert!(outcome.state.preview_link.is_some());
}

#[tokio::test]
async fn test_unknown_and_escaping_lines() {
    let ws = Workspace::new();
    let client = MockClient::new()
        .respond(
            prompt::SETUP,
            "ng new project_root\n\
             cd project_root && mkdir -p src/app\n\
             rm -rf /\n\
             echo 'API_URL=http://localhost' > .env\n\
             mkdir ../../outside",
        )
        .respond(prompt::DOCUMENT, ANALYSIS_JSON);
    let runner = FakeRunner::new();

    let outcome = ws.run(&client, &runner).await;

    // Only allow-listed programs reach the runner
    assert_eq!(runner.lines(), vec!["ng new project_root"]);
    assert!(ws.project_dir().join("src/app").is_dir());
    assert_eq!(
        std::fs::read_to_string(ws.project_dir().join(".env")).unwrap(),
        "API_URL=http://localhost"
    );

    let setup_errors = errors_of(&outcome, "execute_setup");
    assert_eq!(setup_errors.len(), 1);
    assert!(setup_errors[0].contains("escapes the workspace"));
    assert!(!ws.dir.path().join("outside").exists());
}
