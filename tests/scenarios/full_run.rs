//! Scenario: a clean run through all twelve stages

use crate::helpers::*;
use frontgen::core::{ExecutionStatus, Stage};
use frontgen::execution::{ExecutionEvent, TraceLevel};
use frontgen::persistence::InMemoryProjectStore;
use frontgen::service::{ProjectService, SubmitInput};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_full_run_populates_every_field() {
    let ws = Workspace::new();
    let client = scripted_client();
    let runner = FakeRunner::new();

    let outcome = ws.run(&client, &runner).await;
    let state = &outcome.state;

    assert_eq!(outcome.status, ExecutionStatus::Completed, "{:?}", state.errors);
    assert!(state.errors.is_empty());
    assert_eq!(state.iteration_count, 1);

    assert_eq!(
        state.screenshot_analysis.as_ref().unwrap().description,
        "A login card above a leave table."
    );
    let analysis = state.document_analysis.as_ref().unwrap();
    assert_eq!(analysis.ui_components, vec!["LoginForm", "Dashboard"]);
    assert_eq!(analysis.state_management.as_deref(), Some("NgRx store"));

    let components: Vec<&str> = state.ui_components.keys().map(String::as_str).collect();
    assert_eq!(components, vec!["LoginForm", "Dashboard"]);
    let login_files: Vec<&str> = state.ui_components["LoginForm"]
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        login_files,
        vec![
            "login-form.component.ts",
            "login-form.component.html",
            "login-form.component.scss"
        ]
    );
    assert_eq!(
        state.ui_dependencies["LoginForm"],
        vec!["form", "app-password-field", "button"]
    );
    assert_eq!(state.ui_dependencies["Dashboard"], vec!["app-leave-table"]);

    let services: Vec<&str> = state.api_services.keys().map(String::as_str).collect();
    assert_eq!(services, vec!["POST /api/auth/login", "GET /api/leaves"]);
    assert_eq!(state.api_services["GET /api/leaves"], "export class ApiService {}");

    assert_eq!(state.ui_tests.len(), 2);
    assert_eq!(
        state.container_file_content.as_deref(),
        Some("FROM node:20 AS build\nFROM nginx:alpine")
    );
    assert_eq!(state.validation_report.as_deref(), Some("No discrepancies found."));
    assert!(state.documentation.contains_key("README.md"));
    assert!(state.documentation.contains_key("docs/login-form.md"));
    assert!(state.documentation.contains_key("docs/workflow.md"));

    let link = state.preview_link.as_deref().unwrap();
    assert!(link.starts_with("https://preview.test/"));
    assert!(!link.starts_with("https://preview.test//"));

    assert_eq!(client.image_requests(), 1);
    assert_eq!(client.count(prompt::COMPONENT), 2);
}

#[tokio::test]
async fn test_setup_commands_run_inside_workspace() {
    let ws = Workspace::new();
    let runner = FakeRunner::new();

    ws.run(&scripted_client(), &runner).await;

    assert_eq!(
        runner.lines(),
        vec![
            "ng new project_root --skip-git --routing --style=scss",
            "ng add @angular/material",
            "npm install @ngrx/store",
        ]
    );
    let dirs = runner.working_dirs();
    assert_eq!(dirs[0], ws.config.workspace.output_dir);
    assert_eq!(dirs[1], ws.project_dir());
    assert!(ws.project_dir().join("src/app/components").is_dir());
    assert!(ws.project_dir().join("src/app/services").is_dir());
}

#[tokio::test]
async fn test_events_follow_stage_order() {
    let ws = Workspace::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let driver = ws
        .driver(scripted_client(), FakeRunner::new())
        .with_event_handler(move |event| sink.lock().unwrap().push(event));
    let outcome = driver.run(ws.state()).await;

    let events = events.lock().unwrap();
    let started: Vec<Stage> = events
        .iter()
        .filter_map(|e| match e {
            ExecutionEvent::StageStarted { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(started, Stage::ALL.to_vec());
    assert!(matches!(
        events.first(),
        Some(ExecutionEvent::PipelineStarted { stage_count: 12, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(ExecutionEvent::PipelineCompleted { status: ExecutionStatus::Completed, .. })
    ));

    assert_eq!(outcome.trace.status, ExecutionStatus::Completed);
    assert_eq!(outcome.trace.entries_at(TraceLevel::Warn).count(), 0);
    assert!(outcome.trace.completed_at.is_some());
}

#[tokio::test]
async fn test_submission_stores_project_and_trace() {
    let ws = Workspace::new();
    let document = ws.dir.path().join("srs.md");
    std::fs::write(&document, DOCUMENT).unwrap();

    let service = ProjectService::new(InMemoryProjectStore::new());
    let driver = ws.driver(scripted_client(), FakeRunner::new());

    let submission = service
        .submit(
            &driver,
            SubmitInput::Fresh {
                document,
                screenshot_ref: "login.png".to_string(),
            },
        )
        .await
        .unwrap();

    let project = service.get(submission.project.id).await.unwrap();
    assert_eq!(project.document_text, DOCUMENT);
    assert_eq!(project.screenshot_ref, "login.png");
    assert_eq!(project.preview_link, submission.outcome.state.preview_link);
    assert_eq!(project.run_id, Some(submission.outcome.trace.run_id));

    let trace = service.logs(project.id).await.unwrap();
    assert_eq!(trace, submission.outcome.trace);
    assert_eq!(service.list().await.unwrap().len(), 1);
}
