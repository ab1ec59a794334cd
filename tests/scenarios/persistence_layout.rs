//! Scenario: where generated artefacts land on disk

use crate::helpers::*;
use frontgen::core::{Pipeline, Stage};
use std::fs;

#[tokio::test]
async fn test_files_land_in_project_layout() {
    let ws = Workspace::new();
    let outcome = ws.run(&scripted_client(), &FakeRunner::new()).await;
    assert!(outcome.state.errors.is_empty(), "{:?}", outcome.state.errors);

    let root = ws.project_dir();
    let read = |relative: &str| fs::read_to_string(root.join(relative)).unwrap();

    assert_eq!(
        read("src/app/components/login-form/login-form.component.scss"),
        "form { display: flex; }"
    );
    assert!(root
        .join("src/app/components/dashboard/dashboard.component.html")
        .is_file());
    assert_eq!(
        read("src/app/services/post_api_auth_login.service.ts"),
        "export class ApiService {}"
    );
    assert!(root.join("src/app/services/get_api_leaves.service.ts").is_file());
    assert_eq!(
        read("tests/login-form.spec.ts"),
        "describe('component', () => {});"
    );
    assert_eq!(read("Dockerfile"), "FROM node:20 AS build\nFROM nginx:alpine");
    assert_eq!(read("README.md"), "# project_root\n\nRun `npm start`.");
    assert_eq!(read("docs/dashboard.md"), "## Usage\n\nDrop it in a page.");

    let workflow = read("docs/workflow.md");
    assert!(workflow.contains("```mermaid"));
    assert!(workflow.contains("execute_setup --> generate_components"));
}

#[tokio::test]
async fn test_unsafe_names_are_rejected() {
    let ws = Workspace::new();
    let mut state = ws.state();
    state
        .ui_components
        .insert("../..".to_string(), [("x.component.ts".to_string(), "x".to_string())].into());
    state.ui_components.insert(
        "card".to_string(),
        [
            ("card.component.ts".to_string(), "card".to_string()),
            ("../../card.component.html".to_string(), "evil".to_string()),
        ]
        .into(),
    );
    state
        .documentation
        .insert("../../outside.md".to_string(), "evil".to_string());

    let pipeline = Pipeline {
        name: "persist-only".to_string(),
        stages: vec![Stage::PersistFiles],
    };
    let outcome = ws
        .driver_for(MockClient::new(), FakeRunner::new(), pipeline)
        .run(state)
        .await;

    let errors = errors_of(&outcome, "persist_files");
    assert_eq!(errors.len(), 3, "{:?}", errors);

    let root = ws.project_dir();
    assert_eq!(
        fs::read_to_string(root.join("src/app/components/card/card.component.ts")).unwrap(),
        "card"
    );
    let component_dirs = fs::read_dir(root.join("src/app/components")).unwrap().count();
    assert_eq!(component_dirs, 1);
    assert!(!root.join("x.component.ts").exists());
    assert!(!ws.config.workspace.output_dir.join("outside.md").exists());
    assert!(!ws.dir.path().join("outside.md").exists());
}

#[tokio::test]
async fn test_empty_container_file_is_not_written() {
    let ws = Workspace::new();
    let mut state = ws.state();
    state.container_file_content = Some("   ".to_string());
    state
        .api_services
        .insert("/".to_string(), "export class RootService {}".to_string());

    let pipeline = Pipeline {
        name: "persist-only".to_string(),
        stages: vec![Stage::PersistFiles],
    };
    let outcome = ws
        .driver_for(MockClient::new(), FakeRunner::new(), pipeline)
        .run(state)
        .await;

    assert!(outcome.state.errors.is_empty());
    let root = ws.project_dir();
    assert!(!root.join("Dockerfile").exists());
    assert!(root.join("src/app/services/root.service.ts").is_file());
}

#[tokio::test]
async fn test_colliding_service_files_are_all_written() {
    let ws = Workspace::new();
    let mut state = ws.state();
    state
        .api_services
        .insert("GET /api/users/{id}".to_string(), "export class ById {}".to_string());
    state
        .api_services
        .insert("GET /api/users/id".to_string(), "export class Literal {}".to_string());

    let pipeline = Pipeline {
        name: "persist-only".to_string(),
        stages: vec![Stage::PersistFiles],
    };
    let outcome = ws
        .driver_for(MockClient::new(), FakeRunner::new(), pipeline)
        .run(state)
        .await;

    assert!(outcome.state.errors.is_empty(), "{:?}", outcome.state.errors);
    let services = ws.project_dir().join("src/app/services");
    assert_eq!(
        fs::read_to_string(services.join("get_api_users_id.service.ts")).unwrap(),
        "export class ById {}"
    );
    assert_eq!(
        fs::read_to_string(services.join("get_api_users_id_2.service.ts")).unwrap(),
        "export class Literal {}"
    );
}
