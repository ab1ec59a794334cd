//! Scenario: re-running over an earlier state

use crate::helpers::*;
use frontgen::core::{ExecutionStatus, PipelineState};

#[tokio::test]
async fn test_second_run_keeps_existing_artefacts() {
    let ws = Workspace::new();
    let client = scripted_client();
    let runner = FakeRunner::new();

    let first = ws.run(&client, &runner).await;
    assert_eq!(first.status, ExecutionStatus::Completed);
    let first_components = first.state.ui_components.clone();
    let first_services = first.state.api_services.clone();
    let first_tests = first.state.ui_tests.clone();

    client.clear();
    let second = ws
        .driver(client.clone(), runner.clone())
        .run(first.state)
        .await;

    assert_eq!(second.status, ExecutionStatus::Completed);
    assert_eq!(second.state.iteration_count, 2);
    assert_eq!(second.state.ui_components, first_components);
    assert_eq!(second.state.api_services, first_services);
    assert_eq!(second.state.ui_tests, first_tests);

    // Keyed artefacts were not requested again
    assert_eq!(client.count(prompt::COMPONENT), 0);
    assert_eq!(client.count(prompt::SERVICE), 0);
    assert_eq!(client.count(prompt::TESTS), 0);
    assert_eq!(client.count(prompt::COMPONENT_DOC), 0);

    // Whole-project artefacts are regenerated
    assert_eq!(client.count(prompt::README), 1);
    assert_eq!(client.count(prompt::VALIDATION), 1);
}

#[tokio::test]
async fn test_saved_state_resumes_and_adds_only_new_components() {
    let ws = Workspace::new();
    let runner = FakeRunner::new();

    let first = ws.run(&scripted_client(), &runner).await;
    let snapshot = ws.dir.path().join("state").join("run.json");
    first.state.save(&snapshot).unwrap();

    let resumed = PipelineState::load(&snapshot).unwrap();
    assert_eq!(resumed.ui_components, first.state.ui_components);

    // The document now also asks for a settings page
    let client = MockClient::new()
        .respond(
            prompt::DOCUMENT,
            r#"{"ui_components": ["LoginForm", "Dashboard", "Settings Page"], "api_endpoints": []}"#,
        )
        .respond(
            "Generate an Angular component for: Settings Page.",
            "settings-page.component.ts\n```ts\nexport class SettingsPageComponent {}\n```",
        )
        .with_default("```typescript\n// generated\n```");

    let second = ws.driver(client.clone(), runner).run(resumed).await;

    let names: Vec<&str> = second.state.ui_components.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["LoginForm", "Dashboard", "Settings Page"]);
    assert_eq!(
        second.state.ui_components["LoginForm"],
        first.state.ui_components["LoginForm"]
    );
    assert_eq!(client.count(prompt::COMPONENT), 1);
    assert_eq!(second.state.ui_dependencies["Settings Page"], Vec::<String>::new());
    assert_eq!(second.state.iteration_count, 2);
}
