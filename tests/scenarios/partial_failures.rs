//! Scenario: recorded failures never stop later stages

use crate::helpers::*;
use frontgen::core::ExecutionStatus;

#[tokio::test]
async fn test_component_failures_are_isolated() {
    let ws = Workspace::new();
    let client = MockClient::new()
        .fail_on(prompt::LOGIN_FORM, "upstream overloaded")
        .respond(prompt::DASHBOARD, "I cannot produce code for this component.")
        .respond(prompt::DOCUMENT, ANALYSIS_JSON)
        .respond(prompt::SETUP, SETUP_COMMANDS)
        .respond(prompt::CONTAINER, DOCKERFILE);
    let runner = FakeRunner::new();

    let outcome = ws.run(&client, &runner).await;
    let state = &outcome.state;

    assert_eq!(outcome.status, ExecutionStatus::CompletedWithErrors);

    // Completion failure stores nothing; parse failure stores an empty map
    assert!(!state.ui_components.contains_key("LoginForm"));
    assert!(state.ui_components["Dashboard"].is_empty());
    assert!(state.ui_dependencies["Dashboard"].is_empty());

    let errors = errors_of(&outcome, "generate_components");
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("Completion failed for LoginForm"));
    assert!(errors[0].contains("upstream overloaded"));
    assert_eq!(
        errors[1],
        "[generate_components] Parsing failed for Dashboard: no file names found in response"
    );

    // No tests for a component without files
    assert!(state.ui_tests.is_empty());

    // Every later stage still ran
    assert!(state.container_file_content.is_some());
    assert!(state.validation_report.is_some());
    assert!(state.preview_link.is_some());
}

#[tokio::test]
async fn test_failed_component_is_retried_on_next_run() {
    let ws = Workspace::new();
    let runner = FakeRunner::new();
    let flaky = MockClient::new()
        .fail_on(prompt::LOGIN_FORM, "timeout")
        .respond(prompt::DASHBOARD, DASHBOARD)
        .respond(prompt::DOCUMENT, ANALYSIS_JSON);

    let first = ws.run(&flaky, &runner).await;
    assert!(!first.state.ui_components.contains_key("LoginForm"));

    let healthy = scripted_client();
    let second = ws
        .driver(healthy.clone(), runner.clone())
        .run(first.state)
        .await;

    assert_eq!(healthy.count(prompt::COMPONENT), 1);
    assert_eq!(healthy.count(prompt::LOGIN_FORM), 1);
    let names: Vec<&str> = second.state.ui_components.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Dashboard", "LoginForm"]);
}

#[tokio::test]
async fn test_names_without_distinct_file_stems_are_reported() {
    let ws = Workspace::new();
    let client = MockClient::new()
        .respond(
            prompt::DOCUMENT,
            r#"{"ui_components": ["登录表单", "LoginForm", "login form"], "api_endpoints": []}"#,
        )
        .respond(prompt::SETUP, SETUP_COMMANDS)
        .respond(prompt::LOGIN_FORM, LOGIN_FORM);
    let runner = FakeRunner::new();

    let outcome = ws.run(&client, &runner).await;
    let state = &outcome.state;

    let names: Vec<&str> = state.ui_components.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["LoginForm"]);
    assert_eq!(client.count(prompt::COMPONENT), 1);
    assert_eq!(
        errors_of(&outcome, "generate_components"),
        vec![
            "[generate_components] Cannot derive a file name for component '登录表单'",
            "[generate_components] Component 'login form' maps to the same files (login-form) as 'LoginForm'",
        ]
    );
    assert!(ws
        .project_dir()
        .join("src/app/components/login-form/login-form.component.ts")
        .is_file());
}

#[tokio::test]
async fn test_missing_screenshot_uses_placeholder_details() {
    let ws = Workspace::new();
    let client = scripted_client();
    let runner = FakeRunner::new();

    let mut state = ws.state();
    state.screenshot_url = "missing.png".to_string();
    let outcome = ws.driver(client.clone(), runner).run(state).await;

    let errors = errors_of(&outcome, "analyze_screenshot");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Error processing screenshot"));
    assert!(outcome.state.screenshot_analysis.is_none());
    assert_eq!(client.image_requests(), 0);

    let document_prompt = client
        .prompts()
        .into_iter()
        .find(|p| p.contains(prompt::DOCUMENT))
        .unwrap();
    assert!(document_prompt.contains("No screenshot analysis available."));

    // Document analysis itself succeeded
    assert_eq!(outcome.state.ui_components.len(), 2);
}

#[tokio::test]
async fn test_unparseable_analysis_requests_no_components() {
    let ws = Workspace::new();
    let client = MockClient::new()
        .respond(prompt::DOCUMENT, "The document describes a login page.")
        .respond(prompt::SETUP, SETUP_COMMANDS);
    let runner = FakeRunner::new();

    let outcome = ws.run(&client, &runner).await;

    assert!(outcome.state.document_analysis.is_none());
    assert_eq!(errors_of(&outcome, "analyze_document").len(), 1);
    assert_eq!(
        errors_of(&outcome, "generate_components"),
        vec!["[generate_components] No document analysis available"]
    );
    assert!(outcome.state.ui_components.is_empty());
    assert_eq!(client.count(prompt::COMPONENT), 0);
    assert!(outcome.state.preview_link.is_some());
}
