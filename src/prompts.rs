//! Prompt templates for each generation stage
//!
//! Templates use `{{ name }}` placeholders filled by [`render`].

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const SCREENSHOT_ANALYSIS: &str =
    "Extract UI components, design language, and layout details from this image.";

pub const DOCUMENT_ANALYSIS: &str = r#"Analyze the following requirements document:
{{ document_text }}

Screenshot details:
{{ screenshot_details }}

Extract UI components, state management, API endpoints, accessibility, and styling.
Respond with a single JSON object in a ```json fenced block with these keys:
- "ui_components": list of UI component names
- "state_management": state management requirements
- "api_endpoints": list of API endpoints, e.g. "POST /api/auth/login"
- "accessibility": UI accessibility requirements
- "styling": styling and branding guidelines"#;

pub const SETUP: &str = r#"Given the following analysis results: {{ analysis }},
generate the necessary Angular CLI commands to create a new Angular 17 project named '{{ project_name }}',
set up state management ({{ state_management }}), install dependencies (RxJS, Angular Material),
and create the folder structure for components, services and tests.

1. Create the workspace with `ng new {{ project_name }} --skip-git --routing --style=scss`.
2. Navigate into it with `cd {{ project_name }}`.
3. Use `ng add` for libraries such as @angular/material and @ngrx/store.
4. Install remaining dependencies with npm, one command per line.
5. Create missing directories with `mkdir -p` before writing files into them.

Provide one shell command per line."#;

pub const COMPONENT: &str = r#"Generate an Angular component for: {{ component }}.
Follow best practices: component-based architecture, accessibility, styling consistency, modular design,
use existing components if needed.
Existing components: {{ existing_components }}
Use TypeScript, SCSS, and Angular Material themes if applicable.
Component Details: {{ component_details }}

Provide the component code in markdown. Name each file (for example `{{ file_stem }}.component.ts`)
immediately before its fenced code block, tagged typescript, html or scss."#;

pub const API_SERVICE: &str = r#"Generate an Angular service for API endpoint: {{ endpoint }}.
Use HttpClientModule for API integration, implement error handling, and state management for responses.
Endpoint Details: {{ endpoint_details }}

Provide the service code in a single ```typescript fenced block."#;

pub const UI_TESTS: &str = r#"Generate Cypress UI tests for the following Angular component: {{ component }}.
Ensure proper unit tests, integration tests, and end-to-end tests.
{{ component_code }}

Provide the test code in a single ```typescript fenced block."#;

pub const CONTAINER_FILE: &str = r#"Generate a Dockerfile for an Angular frontend project.
Use Node.js for building and Nginx for serving the application.
Ensure best practices for Dockerfile creation.
Project Details: {{ project_details }}

Provide the Dockerfile content in a single ```dockerfile fenced block."#;

pub const VALIDATION: &str = r#"Given the following generated UI code: {{ generated_code }},
requirements document: {{ document_text }}, and screenshot details: {{ screenshot_details }},
validate the UI requirements and design specifications.
Identify any discrepancies, inconsistencies, or potential issues.
Provide a detailed report of the validation results."#;

pub const README: &str = r#"Generate a README.md file for an Angular frontend project named '{{ project_name }}'.
Include setup instructions, usage guidelines, and project structure details.
Project Details: {{ project_details }}

Provide the README.md content in markdown."#;

pub const COMPONENT_DOC: &str = r#"Generate documentation for the following Angular component: {{ component }}.
Include props, states, API integration details, and usage examples.
{{ component_code }}

Provide the component documentation in markdown."#;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("Invalid placeholder regex"))
}

/// Substitute `{{ name }}` placeholders in one left-to-right pass over the
/// template; substituted values are never rescanned. Unknown placeholders
/// are left as-is
pub fn render(template: &str, variables: &HashMap<&str, String>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Build a variable map from `(name, value)` pairs
pub fn vars<const N: usize>(pairs: [(&'static str, String); N]) -> HashMap<&'static str, String> {
    pairs.into_iter().collect()
}
