//! Shared fakes and fixtures for pipeline scenarios

#![allow(dead_code)]

use async_trait::async_trait;
use frontgen::core::{GeneratorConfig, Pipeline, PipelineState};
use frontgen::execution::{CommandError, CommandOutput, CommandRunner, PipelineDriver, RunOutcome};
use frontgen::llm::{Completion, CompletionClient, CompletionError, CompletionRequest};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Completion client that answers by matching fragments of the prompt.
///
/// Rules are checked in insertion order; the first fragment found in the
/// prompt wins. Unmatched prompts get the default response.
#[derive(Clone)]
pub struct MockClient {
    rules: Arc<Mutex<Vec<(String, Result<String, String>)>>>,
    default_response: Arc<String>,
    prompts: Arc<Mutex<Vec<String>>>,
    images: Arc<Mutex<usize>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            rules: Arc::new(Mutex::new(Vec::new())),
            default_response: Arc::new("OK".to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
            images: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_default(mut self, response: &str) -> Self {
        self.default_response = Arc::new(response.to_string());
        self
    }

    /// Answer prompts containing `fragment` with `response`
    pub fn respond(self, fragment: &str, response: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((fragment.to_string(), Ok(response.to_string())));
        self
    }

    /// Fail prompts containing `fragment`
    pub fn fail_on(self, fragment: &str, message: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((fragment.to_string(), Err(message.to_string())));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of recorded prompts containing `fragment`
    pub fn count(&self, fragment: &str) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(fragment))
            .count()
    }

    pub fn image_requests(&self) -> usize {
        *self.images.lock().unwrap()
    }

    pub fn clear(&self) {
        self.prompts.lock().unwrap().clear();
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if request.image.is_some() {
            *self.images.lock().unwrap() += 1;
        }

        let rules = self.rules.lock().unwrap();
        let matched = rules
            .iter()
            .find(|(fragment, _)| request.prompt.contains(fragment.as_str()));

        match matched {
            Some((_, Ok(response))) => Ok(Completion::new(response.clone())),
            Some((_, Err(message))) => Err(CompletionError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(Completion::new(self.default_response.as_str())),
        }
    }
}

/// Command runner that records lines instead of running them.
///
/// `ng new <name>` creates `<cwd>/<name>` so a following `cd` succeeds.
#[derive(Clone, Default)]
pub struct FakeRunner {
    lines: Arc<Mutex<Vec<(String, PathBuf)>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every line starting with `prefix`
    pub fn failing_on(self, prefix: &str) -> Self {
        self.failing.lock().unwrap().push(prefix.to_string());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(line, _)| line.clone())
            .collect()
    }

    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cwd)| cwd.clone())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, line: &str, cwd: &Path) -> Result<CommandOutput, CommandError> {
        self.lines
            .lock()
            .unwrap()
            .push((line.to_string(), cwd.to_path_buf()));

        if self.failing.lock().unwrap().iter().any(|p| line.starts_with(p.as_str())) {
            return Err(CommandError::Failed {
                code: 1,
                stderr: format!("{}: command failed", line),
            });
        }

        if let Some(rest) = line.strip_prefix("ng new ") {
            if let Some(name) = rest.split_whitespace().next() {
                std::fs::create_dir_all(cwd.join(name)).map_err(|e| CommandError::Spawn(e.to_string()))?;
            }
        }

        Ok(CommandOutput::default())
    }
}

pub const DOCUMENT: &str = "Leave management portal. Employees sign in with a login form \
and see a dashboard listing their leave requests.";

pub const ANALYSIS_JSON: &str = r#"Here is the analysis:
```json
{
  "ui_components": ["LoginForm", "Dashboard"],
  "state_management": "NgRx store",
  "api_endpoints": ["POST /api/auth/login", "GET /api/leaves"],
  "accessibility": "WCAG 2.1 AA",
  "styling": "Angular Material, indigo palette"
}
```"#;

pub const SETUP_COMMANDS: &str = "```bash
ng new project_root --skip-git --routing --style=scss
cd project_root
ng add @angular/material
npm install @ngrx/store
mkdir -p src/app/components src/app/services
```";

pub const LOGIN_FORM: &str = r#"login-form.component.ts
```typescript
import { Component } from '@angular/core';
import { MatButtonModule } from '@angular/material/button';

@Component({ selector: 'app-login-form' })
export class LoginFormComponent {}
```
login-form.component.html
```html
<form><app-password-field></app-password-field><button mat-button>Sign in</button></form>
```
login-form.component.scss
```scss
form { display: flex; }
```"#;

pub const DASHBOARD: &str = r#"dashboard.component.ts
```typescript
import { Component } from '@angular/core';

@Component({ selector: 'app-dashboard' })
export class DashboardComponent {}
```
dashboard.component.html
```html
<app-leave-table></app-leave-table>
```"#;

pub const SERVICE: &str = "```typescript\nexport class ApiService {}\n```";
pub const TESTS: &str = "```typescript\ndescribe('component', () => {});\n```";
pub const DOCKERFILE: &str = "```dockerfile\nFROM node:20 AS build\nFROM nginx:alpine\n```";

/// Prompt fragments identifying each kind of request
pub mod prompt {
    pub const SCREENSHOT: &str = "Extract UI components, design language";
    pub const DOCUMENT: &str = "Analyze the following requirements document";
    pub const SETUP: &str = "generate the necessary Angular CLI commands";
    pub const LOGIN_FORM: &str = "Generate an Angular component for: LoginForm.";
    pub const DASHBOARD: &str = "Generate an Angular component for: Dashboard.";
    pub const COMPONENT: &str = "Generate an Angular component for:";
    pub const SERVICE: &str = "Generate an Angular service for API endpoint";
    pub const TESTS: &str = "Generate Cypress UI tests";
    pub const CONTAINER: &str = "Generate a Dockerfile";
    pub const VALIDATION: &str = "validate the UI requirements";
    pub const README: &str = "Generate a README.md";
    pub const COMPONENT_DOC: &str = "Generate documentation for the following Angular component";
}

/// A client scripted with a well-formed answer for every stage
pub fn scripted_client() -> MockClient {
    MockClient::new()
        .respond(prompt::SCREENSHOT, "A login card above a leave table.")
        .respond(prompt::DOCUMENT, ANALYSIS_JSON)
        .respond(prompt::SETUP, SETUP_COMMANDS)
        .respond(prompt::LOGIN_FORM, LOGIN_FORM)
        .respond(prompt::DASHBOARD, DASHBOARD)
        .respond(prompt::SERVICE, SERVICE)
        .respond(prompt::TESTS, TESTS)
        .respond(prompt::CONTAINER, DOCKERFILE)
        .respond(prompt::VALIDATION, "No discrepancies found.")
        .respond(prompt::README, "# project_root\n\nRun `npm start`.")
        .respond(prompt::COMPONENT_DOC, "## Usage\n\nDrop it in a page.")
}

/// A temporary workspace holding a screenshot and a configuration whose
/// output directory lives inside it
pub struct Workspace {
    pub dir: TempDir,
    pub config: GeneratorConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("login.png"), b"\x89PNG\r\n\x1a\nfake").unwrap();

        let mut config = GeneratorConfig::default();
        config.workspace.output_dir = dir.path().join("out");
        config.workspace.media_dir = Some(dir.path().to_path_buf());
        config.deploy.preview_base_url = "https://preview.test/".to_string();

        Self { dir, config }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.config.workspace.project_dir()
    }

    pub fn state(&self) -> PipelineState {
        PipelineState::new("login.png", DOCUMENT)
    }

    pub fn driver(&self, client: MockClient, runner: FakeRunner) -> PipelineDriver<MockClient, FakeRunner> {
        PipelineDriver::new(client, runner, self.config.clone()).unwrap()
    }

    pub fn driver_for(
        &self,
        client: MockClient,
        runner: FakeRunner,
        pipeline: Pipeline,
    ) -> PipelineDriver<MockClient, FakeRunner> {
        PipelineDriver::with_pipeline(client, runner, self.config.clone(), pipeline)
    }

    /// Run the full pipeline once over a fresh state
    pub async fn run(&self, client: &MockClient, runner: &FakeRunner) -> RunOutcome {
        self.driver(client.clone(), runner.clone()).run(self.state()).await
    }
}

/// Errors recorded by one stage
pub fn errors_of<'a>(outcome: &'a RunOutcome, stage: &str) -> Vec<&'a str> {
    let prefix = format!("[{}] ", stage);
    outcome
        .state
        .errors
        .iter()
        .filter(|e| e.starts_with(&prefix))
        .map(String::as_str)
        .collect()
}
