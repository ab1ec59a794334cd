//! Naive textual dependency detection for generated components

use crate::core::ComponentFiles;
use indexmap::IndexSet;
use regex::Regex;
use std::sync::OnceLock;

/// What one component's files reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// `import { … } from '@angular/…'` statements in the script file
    pub modules: Vec<String>,

    /// Distinct opening-tag names in the markup file, first-seen order
    pub components: Vec<String>,
}

fn angular_import_regex() -> &'static Regex {
    static ANGULAR_IMPORT: OnceLock<Regex> = OnceLock::new();
    ANGULAR_IMPORT.get_or_init(|| {
        Regex::new(r#"import\s*\{[^}]*\}\s*from\s*['"]@angular/[^'"]+['"]"#)
            .expect("Invalid import regex")
    })
}

fn opening_tag_regex() -> &'static Regex {
    static OPENING_TAG: OnceLock<Regex> = OnceLock::new();
    OPENING_TAG.get_or_init(|| Regex::new(r"<([\w-]+)[^>]*>").expect("Invalid tag regex"))
}

fn file_ending_with<'a>(files: &'a ComponentFiles, suffix: &str) -> &'a str {
    files
        .iter()
        .find(|(name, _)| name.ends_with(suffix))
        .map(|(_, code)| code.as_str())
        .unwrap_or_default()
}

/// Scan the `*component.ts` and `*component.html` entries of a component.
///
/// Shallow by construction: one component at a time, no transitive
/// resolution.
pub fn detect_dependencies(files: &ComponentFiles) -> Dependencies {
    let script = file_ending_with(files, "component.ts");
    let markup = file_ending_with(files, "component.html");

    let modules = angular_import_regex()
        .find_iter(script)
        .map(|m| m.as_str().to_string())
        .collect();

    let components: IndexSet<String> = opening_tag_regex()
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Dependencies {
        modules,
        components: components.into_iter().collect(),
    }
}
