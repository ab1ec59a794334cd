//! Scenario tests driving the whole pipeline with scripted fakes

#[path = "../helpers/mod.rs"]
mod helpers;

mod full_run;
mod halt_on_setup;
mod idempotence;
mod partial_failures;
mod persistence_layout;
