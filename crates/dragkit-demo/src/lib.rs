//! DragKit demo
//!
//! Headless walkthroughs that script a pointer over small diagrams and
//! report what the resolver previews and commits.

pub mod scenarios;

pub use scenarios::{DemoError, Frame, Scenario, ScenarioRegistry, ScenarioReport, run_scenario};
