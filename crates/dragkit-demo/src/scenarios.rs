//! Scripted drag scenarios.

use dragkit_core::{
    Amb, ConfigError, DragConfig, DragOutcome, FieldPath, Metric, NearestOptions, ProduceError, ResolveError,
    Resolver, Spec, chained, continuous, discrete_choice, fixed, insert_any, interpolate,
    json_array_mut, layered_fallback, metric_override, nearest_of_with, try_produce_amb,
};
use kurbo::Point;
use serde_json::{Value, json};
use thiserror::Error;

/// Vertical distance between items of a column.
pub const ROW_HEIGHT: f64 = 40.0;
/// Horizontal distance between columns.
pub const COLUMN_WIDTH: f64 = 120.0;
/// Length of the slider track.
pub const TRACK_LENGTH: f64 = 200.0;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Candidate generation failed: {0}")]
    Produce(#[from] ProduceError),
    #[error("Resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

/// A drag over one diagram, driven by a fixed pointer script.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    /// State before the drag.
    pub initial: fn() -> Value,
    /// Builds the drag spec from the initial state.
    pub spec: fn(&Value) -> Result<Spec<Value>, ProduceError>,
    /// Where a state's dragged element sits on screen.
    pub anchor: fn(&Value) -> Option<Point>,
    /// Pointer positions after the press, released at the last one.
    pub pointer_path: fn() -> Vec<Point>,
}

/// Registry of the built-in scenarios.
pub struct ScenarioRegistry;

impl ScenarioRegistry {
    pub fn all() -> Vec<Scenario> {
        vec![
            Scenario {
                name: "reorder",
                description: "Move a card to any slot of a two-column board",
                initial: reorder_initial,
                spec: reorder_spec,
                anchor: column_anchor,
                pointer_path: reorder_path,
            },
            Scenario {
                name: "slider",
                description: "Slide a knob that snaps to tick marks",
                initial: slider_initial,
                spec: slider_spec,
                anchor: knob_anchor,
                pointer_path: slider_path,
            },
            Scenario {
                name: "trash",
                description: "Drag a card freely or drop it on the trash to remove it",
                initial: trash_initial,
                spec: trash_spec,
                anchor: card_anchor,
                pointer_path: trash_path,
            },
        ]
    }

    pub fn find(name: &str) -> Option<Scenario> {
        Self::all().into_iter().find(|scenario| scenario.name == name)
    }

    /// Print all scenarios to console.
    pub fn print_all() {
        println!("\n=== Scenarios ===");
        for scenario in Self::all() {
            println!("  {:10} {}", scenario.name, scenario.description);
        }
        println!();
    }
}

/// One pointer move and what it previewed.
#[derive(Debug, Clone)]
pub struct Frame {
    pub pointer: Point,
    /// `None` when nothing was reachable.
    pub active_path: Option<String>,
    pub state: Option<Value>,
    pub committable: bool,
    pub ghosts: usize,
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub frames: Vec<Frame>,
    pub outcome: DragOutcome<Value>,
}

impl ScenarioReport {
    /// Print the frames and the outcome to console.
    pub fn print(&self) {
        println!("\n=== {} ===", self.name);
        for frame in &self.frames {
            match (&frame.active_path, &frame.state) {
                (Some(path), Some(state)) => println!(
                    "  ({:6.1}, {:6.1})  {:28} {}{}  ghosts={}",
                    frame.pointer.x,
                    frame.pointer.y,
                    format!("`{}`", path),
                    state,
                    if frame.committable { "" } else { " (no commit)" },
                    frame.ghosts
                ),
                _ => println!("  ({:6.1}, {:6.1})  no candidate", frame.pointer.x, frame.pointer.y),
            }
        }
        match &self.outcome {
            DragOutcome::Committed(commit) => {
                println!("  committed at `{}`", commit.active_path);
                for (step, state) in commit.steps().enumerate() {
                    println!("    {}: {}", step, state);
                }
            }
            DragOutcome::Cancelled(reason) => println!("  cancelled: {:?}", reason),
        }
    }
}

/// Press on the dragged element, follow the pointer script, release.
pub fn run_scenario(scenario: &Scenario, config: &DragConfig) -> Result<ScenarioReport, DemoError> {
    let initial = (scenario.initial)();
    let spec = (scenario.spec)(&initial)?;
    let press = (scenario.anchor)(&initial).unwrap_or(Point::ZERO);
    log::info!("Running scenario {} ({} leaves)", scenario.name, spec.leaf_paths().len());

    let resolver = Resolver::with_config(scenario.anchor, config.clone());
    let mut session = resolver.begin_drag(spec, press);
    let mut frames = Vec::new();
    for pointer in (scenario.pointer_path)() {
        let preview = resolver.update_drag(&mut session, pointer)?;
        frames.push(match preview {
            Some(preview) => Frame {
                pointer,
                active_path: Some(preview.active_path.to_string()),
                committable: preview.committable,
                ghosts: preview.ghosts.len(),
                state: Some(preview.state),
            },
            None => Frame {
                pointer,
                active_path: None,
                state: None,
                committable: false,
                ghosts: 0,
            },
        });
    }
    let outcome = resolver.end_drag(session)?;
    Ok(ScenarioReport {
        name: scenario.name,
        frames,
        outcome,
    })
}

fn reorder_initial() -> Value {
    json!({
        "columns": [["a", "b", "c"], ["d", "e"]],
        "held": "b",
    })
}

fn column_anchor(state: &Value) -> Option<Point> {
    let held = state.get("held")?;
    let columns = state.get("columns")?.as_array()?;
    columns.iter().enumerate().find_map(|(col, column)| {
        let row = column.as_array()?.iter().position(|item| item == held)?;
        Some(Point::new(col as f64 * COLUMN_WIDTH, row as f64 * ROW_HEIGHT))
    })
}

/// Every board with the held card lifted out and dropped into any slot.
fn reorder_spec(initial: &Value) -> Result<Spec<Value>, ProduceError> {
    let held = initial.get("held").cloned().unwrap_or(Value::Null);
    let columns_path = FieldPath::from("columns");
    let boards = try_produce_amb(initial, |draft: &mut Value, amb: &mut Amb<ProduceError>| {
        let columns = json_array_mut(draft, &columns_path)?;
        for column in columns.iter_mut() {
            if let Value::Array(items) = column {
                items.retain(|item| item != &held);
            }
        }
        let target = amb.choose_index(columns.len())?;
        let Some(Value::Array(items)) = columns.get_mut(target) else {
            return amb.prune();
        };
        insert_any(amb, items, held.clone())?;
        Ok(())
    })?;
    log::debug!("reorder: {} candidate boards", boards.len());

    let options = NearestOptions {
        snap_radius: Some(30.0),
        chaining: true,
    };
    Ok(nearest_of_with(boards.into_iter().map(fixed), options).with_ghosts())
}

fn reorder_path() -> Vec<Point> {
    vec![
        Point::new(30.0, 45.0),
        Point::new(70.0, 60.0),
        Point::new(110.0, 75.0),
        Point::new(118.0, 82.0),
    ]
}

fn knob_at(x: f64) -> Value {
    json!({ "knob": { "x": x, "y": 0.0 } })
}

fn slider_initial() -> Value {
    knob_at(0.0)
}

fn knob_anchor(state: &Value) -> Option<Point> {
    let knob = state.get("knob")?;
    Some(Point::new(knob.get("x")?.as_f64()?, knob.get("y")?.as_f64()?))
}

/// Ticks every quarter of the track win within 8 units; elsewhere the knob
/// follows the pointer. Only horizontal distance counts.
fn slider_spec(_initial: &Value) -> Result<Spec<Value>, ProduceError> {
    let ticks = (0..=4).map(|i| knob_at(f64::from(i) * TRACK_LENGTH / 4.0));
    let track = interpolate(knob_at(0.0), knob_at(TRACK_LENGTH));
    Ok(metric_override(
        layered_fallback(discrete_choice(ticks), track, 8.0),
        Metric::weighted(1.0, 0.0),
    ))
}

fn slider_path() -> Vec<Point> {
    vec![
        Point::new(20.0, 30.0),
        Point::new(47.0, 10.0),
        Point::new(130.0, 5.0),
    ]
}

fn card_at(x: f64, y: f64, removed: bool) -> Value {
    json!({ "card": { "x": x, "y": y }, "removed": removed })
}

fn trash_initial() -> Value {
    card_at(50.0, 50.0, false)
}

fn card_anchor(state: &Value) -> Option<Point> {
    let card = state.get("card")?;
    Some(Point::new(card.get("x")?.as_f64()?, card.get("y")?.as_f64()?))
}

/// Near the trash the card snaps onto it and is removed after the drop.
fn trash_spec(initial: &Value) -> Result<Spec<Value>, ProduceError> {
    let on_trash = chained(fixed(card_at(300.0, 300.0, false)), card_at(300.0, 300.0, true));
    let free = continuous(initial.clone())
        .field_x("card/x")
        .clamp(0.0, 400.0)
        .field_y("card/y")
        .clamp(0.0, 400.0)
        .build();
    Ok(layered_fallback(on_trash, free, 40.0).floating())
}

fn trash_path() -> Vec<Point> {
    vec![
        Point::new(150.0, 120.0),
        Point::new(280.0, 290.0),
        Point::new(295.0, 305.0),
    ]
}
