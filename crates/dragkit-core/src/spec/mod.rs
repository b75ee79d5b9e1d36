//! Declarative drag specifications.
//!
//! A spec tree describes where a dragged element may land and how it previews
//! on the way. Trees are built fresh when a drag starts and never mutated; the
//! resolver walks them on every pointer move.
//!
//! Leaves:
//! - [`fixed`]: one concrete target state.
//! - [`continuous`]: a state whose numeric fields follow the pointer.
//! - [`span`] / [`interpolate`]: a state blended along a path between states.
//!
//! Composites:
//! - [`nearest_of`]: whichever child's anchor is closest to the pointer.
//! - [`layered_fallback`]: foreground while the pointer is near it, else background.
//! - [`chained`]: adopt a follow-up state automatically after commit.
//! - [`metric_override`]: compare distances with another metric in a subtree.

mod presentation;

pub use presentation::{DEFAULT_TRANSITION_MS, Easing, Presentation, Transition};

use crate::metric::Metric;
use crate::resolve::ActivePath;
use crate::state::FieldPath;
use kurbo::Vec2;

/// A node of a spec tree.
#[derive(Debug, Clone)]
pub struct Spec<S> {
    pub kind: SpecKind<S>,
    /// Rendering hints. The innermost node on the active path that sets one wins.
    pub presentation: Option<Presentation>,
}

/// The drag behaviours a spec node can describe.
#[derive(Debug, Clone)]
pub enum SpecKind<S> {
    Fixed(S),
    Continuous(Continuous<S>),
    NearestOf(NearestOf<S>),
    LayeredFallback(LayeredFallback<S>),
    Chained(Chained<S>),
    MetricOverride(MetricOverride<S>),
}

/// Direction of pointer displacement that drives a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Axis {
    X,
    Y,
    /// Displacement projected onto a direction (normalized on use).
    Along(Vec2),
}

impl Axis {
    /// Component of `delta` along this axis.
    pub fn project(self, delta: Vec2) -> f64 {
        match self {
            Axis::X => delta.x,
            Axis::Y => delta.y,
            Axis::Along(direction) => {
                let length = direction.hypot();
                if length == 0.0 { 0.0 } else { delta.dot(direction) / length }
            }
        }
    }
}

/// A numeric field driven by pointer displacement.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivenField {
    pub path: FieldPath,
    pub axis: Axis,
    /// State units per screen unit.
    pub scale: f64,
    /// Inclusive bounds the driven value is clamped to.
    pub clamp: Option<(f64, f64)>,
}

/// Continuous variation of a state.
#[derive(Debug, Clone)]
pub enum Continuous<S> {
    /// Fields of `base` offset linearly by pointer displacement.
    Fields { base: S, fields: Vec<DrivenField> },
    /// Blend along the polyline joining the anchors of these states.
    Span(Vec<S>),
}

/// Options for [`nearest_of_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NearestOptions {
    /// Maximum distance at which the selected child may commit.
    pub snap_radius: Option<f64>,
    /// Keep the previous selection until another child wins by the
    /// configured hysteresis margin.
    pub chaining: bool,
}

/// Children competing on pointer distance; the closest reachable one is live.
#[derive(Debug, Clone)]
pub struct NearestOf<S> {
    pub children: Vec<Spec<S>>,
    /// Commit only within this distance; falls back to the config default.
    pub snap_radius: Option<f64>,
    pub chaining: bool,
}

/// A preferred foreground with a background used away from it.
#[derive(Debug, Clone)]
pub struct LayeredFallback<S> {
    pub foreground: Box<Spec<S>>,
    pub background: Box<Spec<S>>,
    /// Pointer-to-foreground-anchor distance below which foreground is live.
    pub radius: f64,
}

/// A child followed by a state adopted after it commits.
#[derive(Debug, Clone)]
pub struct Chained<S> {
    pub child: Box<Spec<S>>,
    /// State adopted automatically once `child` commits.
    pub continuation: S,
}

/// A subtree whose distances are measured with its own metric.
#[derive(Debug, Clone)]
pub struct MetricOverride<S> {
    pub child: Box<Spec<S>>,
    pub metric: Metric,
}

impl<S> From<SpecKind<S>> for Spec<S> {
    fn from(kind: SpecKind<S>) -> Self {
        Self { kind, presentation: None }
    }
}

impl<S> Spec<S> {
    fn presentation_mut(&mut self) -> &mut Presentation {
        self.presentation.get_or_insert_with(Presentation::default)
    }

    /// Render the dragged element detached from layout while this node is live.
    pub fn floating(mut self) -> Self {
        self.presentation_mut().floating = true;
        self
    }

    /// Show the alternative candidates as ghosts while this node is live.
    pub fn with_ghosts(mut self) -> Self {
        self.presentation_mut().ghosts = true;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.presentation_mut().transition = Some(transition);
        self
    }

    /// Snap instantly on commit/cancel.
    pub fn without_transition(mut self) -> Self {
        self.presentation_mut().transition = None;
        self
    }

    /// Short name of the node kind, for logs and overlays.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SpecKind::Fixed(_) => "fixed",
            SpecKind::Continuous(_) => "continuous",
            SpecKind::NearestOf(_) => "nearest_of",
            SpecKind::LayeredFallback(_) => "layered_fallback",
            SpecKind::Chained(_) => "chained",
            SpecKind::MetricOverride(_) => "metric_override",
        }
    }

    /// Every active path this tree can report, in depth-first order.
    pub fn leaf_paths(&self) -> Vec<ActivePath> {
        let mut out = Vec::new();
        self.collect_leaf_paths(ActivePath::root(), &mut out);
        out
    }

    fn collect_leaf_paths(&self, prefix: ActivePath, out: &mut Vec<ActivePath>) {
        match &self.kind {
            SpecKind::Fixed(_) => out.push(prefix),
            SpecKind::Continuous(_) => out.push(prefix.vary()),
            SpecKind::NearestOf(node) => {
                for (index, child) in node.children.iter().enumerate() {
                    child.collect_leaf_paths(prefix.closest(index), out);
                }
            }
            SpecKind::LayeredFallback(node) => {
                node.foreground.collect_leaf_paths(prefix.foreground(), out);
                node.background.collect_leaf_paths(prefix.background(), out);
            }
            SpecKind::Chained(node) => node.child.collect_leaf_paths(prefix, out),
            SpecKind::MetricOverride(node) => node.child.collect_leaf_paths(prefix, out),
        }
    }
}

/// Settle on exactly `state`.
pub fn fixed<S>(state: S) -> Spec<S> {
    SpecKind::Fixed(state).into()
}

/// Start a continuous spec over `base`. Add fields with the builder.
pub fn continuous<S>(base: S) -> ContinuousBuilder<S> {
    ContinuousBuilder { base, fields: Vec::new() }
}

/// Continuous spec with `x_path` following horizontal and `y_path` vertical
/// pointer movement, one state unit per screen unit.
pub fn continuous_xy<S>(base: S, x_path: impl Into<FieldPath>, y_path: impl Into<FieldPath>) -> Spec<S> {
    continuous(base).field_x(x_path).field_y(y_path).build()
}

/// Builder for [`Continuous::Fields`].
#[derive(Debug, Clone)]
pub struct ContinuousBuilder<S> {
    base: S,
    fields: Vec<DrivenField>,
}

impl<S> ContinuousBuilder<S> {
    /// Drive `path` by displacement along `axis`.
    pub fn field(mut self, path: impl Into<FieldPath>, axis: Axis) -> Self {
        self.fields.push(DrivenField {
            path: path.into(),
            axis,
            scale: 1.0,
            clamp: None,
        });
        self
    }

    pub fn field_x(self, path: impl Into<FieldPath>) -> Self {
        self.field(path, Axis::X)
    }

    pub fn field_y(self, path: impl Into<FieldPath>) -> Self {
        self.field(path, Axis::Y)
    }

    /// Scale of the most recently added field.
    pub fn scale(mut self, scale: f64) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.scale = scale;
        }
        self
    }

    /// Clamp the most recently added field to `[min, max]`.
    pub fn clamp(mut self, min: f64, max: f64) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.clamp = Some((min.min(max), min.max(max)));
        }
        self
    }

    pub fn build(self) -> Spec<S> {
        SpecKind::Continuous(Continuous::Fields {
            base: self.base,
            fields: self.fields,
        })
        .into()
    }
}

impl<S> From<ContinuousBuilder<S>> for Spec<S> {
    fn from(builder: ContinuousBuilder<S>) -> Self {
        builder.build()
    }
}

/// Pick the child whose anchor is nearest the pointer.
pub fn nearest_of<S>(children: impl IntoIterator<Item = Spec<S>>) -> Spec<S> {
    nearest_of_with(children, NearestOptions::default())
}

/// [`nearest_of`] with a snap radius and/or chaining.
pub fn nearest_of_with<S>(children: impl IntoIterator<Item = Spec<S>>, options: NearestOptions) -> Spec<S> {
    SpecKind::NearestOf(NearestOf {
        children: children.into_iter().collect(),
        snap_radius: options.snap_radius,
        chaining: options.chaining,
    })
    .into()
}

/// Prefer `foreground` while the pointer is within `radius` of its anchor.
pub fn layered_fallback<S>(foreground: Spec<S>, background: Spec<S>, radius: f64) -> Spec<S> {
    let radius = if radius >= 0.0 {
        radius
    } else {
        log::warn!("layered_fallback: negative radius {} clamped to 0", radius);
        0.0
    };
    SpecKind::LayeredFallback(LayeredFallback {
        foreground: Box::new(foreground),
        background: Box::new(background),
        radius,
    })
    .into()
}

/// Resolve as `child`; after it commits, move on to `continuation`.
pub fn chained<S>(child: Spec<S>, continuation: S) -> Spec<S> {
    SpecKind::Chained(Chained {
        child: Box::new(child),
        continuation,
    })
    .into()
}

/// Resolve `child` comparing distances with `metric`.
pub fn metric_override<S>(child: Spec<S>, metric: Metric) -> Spec<S> {
    SpecKind::MetricOverride(MetricOverride {
        child: Box::new(child),
        metric,
    })
    .into()
}

/// Nearest of a set of fixed states.
pub fn discrete_choice<S>(states: impl IntoIterator<Item = S>) -> Spec<S> {
    nearest_of(states.into_iter().map(fixed))
}

/// Blend continuously along the path through `states`.
pub fn span<S>(states: impl IntoIterator<Item = S>) -> Spec<S> {
    let leaf = SpecKind::Continuous(Continuous::Span(states.into_iter().collect())).into();
    nearest_of([leaf])
}

/// Blend continuously between two states.
pub fn interpolate<S>(a: S, b: S) -> Spec<S> {
    span([a, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_discrete_choice_is_nearest_of_fixed() {
        let spec = discrete_choice([json!(1), json!(2)]);
        let SpecKind::NearestOf(node) = &spec.kind else {
            panic!("expected nearest_of, got {}", spec.kind_name());
        };
        assert_eq!(node.children.len(), 2);
        assert!(node.children.iter().all(|c| matches!(c.kind, SpecKind::Fixed(_))));
        assert!(!node.chaining);
        assert_eq!(node.snap_radius, None);
    }

    #[test]
    fn test_interpolate_is_single_span() {
        let spec = interpolate(json!({"x": 0}), json!({"x": 1}));
        let SpecKind::NearestOf(node) = &spec.kind else {
            panic!("expected nearest_of");
        };
        assert_eq!(node.children.len(), 1);
        assert!(matches!(
            &node.children[0].kind,
            SpecKind::Continuous(Continuous::Span(states)) if states.len() == 2
        ));
    }

    #[test]
    fn test_continuous_builder() {
        let spec: Spec<Value> = continuous(json!({"x": 0, "y": 0}))
            .field_x("x")
            .scale(0.5)
            .clamp(10.0, -10.0)
            .field_y("y")
            .build();
        let SpecKind::Continuous(Continuous::Fields { fields, .. }) = &spec.kind else {
            panic!("expected continuous fields");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].scale, 0.5);
        assert_eq!(fields[0].clamp, Some((-10.0, 10.0)));
        assert_eq!(fields[1].axis, Axis::Y);
        assert_eq!(fields[1].scale, 1.0);
    }

    #[test]
    fn test_negative_radius_clamped() {
        let spec = layered_fallback(fixed(json!(1)), fixed(json!(2)), -3.0);
        let SpecKind::LayeredFallback(node) = &spec.kind else {
            panic!("expected layered_fallback");
        };
        assert_eq!(node.radius, 0.0);
    }

    #[test]
    fn test_presentation_builders() {
        let spec = fixed(json!(1)).floating().with_ghosts();
        let presentation = spec.presentation.unwrap();
        assert!(presentation.floating);
        assert!(presentation.ghosts);
        assert_eq!(presentation.transition, None);
        assert!(fixed(json!(1)).presentation.is_none());
    }

    #[test]
    fn test_without_transition() {
        let spec = fixed(json!(1)).with_transition(Transition::default()).without_transition();
        let presentation = spec.presentation.unwrap();
        assert_eq!(presentation.transition, None);
        assert!(!presentation.floating);

        // Setting it on a bare node still records an explicit presentation.
        let spec = fixed(json!(1)).without_transition();
        assert_eq!(spec.presentation, Some(Presentation::default()));
    }

    #[test]
    fn test_axis_projection() {
        let delta = Vec2::new(3.0, 4.0);
        assert_eq!(Axis::X.project(delta), 3.0);
        assert_eq!(Axis::Y.project(delta), 4.0);
        assert!((Axis::Along(Vec2::new(2.0, 0.0)).project(delta) - 3.0).abs() < 1e-9);
        assert_eq!(Axis::Along(Vec2::ZERO).project(delta), 0.0);
    }

    #[test]
    fn test_leaf_paths() {
        let spec = nearest_of([
            fixed(json!(0)),
            layered_fallback(
                continuous_xy(json!({"x": 0, "y": 0}), "x", "y"),
                chained(discrete_choice([json!(1), json!(2)]), json!(3)),
                20.0,
            ),
        ]);
        let paths: Vec<String> = spec.leaf_paths().iter().map(ToString::to_string).collect();
        assert_eq!(
            paths,
            vec![
                "closest/0",
                "closest/1/foreground/vary",
                "closest/1/background/closest/0",
                "closest/1/background/closest/1",
            ]
        );
    }
}
