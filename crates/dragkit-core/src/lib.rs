//! DragKit Core Library
//!
//! Declarative drag interactions for diagram editors. A host describes the
//! states a drag may land on as a [`Spec`] tree; the [`Resolver`] turns
//! pointer positions into previews and, on release, a commit or a cancel.
//! Candidate states are usually generated with [`produce_amb`] on top of the
//! [`amb`] nondeterministic-choice evaluator.

pub mod amb;
pub mod config;
pub mod error;
pub mod metric;
pub mod produce;
pub mod resolve;
pub mod spec;
pub mod state;

pub use amb::{Amb, Signal, collect, enumerate, try_collect, try_enumerate};
pub use config::{DEFAULT_GHOST_OPACITY, DEFAULT_HYSTERESIS, DragConfig};
pub use error::{ConfigError, ProduceError, ResolveError, ResolveResult};
pub use metric::Metric;
pub use produce::{
    insert_any, json_array_mut, move_any, produce_amb, produce_amb_distinct, remove_any, swap_any,
    try_produce_amb,
};
pub use resolve::{
    ActivePath, AnchorSource, CancelReason, Commit, DragOutcome, DragPhase, DragSession, Preview,
    Resolver,
};
pub use spec::{
    Axis, Easing, NearestOptions, Presentation, Spec, SpecKind, Transition, chained, continuous,
    continuous_xy, discrete_choice, fixed, interpolate, layered_fallback, metric_override,
    nearest_of, nearest_of_with, span,
};
pub use state::{DragState, FieldPath, Segment};
