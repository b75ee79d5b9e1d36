//! Per-drag state and the values handed back to the pointer layer.

use super::path::ActivePath;
use crate::spec::{Presentation, Spec};
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Where a live session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Begun; no pointer move seen yet.
    Pressed,
    /// At least one preview has been computed.
    Previewing,
    /// A resolution error ended the drag. Further updates are refused.
    Aborted,
}

/// State of one drag, from pointer-down to release.
///
/// Created by [`Resolver::begin_drag`](super::Resolver::begin_drag) and
/// consumed by `end_drag` or `cancel_drag`.
#[derive(Debug)]
pub struct DragSession<S> {
    pub(super) spec: Spec<S>,
    pub(super) origin: Point,
    pub(super) pointer: Point,
    pub(super) phase: DragPhase,
    pub(super) active_path: Option<ActivePath>,
    /// Last selected child index of each nearest-of node, keyed by its path.
    pub(super) sticky: HashMap<ActivePath, usize>,
    /// Choices of the latest preview walk; the commit walk follows them.
    pub(super) selection: HashMap<ActivePath, usize>,
}

impl<S> DragSession<S> {
    pub(super) fn new(spec: Spec<S>, origin: Point) -> Self {
        Self {
            spec,
            origin,
            pointer: origin,
            phase: DragPhase::Pressed,
            active_path: None,
            sticky: HashMap::new(),
            selection: HashMap::new(),
        }
    }

    pub fn spec(&self) -> &Spec<S> {
        &self.spec
    }

    /// Pointer position at drag start.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Most recent pointer position.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Pointer displacement since drag start.
    pub fn delta(&self) -> Vec2 {
        self.pointer - self.origin
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Active path of the latest preview, if any candidate was reachable.
    pub fn active_path(&self) -> Option<&ActivePath> {
        self.active_path.as_ref()
    }
}

/// What to show for the current pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview<S> {
    /// State to render.
    pub state: S,
    /// Address of the live leaf.
    pub active_path: ActivePath,
    /// Where the previewed state anchors on screen.
    pub anchor: Point,
    /// Pointer-to-anchor distance under the live metric.
    pub distance: f64,
    /// Whether releasing now would commit exactly this state.
    pub committable: bool,
    pub presentation: Presentation,
    /// Alternative candidates, filled only when ghosts are enabled.
    pub ghosts: Vec<S>,
    /// Opacity to draw `ghosts` with.
    pub ghost_opacity: f64,
}

/// A successful drag.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit<S> {
    /// State the drag settled on.
    pub state: S,
    /// States adopted automatically afterwards, in order.
    pub continuations: Vec<S>,
    pub active_path: ActivePath,
    pub presentation: Presentation,
}

impl<S> Commit<S> {
    /// The state the host should end up in.
    pub fn final_state(&self) -> &S {
        self.continuations.last().unwrap_or(&self.state)
    }

    /// Every adopted state, committed one first.
    pub fn steps(&self) -> impl Iterator<Item = &S> {
        std::iter::once(&self.state).chain(self.continuations.iter())
    }

    pub fn into_final_state(mut self) -> S {
        self.continuations.pop().unwrap_or(self.state)
    }
}

/// Why a drag ended without committing. The host restores its original state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// No candidate could be placed on screen.
    NoCandidate,
    /// The nearest candidate lay outside its snap radius.
    OutsideSnapRadius,
    /// The host interrupted the drag.
    Interrupted,
    /// An earlier resolution error aborted the session.
    Aborted,
}

/// How a drag ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome<S> {
    Committed(Commit<S>),
    Cancelled(CancelReason),
}

impl<S> DragOutcome<S> {
    pub fn is_committed(&self) -> bool {
        matches!(self, DragOutcome::Committed(_))
    }

    pub fn commit(&self) -> Option<&Commit<S>> {
        match self {
            DragOutcome::Committed(commit) => Some(commit),
            DragOutcome::Cancelled(_) => None,
        }
    }
}
