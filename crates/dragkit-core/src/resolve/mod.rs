//! Spec resolution: turning pointer motion into previews and commits.
//!
//! The pointer layer drives a [`Resolver`] with three calls:
//! - [`Resolver::begin_drag`] on pointer-down, capturing the spec tree;
//! - [`Resolver::update_drag`] on every pointer move, returning the preview;
//! - [`Resolver::end_drag`] on release, returning a commit or a cancellation.
//!
//! Resolution is synchronous and local to one pointer position: each update
//! walks the whole tree, asks the [`AnchorSource`] where every candidate would
//! render, and picks greedily. The only memory carried between moves is the
//! per-node selection used by chaining nearest-of nodes.
//!
//! Every preview walk records which child each composite node picked. A
//! second walk then follows exactly those picks and checks snap radii along
//! the way, so `Preview::committable` holds only if releasing would commit the
//! previewed state, and a release never lands anywhere else.
//!
//! A [`ResolveError`] is fatal to its session: the session is marked aborted,
//! later updates fail with [`ResolveError::SessionAborted`], and `end_drag`
//! reports [`CancelReason::Aborted`].

mod path;
mod session;
mod walk;

pub use path::{ActivePath, SEGMENT_BACKGROUND, SEGMENT_CLOSEST, SEGMENT_FOREGROUND, SEGMENT_VARY};
pub use session::{CancelReason, Commit, DragOutcome, DragPhase, DragSession, Preview};

use crate::config::DragConfig;
use crate::error::{ResolveError, ResolveResult};
use crate::metric::Metric;
use crate::spec::Spec;
use crate::state::DragState;
use kurbo::Point;
use std::marker::PhantomData;
use walk::{Mode, Resolved, Walker};

/// Where a candidate state would render, supplied by the rendering layer.
pub trait AnchorSource<S> {
    /// Screen position of `state`'s dragged element, or `None` if it cannot be
    /// placed (the candidate is then unreachable).
    fn anchor_of(&self, state: &S) -> Option<Point>;
}

impl<S, F> AnchorSource<S> for F
where
    F: Fn(&S) -> Option<Point>,
{
    fn anchor_of(&self, state: &S) -> Option<Point> {
        self(state)
    }
}

/// Drives drag sessions against an anchor source.
pub struct Resolver<S, A> {
    anchors: A,
    config: DragConfig,
    metric: Metric,
    _state: PhantomData<fn(&S)>,
}

impl<S, A> Resolver<S, A>
where
    S: DragState,
    A: AnchorSource<S>,
{
    /// Create a resolver with the default config and Euclidean distance.
    pub fn new(anchors: A) -> Self {
        Self::with_config(anchors, DragConfig::default())
    }

    pub fn with_config(anchors: A, config: DragConfig) -> Self {
        Self {
            anchors,
            config,
            metric: Metric::default(),
            _state: PhantomData,
        }
    }

    /// Replace the metric used outside any metric override.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn anchors(&self) -> &A {
        &self.anchors
    }

    /// Start a drag over `spec` with the pointer at `pointer`.
    pub fn begin_drag(&self, spec: Spec<S>, pointer: Point) -> DragSession<S> {
        log::debug!("begin drag ({}) at ({:.1}, {:.1})", spec.kind_name(), pointer.x, pointer.y);
        DragSession::new(spec, pointer)
    }

    /// Move the pointer and compute the preview.
    ///
    /// `Ok(None)` means no candidate is reachable from here; the host keeps
    /// showing the state the drag started from.
    pub fn update_drag(
        &self,
        session: &mut DragSession<S>,
        pointer: Point,
    ) -> ResolveResult<Option<Preview<S>>> {
        if session.phase == DragPhase::Aborted {
            return Err(ResolveError::SessionAborted);
        }
        session.pointer = pointer;
        session.phase = DragPhase::Previewing;

        let Some(resolved) = self.walk(session, Mode::Preview)? else {
            if session.active_path.take().is_some() {
                log::debug!("no candidate reachable at ({:.1}, {:.1})", pointer.x, pointer.y);
            }
            return Ok(None);
        };
        let committable = self.walk(session, Mode::Commit)?.is_some();

        if session.active_path.as_ref() != Some(&resolved.path) {
            log::debug!("active path -> `{}`", resolved.path);
            session.active_path = Some(resolved.path.clone());
        }

        let presentation = resolved.presentation.unwrap_or(self.config.presentation);
        let ghosts = if presentation.ghosts { resolved.ghosts } else { Vec::new() };
        Ok(Some(Preview {
            state: resolved.state,
            active_path: resolved.path,
            anchor: resolved.anchor,
            distance: resolved.distance,
            committable,
            presentation,
            ghosts,
            ghost_opacity: self.config.ghost_opacity,
        }))
    }

    /// Release the pointer: commit the selected candidate or cancel.
    pub fn end_drag(&self, mut session: DragSession<S>) -> ResolveResult<DragOutcome<S>> {
        if session.phase == DragPhase::Aborted {
            log::info!("drag cancelled: session aborted");
            return Ok(DragOutcome::Cancelled(CancelReason::Aborted));
        }

        // Refresh the selection in case the pointer never moved.
        if self.walk(&mut session, Mode::Preview)?.is_none() {
            log::info!("drag cancelled: {:?}", CancelReason::NoCandidate);
            return Ok(DragOutcome::Cancelled(CancelReason::NoCandidate));
        }
        let Some(resolved) = self.walk(&mut session, Mode::Commit)? else {
            log::info!("drag cancelled: {:?}", CancelReason::OutsideSnapRadius);
            return Ok(DragOutcome::Cancelled(CancelReason::OutsideSnapRadius));
        };

        log::info!(
            "drag committed at `{}` ({} continuation(s))",
            resolved.path,
            resolved.continuations.len()
        );
        let presentation = resolved.presentation.unwrap_or(self.config.presentation);
        Ok(DragOutcome::Committed(Commit {
            state: resolved.state,
            continuations: resolved.continuations,
            active_path: resolved.path,
            presentation,
        }))
    }

    /// Abandon a drag from outside, e.g. when the host loses focus.
    pub fn cancel_drag(&self, session: DragSession<S>) -> DragOutcome<S> {
        log::info!("drag interrupted in phase {:?}", session.phase);
        DragOutcome::Cancelled(CancelReason::Interrupted)
    }

    fn walk(&self, session: &mut DragSession<S>, mode: Mode) -> ResolveResult<Option<Resolved<S>>> {
        let DragSession {
            spec,
            origin,
            pointer,
            phase,
            sticky,
            selection,
            ..
        } = session;
        if mode == Mode::Preview {
            selection.clear();
        }
        let mut walker = Walker {
            anchors: &self.anchors,
            config: &self.config,
            origin: *origin,
            pointer: *pointer,
            mode,
            sticky,
            selection,
        };
        let result = walker.resolve(&*spec, ActivePath::root(), &self.metric);
        if let Err(err) = &result {
            log::warn!("drag aborted: {}", err);
            *phase = DragPhase::Aborted;
        }
        result
    }
}
