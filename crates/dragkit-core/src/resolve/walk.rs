//! Recursive resolution of a spec tree against one pointer position.

use super::AnchorSource;
use super::path::ActivePath;
use crate::config::DragConfig;
use crate::error::{ResolveError, ResolveResult};
use crate::metric::Metric;
use crate::spec::{Continuous, DrivenField, LayeredFallback, NearestOf, Presentation, Spec, SpecKind};
use crate::state::DragState;
use kurbo::Point;
use std::collections::HashMap;

/// Preview selects among candidates and records the selection; commit
/// follows that selection and enforces snap radii on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    Preview,
    Commit,
}

/// Layer recorded for a layered fallback node.
const LAYER_FOREGROUND: usize = 0;
const LAYER_BACKGROUND: usize = 1;

/// A node resolved to a concrete candidate.
#[derive(Debug, Clone)]
pub(super) struct Resolved<S> {
    pub state: S,
    pub anchor: Point,
    pub distance: f64,
    pub path: ActivePath,
    /// Chained follow-up states, innermost chain first.
    pub continuations: Vec<S>,
    /// Innermost presentation set on the way to the leaf.
    pub presentation: Option<Presentation>,
    /// States of the unselected candidates of every nearest-of on the path.
    pub ghosts: Vec<S>,
}

impl<S> Resolved<S> {
    fn leaf(state: S, anchor: Point, distance: f64, path: ActivePath) -> Self {
        Self {
            state,
            anchor,
            distance,
            path,
            continuations: Vec::new(),
            presentation: None,
            ghosts: Vec::new(),
        }
    }
}

pub(super) struct Walker<'a, A: ?Sized> {
    pub anchors: &'a A,
    pub config: &'a DragConfig,
    pub origin: Point,
    pub pointer: Point,
    pub mode: Mode,
    pub sticky: &'a mut HashMap<ActivePath, usize>,
    /// Child (or layer) each composite node picked in the latest preview walk.
    pub selection: &'a mut HashMap<ActivePath, usize>,
}

impl<A: ?Sized> Walker<'_, A> {
    /// Resolve `spec`. `Ok(None)` means the node is not currently reachable.
    pub fn resolve<S>(
        &mut self,
        spec: &Spec<S>,
        prefix: ActivePath,
        metric: &Metric,
    ) -> ResolveResult<Option<Resolved<S>>>
    where
        S: DragState,
        A: AnchorSource<S>,
    {
        let resolved = match &spec.kind {
            SpecKind::Fixed(state) => self.resolve_fixed(state, prefix, metric),
            SpecKind::Continuous(Continuous::Fields { base, fields }) => {
                self.resolve_fields(base, fields, prefix, metric).map(Some)
            }
            SpecKind::Continuous(Continuous::Span(states)) => {
                self.resolve_span(states, prefix, metric)
            }
            SpecKind::NearestOf(node) => self.resolve_nearest(node, prefix, metric),
            SpecKind::LayeredFallback(node) => self.resolve_layered(node, prefix, metric),
            SpecKind::Chained(node) => {
                let resolved = self.resolve(&node.child, prefix, metric)?;
                Ok(resolved.map(|mut r| {
                    r.continuations.push(node.continuation.clone());
                    r
                }))
            }
            SpecKind::MetricOverride(node) => {
                let resolved = self.resolve(&node.child, prefix, &node.metric)?;
                // Outside the subtree, the result is compared with the outer metric.
                Ok(resolved.map(|mut r| {
                    r.distance = metric.distance(self.pointer, r.anchor);
                    r
                }))
            }
        }?;

        Ok(resolved.map(|mut r| {
            if r.presentation.is_none() {
                r.presentation = spec.presentation;
            }
            r
        }))
    }

    fn resolve_fixed<S>(
        &self,
        state: &S,
        prefix: ActivePath,
        metric: &Metric,
    ) -> ResolveResult<Option<Resolved<S>>>
    where
        S: DragState,
        A: AnchorSource<S>,
    {
        let Some(anchor) = self.anchors.anchor_of(state) else {
            log::trace!("fixed at `{}` has no anchor", prefix);
            return Ok(None);
        };
        let distance = metric.distance(self.pointer, anchor);
        Ok(Some(Resolved::leaf(state.clone(), anchor, distance, prefix)))
    }

    fn resolve_fields<S>(
        &self,
        base: &S,
        fields: &[DrivenField],
        prefix: ActivePath,
        metric: &Metric,
    ) -> ResolveResult<Resolved<S>>
    where
        S: DragState,
        A: AnchorSource<S>,
    {
        let delta = self.pointer - self.origin;
        let mut state = base.clone();
        for field in fields {
            let missing = || ResolveError::MissingField {
                path: prefix.to_string(),
                field: field.path.clone(),
            };
            let start = base.number_at(&field.path).ok_or_else(missing)?;
            let mut value = start + field.scale * field.axis.project(delta);
            if let Some((min, max)) = field.clamp {
                value = value.clamp(min, max);
            }
            if !state.set_number(&field.path, value) {
                return Err(missing());
            }
        }
        // A state the renderer cannot place sits under the pointer.
        let anchor = self.anchors.anchor_of(&state).unwrap_or(self.pointer);
        let distance = metric.distance(self.pointer, anchor);
        Ok(Resolved::leaf(state, anchor, distance, prefix.vary()))
    }

    fn resolve_span<S>(
        &self,
        states: &[S],
        prefix: ActivePath,
        metric: &Metric,
    ) -> ResolveResult<Option<Resolved<S>>>
    where
        S: DragState,
        A: AnchorSource<S>,
    {
        if states.len() < 2 {
            return Err(ResolveError::DegenerateSpan {
                path: prefix.to_string(),
                states: states.len(),
            });
        }
        let mut placed: Vec<(&S, Point)> = Vec::with_capacity(states.len());
        for (index, state) in states.iter().enumerate() {
            let anchor = self.anchors.anchor_of(state).ok_or_else(|| ResolveError::UnplaceableSpanState {
                path: prefix.to_string(),
                index,
            })?;
            placed.push((state, anchor));
        }

        // Nearest point on the polyline through the anchors; earliest segment on ties.
        let mut best: Option<(usize, f64, Point, f64)> = None;
        for (index, pair) in placed.windows(2).enumerate() {
            let (a, b) = (pair[0].1, pair[1].1);
            let (t, projected) = project_onto_segment(self.pointer, a, b);
            let distance = metric.distance(self.pointer, projected);
            if distance.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, _, _, d)| distance < d) {
                best = Some((index, t, projected, distance));
            }
        }
        let Some((index, t, anchor, distance)) = best else {
            log::warn!("span at `{}`: metric gave no comparable distance", prefix);
            return Ok(None);
        };

        let (from, to) = (placed[index].0, placed[index + 1].0);
        let state = from.lerp(to, t).ok_or_else(|| ResolveError::IncompatibleStates {
            path: prefix.to_string(),
        })?;
        Ok(Some(Resolved::leaf(state, anchor, distance, prefix.vary())))
    }

    fn resolve_nearest<S>(
        &mut self,
        node: &NearestOf<S>,
        prefix: ActivePath,
        metric: &Metric,
    ) -> ResolveResult<Option<Resolved<S>>>
    where
        S: DragState,
        A: AnchorSource<S>,
    {
        if node.children.is_empty() {
            return Err(ResolveError::EmptyNearestOf {
                path: prefix.to_string(),
            });
        }

        if self.mode == Mode::Commit {
            return self.commit_nearest(node, prefix, metric);
        }

        let mut candidates: Vec<(usize, Resolved<S>)> = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            let Some(resolved) = self.resolve(child, prefix.closest(index), metric)? else {
                continue;
            };
            if resolved.distance.is_nan() {
                log::warn!("nearest-of at `{}`: child {} has no comparable distance", prefix, index);
                continue;
            }
            candidates.push((index, resolved));
        }
        if candidates.is_empty() {
            return Ok(None);
        }

        // Strict comparison keeps the earliest child on ties.
        let mut best = 0;
        for (position, (_, candidate)) in candidates.iter().enumerate().skip(1) {
            if candidate.distance < candidates[best].1.distance {
                best = position;
            }
        }

        let mut chosen = best;
        if node.chaining {
            let previous = self
                .sticky
                .get(&prefix)
                .and_then(|&index| candidates.iter().position(|(i, _)| *i == index));
            if let Some(previous) = previous {
                let margin = self.config.hysteresis;
                if candidates[previous].1.distance <= candidates[best].1.distance + margin {
                    chosen = previous;
                }
            }
        }

        let index = candidates[chosen].0;
        self.selection.insert(prefix.clone(), index);
        if self.sticky.insert(prefix.clone(), index) != Some(index) {
            log::debug!("nearest-of at `{}` selected child {}", prefix, index);
        }

        let (_, mut resolved) = candidates.remove(chosen);
        resolved
            .ghosts
            .extend(candidates.into_iter().map(|(_, other)| other.state));
        Ok(Some(resolved))
    }

    fn resolve_layered<S>(
        &mut self,
        node: &LayeredFallback<S>,
        prefix: ActivePath,
        metric: &Metric,
    ) -> ResolveResult<Option<Resolved<S>>>
    where
        S: DragState,
        A: AnchorSource<S>,
    {
        if self.mode == Mode::Commit {
            return match self.selection.get(&prefix).copied() {
                Some(LAYER_FOREGROUND) => self.resolve(&node.foreground, prefix.foreground(), metric),
                Some(_) => self.resolve(&node.background, prefix.background(), metric),
                None => Ok(None),
            };
        }

        let foreground = self.resolve(&node.foreground, prefix.foreground(), metric)?;
        if foreground.as_ref().is_some_and(|fg| fg.distance <= node.radius) {
            self.selection.insert(prefix, LAYER_FOREGROUND);
            return Ok(foreground);
        }
        match self.resolve(&node.background, prefix.background(), metric)? {
            Some(background) => {
                self.selection.insert(prefix, LAYER_BACKGROUND);
                Ok(Some(background))
            }
            None => {
                if foreground.is_some() {
                    self.selection.insert(prefix, LAYER_FOREGROUND);
                }
                Ok(foreground)
            }
        }
    }

    /// Re-resolve only the child the preview selected and check its snap radius.
    fn commit_nearest<S>(
        &mut self,
        node: &NearestOf<S>,
        prefix: ActivePath,
        metric: &Metric,
    ) -> ResolveResult<Option<Resolved<S>>>
    where
        S: DragState,
        A: AnchorSource<S>,
    {
        let Some(&index) = self.selection.get(&prefix) else {
            return Ok(None);
        };
        let Some(child) = node.children.get(index) else {
            return Ok(None);
        };
        let Some(resolved) = self.resolve(child, prefix.closest(index), metric)? else {
            return Ok(None);
        };
        if let Some(radius) = node.snap_radius.or(self.config.snap_radius) {
            if !(resolved.distance <= radius) {
                log::debug!(
                    "nearest-of at `{}`: child {} at {:.1} outside snap radius {:.1}",
                    prefix,
                    index,
                    resolved.distance,
                    radius
                );
                return Ok(None);
            }
        }
        Ok(Some(resolved))
    }
}

/// Parameter in `[0, 1]` and point of the projection of `p` onto segment `ab`.
fn project_onto_segment(p: Point, a: Point, b: Point) -> (f64, Point) {
    let ab = b - a;
    let length_sq = ab.hypot2();
    if length_sq == 0.0 {
        return (0.0, a);
    }
    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    (t, a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_onto_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert_eq!(project_onto_segment(Point::new(25.0, 10.0), a, b), (0.25, Point::new(25.0, 0.0)));
        assert_eq!(project_onto_segment(Point::new(-5.0, 3.0), a, b), (0.0, a));
        assert_eq!(project_onto_segment(Point::new(500.0, 0.0), a, b), (1.0, b));
        assert_eq!(project_onto_segment(Point::new(5.0, 5.0), a, a), (0.0, a));
    }
}
