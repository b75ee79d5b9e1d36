//! Distance functions used to compare the pointer with candidate anchors.

use kurbo::Point;
use std::fmt;
use std::sync::Arc;

type DistanceFn = dyn Fn(Point, Point) -> f64 + Send + Sync;

/// A distance between two screen points.
#[derive(Clone)]
pub struct Metric {
    name: String,
    distance: Arc<DistanceFn>,
}

impl Metric {
    /// Wrap a custom distance function.
    pub fn custom(
        name: impl Into<String>,
        distance: impl Fn(Point, Point) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            distance: Arc::new(distance),
        }
    }

    /// Straight-line distance.
    pub fn euclidean() -> Self {
        Self::custom("euclidean", |a, b| a.distance(b))
    }

    /// Sum of absolute axis differences.
    pub fn manhattan() -> Self {
        Self::custom("manhattan", |a, b| (a.x - b.x).abs() + (a.y - b.y).abs())
    }

    /// Euclidean distance with each axis scaled first.
    ///
    /// A zero weight ignores that axis, e.g. `weighted(1.0, 0.0)` compares
    /// horizontal position only.
    pub fn weighted(wx: f64, wy: f64) -> Self {
        Self::custom("weighted", move |a, b| {
            let dx = (a.x - b.x) * wx;
            let dy = (a.y - b.y) * wy;
            (dx * dx + dy * dy).sqrt()
        })
    }

    pub fn distance(&self, a: Point, b: Point) -> f64 {
        (self.distance)(a, b)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::euclidean()
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Metric").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        let d = Metric::euclidean().distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_manhattan() {
        let d = Metric::manhattan().distance(Point::new(1.0, 1.0), Point::new(4.0, -3.0));
        assert!((d - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_ignores_axis() {
        let m = Metric::weighted(1.0, 0.0);
        let d = m.distance(Point::new(0.0, 0.0), Point::new(6.0, 100.0));
        assert!((d - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_and_debug() {
        let m = Metric::custom("constant", |_, _| 1.0);
        assert_eq!(m.distance(Point::ZERO, Point::new(9.0, 9.0)), 1.0);
        assert_eq!(format!("{m:?}"), "Metric(\"constant\")");
        assert_eq!(Metric::default().name(), "euclidean");
    }
}
