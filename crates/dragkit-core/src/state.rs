//! Addressing and interpolating numeric leaves of a draggable state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Object member.
    Key(String),
    /// Array element (or an object member whose key is the decimal index).
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Address of a leaf inside a state, written `items/2/x`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Append an object key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Segment::Key(key.into()));
        self
    }

    /// Append an array index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Follow the path from `root`.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(root, |node, segment| match (node, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key),
            (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
            (Value::Array(items), Segment::Index(index)) => items.get(*index),
            _ => None,
        })
    }

    /// Follow the path from `root`, mutably.
    pub fn lookup_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        self.0.iter().try_fold(root, |node, segment| match (node, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get_mut(key),
            (Value::Object(map), Segment::Index(index)) => map.get_mut(&index.to_string()),
            (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
            _ => None,
        })
    }
}

impl From<&str> for FieldPath {
    /// Parse a slash-delimited path. All-digit segments become indices.
    fn from(text: &str) -> Self {
        let segments = text
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<usize>() {
                Ok(index) => Segment::Index(index),
                Err(_) => Segment::Key(part.to_string()),
            })
            .collect();
        Self(segments)
    }
}

impl From<String> for FieldPath {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// A state the resolver can preview and drive.
///
/// States are values: the resolver clones them and never mutates a state it
/// was handed.
pub trait DragState: Clone + fmt::Debug {
    /// Read the numeric leaf at `path`.
    fn number_at(&self, path: &FieldPath) -> Option<f64>;

    /// Overwrite the numeric leaf at `path`. Returns false if there is no
    /// numeric leaf there (or `value` is not finite).
    fn set_number(&mut self, path: &FieldPath, value: f64) -> bool;

    /// Blend toward `other` by `t` in `[0, 1]`.
    ///
    /// Returns `None` when the two states do not share a shape.
    fn lerp(&self, other: &Self, t: f64) -> Option<Self>;
}

impl DragState for Value {
    fn number_at(&self, path: &FieldPath) -> Option<f64> {
        path.lookup(self).and_then(Value::as_f64)
    }

    fn set_number(&mut self, path: &FieldPath, value: f64) -> bool {
        let Some(slot) = path.lookup_mut(self) else {
            return false;
        };
        if !slot.is_number() {
            return false;
        }
        match serde_json::Number::from_f64(value) {
            Some(number) => {
                *slot = Value::Number(number);
                true
            }
            None => false,
        }
    }

    fn lerp(&self, other: &Self, t: f64) -> Option<Self> {
        lerp_value(self, other, t)
    }
}

fn lerp_value(a: &Value, b: &Value, t: f64) -> Option<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64()?, y.as_f64()?);
            serde_json::Number::from_f64(x + (y - x) * t).map(Value::Number)
        }
        (Value::Array(xs), Value::Array(ys)) => {
            if xs.len() != ys.len() {
                return None;
            }
            xs.iter()
                .zip(ys)
                .map(|(x, y)| lerp_value(x, y, t))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
        }
        (Value::Object(xs), Value::Object(ys)) => {
            if xs.len() != ys.len() {
                return None;
            }
            let mut out = Map::new();
            for (key, x) in xs {
                let y = ys.get(key)?;
                out.insert(key.clone(), lerp_value(x, y, t)?);
            }
            Some(Value::Object(out))
        }
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => None,
        _ => Some(if t < 0.5 { a.clone() } else { b.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_display() {
        let path = FieldPath::from("items/2/x");
        assert_eq!(
            path,
            FieldPath::root().key("items").index(2).key("x")
        );
        assert_eq!(path.to_string(), "items/2/x");
        assert!(FieldPath::from("").is_root());
    }

    #[test]
    fn test_number_at() {
        let state = json!({"items": [{"x": 1.5}, {"x": 4}]});
        assert_eq!(state.number_at(&"items/1/x".into()), Some(4.0));
        assert_eq!(state.number_at(&"items/0/x".into()), Some(1.5));
        assert_eq!(state.number_at(&"items/5/x".into()), None);
        assert_eq!(state.number_at(&"items".into()), None);
    }

    #[test]
    fn test_index_on_object_uses_decimal_key() {
        let state = json!({"rows": {"0": {"y": 3}}});
        assert_eq!(state.number_at(&"rows/0/y".into()), Some(3.0));
    }

    #[test]
    fn test_set_number() {
        let mut state = json!({"pos": {"x": 0, "label": "a"}});
        assert!(state.set_number(&"pos/x".into(), 12.5));
        assert_eq!(state, json!({"pos": {"x": 12.5, "label": "a"}}));
        // Non-numeric and missing leaves are refused.
        assert!(!state.set_number(&"pos/label".into(), 1.0));
        assert!(!state.set_number(&"pos/y".into(), 1.0));
        assert!(!state.set_number(&"pos/x".into(), f64::NAN));
    }

    #[test]
    fn test_lerp_blends_numbers() {
        let a = json!({"x": 0.0, "y": [10.0, 20.0], "tag": "a"});
        let b = json!({"x": 100.0, "y": [20.0, 40.0], "tag": "b"});
        assert_eq!(
            a.lerp(&b, 0.25),
            Some(json!({"x": 25.0, "y": [12.5, 25.0], "tag": "a"}))
        );
        assert_eq!(a.lerp(&b, 0.75).and_then(|v| v.get("tag").cloned()), Some(json!("b")));
    }

    #[test]
    fn test_lerp_rejects_mismatched_shapes() {
        assert_eq!(json!([1, 2]).lerp(&json!([1, 2, 3]), 0.5), None);
        assert_eq!(json!({"a": 1}).lerp(&json!({"b": 1}), 0.5), None);
        assert_eq!(json!({"a": 1}).lerp(&json!([1]), 0.5), None);
    }
}
