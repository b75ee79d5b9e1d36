//! Candidate generation: copy a state, mutate it nondeterministically.
//!
//! Each helper clones the base state once per branch, hands the draft to the
//! mutation together with an [`Amb`] context, and collects every draft that
//! survives. The base state is never touched. Output order is the evaluator's
//! depth-first, left-to-right order.

use crate::amb::{self, Amb, Signal};
use crate::error::ProduceError;
use crate::state::FieldPath;
use serde_json::Value;

/// Every state reachable by applying `mutate` to a copy of `base`.
pub fn produce_amb<S, F>(base: &S, mut mutate: F) -> Vec<S>
where
    S: Clone,
    F: FnMut(&mut S, &mut Amb) -> Result<(), Signal>,
{
    amb::collect(|amb| {
        let mut draft = base.clone();
        mutate(&mut draft, amb)?;
        Ok(draft)
    })
}

/// Fallible [`produce_amb`]. The first genuine error aborts generation.
pub fn try_produce_amb<S, E, F>(base: &S, mut mutate: F) -> Result<Vec<S>, E>
where
    S: Clone,
    F: FnMut(&mut S, &mut Amb<E>) -> Result<(), Signal<E>>,
{
    amb::try_collect(|amb| {
        let mut draft = base.clone();
        mutate(&mut draft, amb)?;
        Ok(draft)
    })
}

/// [`produce_amb`], keeping only the first occurrence of equal states.
pub fn produce_amb_distinct<S, F>(base: &S, mutate: F) -> Vec<S>
where
    S: Clone + PartialEq,
    F: FnMut(&mut S, &mut Amb) -> Result<(), Signal>,
{
    let mut distinct: Vec<S> = Vec::new();
    for state in produce_amb(base, mutate) {
        if !distinct.contains(&state) {
            distinct.push(state);
        }
    }
    distinct
}

/// Remove any one element.
pub fn remove_any<T, E>(amb: &mut Amb<E>, items: &mut Vec<T>) -> Result<T, Signal<E>> {
    let index = amb.choose_index(items.len())?;
    Ok(items.remove(index))
}

/// Insert `item` at any of the `len + 1` positions. Returns the position.
pub fn insert_any<T, E>(amb: &mut Amb<E>, items: &mut Vec<T>, item: T) -> Result<usize, Signal<E>> {
    let index = amb.choose_index(items.len() + 1)?;
    items.insert(index, item);
    Ok(index)
}

/// Move any element to any other position. The identity move is pruned.
///
/// Returns `(from, to)` where `to` is the element's final index.
pub fn move_any<T, E>(amb: &mut Amb<E>, items: &mut Vec<T>) -> Result<(usize, usize), Signal<E>> {
    let from = amb.choose_index(items.len())?;
    let to = amb.choose_index(items.len())?;
    amb.filter(from != to)?;
    let item = items.remove(from);
    items.insert(to, item);
    Ok((from, to))
}

/// Swap any unordered pair of elements.
pub fn swap_any<T, E>(amb: &mut Amb<E>, items: &mut [T]) -> Result<(usize, usize), Signal<E>> {
    let i = amb.choose_index(items.len())?;
    let j = amb.choose_range(i + 1..items.len())?;
    items.swap(i, j);
    Ok((i, j))
}

/// The array at `path` inside a JSON draft.
pub fn json_array_mut<'a, E>(
    draft: &'a mut Value,
    path: &FieldPath,
) -> Result<&'a mut Vec<Value>, Signal<E>>
where
    E: From<ProduceError>,
{
    match path.lookup_mut(draft) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(Signal::Error(ProduceError::MissingArray(path.clone()).into())),
    }
}
