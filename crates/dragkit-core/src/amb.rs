//! Nondeterministic evaluation ("amb").
//!
//! A computation receives an [`Amb`] context and calls [`Amb::choose`] wherever
//! it wants to consider several options. The driver re-runs the computation once
//! per reachable combination of choices: choices already decided on the current
//! branch are replayed in order, and the first undecided choice makes the run
//! stop with [`Signal::Branch`] so the driver can fan out one branch per option.
//!
//! Results come out depth-first, left-to-right: the first choice site behaves
//! like the outermost loop of a nest of `for` loops.
//!
//! The computation must be deterministic given its choices. Side effects that
//! change which choice sites are reached (or their option counts) independent of
//! the replayed path desynchronize replay from the real run.

use std::convert::Infallible;
use std::marker::PhantomData;
use std::ops::Range;

/// Control signal threaded back out of a computation run under the driver.
///
/// `Branch` and `Prune` are consumed by the driver. `Error` carries a genuine
/// failure of the computation and is handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<E = Infallible> {
    /// A choice point past the end of the replayed path, with its option count.
    Branch(usize),
    /// The current branch was abandoned and contributes no result.
    Prune,
    /// A failure unrelated to choice.
    Error(E),
}

/// Replay context for one run of a computation.
///
/// A fresh context is built for every branch; it holds the choices decided so
/// far and a cursor into them.
#[derive(Debug)]
pub struct Amb<E = Infallible> {
    path: Vec<usize>,
    cursor: usize,
    _error: PhantomData<fn() -> E>,
}

impl<E> Amb<E> {
    fn replaying(path: Vec<usize>) -> Self {
        Self {
            path,
            cursor: 0,
            _error: PhantomData,
        }
    }

    /// Choose an index in `0..count`.
    pub fn choose_index(&mut self, count: usize) -> Result<usize, Signal<E>> {
        let Some(&index) = self.path.get(self.cursor) else {
            return Err(Signal::Branch(count));
        };
        self.cursor += 1;
        if index >= count {
            // Replayed choice no longer fits: the computation is not deterministic.
            log::warn!(
                "amb: replayed choice {} out of range for {} options at depth {}",
                index,
                count,
                self.cursor - 1
            );
            return Err(Signal::Prune);
        }
        Ok(index)
    }

    /// Choose one of `options`. Returns a clone of the chosen element.
    pub fn choose<T: Clone>(&mut self, options: &[T]) -> Result<T, Signal<E>> {
        let index = self.choose_index(options.len())?;
        Ok(options[index].clone())
    }

    /// Choose a value from a half-open range.
    pub fn choose_range(&mut self, range: Range<usize>) -> Result<usize, Signal<E>> {
        let offset = self.choose_index(range.len())?;
        Ok(range.start + offset)
    }

    /// Abandon the current branch.
    pub fn prune<T>(&mut self) -> Result<T, Signal<E>> {
        Err(Signal::Prune)
    }

    /// Abandon the current branch unless `condition` holds.
    pub fn filter(&mut self, condition: bool) -> Result<(), Signal<E>> {
        if condition { Ok(()) } else { self.prune() }
    }

    /// Number of choices made so far on this branch.
    pub fn depth(&self) -> usize {
        self.cursor
    }

    fn into_path(mut self) -> Vec<usize> {
        self.path.truncate(self.cursor);
        self.path
    }
}

/// Lazy enumeration of every branch of a computation.
///
/// Yields `Ok` per completed branch. After the first `Err` the iterator is
/// exhausted and unexplored branches are dropped.
pub struct Enumerate<R, E, F> {
    computation: F,
    pending: Vec<Vec<usize>>,
    failed: bool,
    _marker: PhantomData<fn() -> (R, E)>,
}

impl<R, E, F> Iterator for Enumerate<R, E, F>
where
    F: FnMut(&mut Amb<E>) -> Result<R, Signal<E>>,
{
    type Item = Result<R, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some(path) = self.pending.pop() {
            let mut amb = Amb::replaying(path);
            match (self.computation)(&mut amb) {
                Ok(value) => return Some(Ok(value)),
                Err(Signal::Branch(count)) => {
                    let prefix = amb.into_path();
                    // Reverse push so option 0 is popped first.
                    for index in (0..count).rev() {
                        let mut next = Vec::with_capacity(prefix.len() + 1);
                        next.extend_from_slice(&prefix);
                        next.push(index);
                        self.pending.push(next);
                    }
                }
                Err(Signal::Prune) => {}
                Err(Signal::Error(err)) => {
                    self.failed = true;
                    self.pending.clear();
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

impl<R, E, F> std::iter::FusedIterator for Enumerate<R, E, F> where
    F: FnMut(&mut Amb<E>) -> Result<R, Signal<E>>
{
}

/// Lazily enumerate a fallible computation.
pub fn try_enumerate<R, E, F>(computation: F) -> Enumerate<R, E, F>
where
    F: FnMut(&mut Amb<E>) -> Result<R, Signal<E>>,
{
    Enumerate {
        computation,
        pending: vec![Vec::new()],
        failed: false,
        _marker: PhantomData,
    }
}

/// Lazily enumerate a computation that cannot fail.
pub fn enumerate<R, F>(computation: F) -> impl Iterator<Item = R>
where
    F: FnMut(&mut Amb) -> Result<R, Signal>,
{
    try_enumerate(computation).map(|result| match result {
        Ok(value) => value,
        Err(never) => match never {},
    })
}

/// Eagerly collect every branch of a fallible computation.
///
/// Stops at the first genuine error and returns it.
pub fn try_collect<R, E, F>(computation: F) -> Result<Vec<R>, E>
where
    F: FnMut(&mut Amb<E>) -> Result<R, Signal<E>>,
{
    try_enumerate(computation).collect()
}

/// Eagerly collect every branch of a computation that cannot fail.
pub fn collect<R, F>(computation: F) -> Vec<R>
where
    F: FnMut(&mut Amb) -> Result<R, Signal>,
{
    enumerate(computation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_choice_returns_options_in_order() {
        let options = vec!["a", "b", "c", "d"];
        let result = collect(|amb| amb.choose(&options));
        assert_eq!(result, options);
    }

    #[test]
    fn test_empty_options_yield_nothing() {
        let result = collect(|amb| amb.choose::<i32>(&[]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_choices_yields_single_result() {
        let result = collect(|_amb| Ok(42));
        assert_eq!(result, vec![42]);
    }

    #[test]
    fn test_two_choices_are_row_major() {
        let result = collect(|amb| {
            let a = amb.choose(&[1, 2, 3])?;
            let b = amb.choose(&['x', 'y'])?;
            Ok((a, b))
        });
        assert_eq!(
            result,
            vec![(1, 'x'), (1, 'y'), (2, 'x'), (2, 'y'), (3, 'x'), (3, 'y')]
        );
    }

    #[test]
    fn test_prune_removes_only_invoking_branches() {
        let result = collect(|amb| {
            let x = amb.choose(&[1, 2, 3, 4, 5])?;
            if x % 2 == 0 {
                return amb.prune();
            }
            Ok(x)
        });
        assert_eq!(result, vec![1, 3, 5]);
    }

    #[test]
    fn test_filter_matches_prune() {
        let options = [1, 2, 3, 4, 5];
        let result = collect(|amb| {
            let x = amb.choose(&options)?;
            let y = amb.choose(&options)?;
            amb.filter(x + y == 7)?;
            Ok([x, y])
        });
        assert_eq!(result, vec![[2, 5], [3, 4], [4, 3], [5, 2]]);
    }

    #[test]
    fn test_dependent_option_lists() {
        // Second choice depends on the first: all pairs i < j.
        let result = collect(|amb| {
            let i = amb.choose_range(0..4)?;
            let j = amb.choose_range(i + 1..4)?;
            Ok((i, j))
        });
        assert_eq!(result, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_recursive_choices() {
        // All bit strings of length 3, in lexicographic order.
        fn bits(amb: &mut Amb, n: usize) -> Result<String, Signal> {
            if n == 0 {
                return Ok(String::new());
            }
            let head = amb.choose(&['0', '1'])?;
            let tail = bits(amb, n - 1)?;
            Ok(format!("{head}{tail}"))
        }
        let result = collect(|amb| bits(amb, 3));
        assert_eq!(
            result,
            vec!["000", "001", "010", "011", "100", "101", "110", "111"]
        );
    }

    #[test]
    fn test_error_propagates_and_aborts() {
        let mut runs = 0;
        let result: Result<Vec<i32>, String> = try_collect(|amb| {
            runs += 1;
            let x = amb.choose(&[1, 2, 3, 4])?;
            if x == 2 {
                return Err(Signal::Error(format!("bad {x}")));
            }
            Ok(x)
        });
        assert_eq!(result, Err("bad 2".to_string()));
        // Root run, then branches 1 and 2. Branches 3 and 4 never run.
        assert_eq!(runs, 3);
    }

    #[test]
    fn test_enumerate_is_lazy() {
        let mut runs = 0;
        let first: Vec<i32> = enumerate(|amb| {
            runs += 1;
            amb.choose(&[10, 20, 30])
        })
        .take(1)
        .collect();
        assert_eq!(first, vec![10]);
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_enumerate_is_restartable() {
        let computation = |amb: &mut Amb| amb.choose(&[1, 2]);
        let a: Vec<i32> = enumerate(computation).collect();
        let b: Vec<i32> = enumerate(computation).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_try_enumerate_fuses_after_error() {
        let mut iter = try_enumerate(|amb: &mut Amb<String>| {
            let x = amb.choose(&[1, 2, 3])?;
            if x == 1 {
                return Err(Signal::Error("boom".to_string()));
            }
            Ok(x)
        });
        assert_eq!(iter.next(), Some(Err("boom".to_string())));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_depth_counts_choices() {
        let depths = collect(|amb| {
            let _ = amb.choose(&[(), ()])?;
            let _ = amb.choose(&[()])?;
            Ok(amb.depth())
        });
        assert_eq!(depths, vec![2, 2]);
    }

    #[test]
    fn test_nondeterministic_computation_is_pruned() {
        let mut flip = false;
        let result = collect(|amb| {
            // Option count changes between runs.
            flip = !flip;
            let options: &[i32] = if flip { &[1, 2, 3] } else { &[7] };
            amb.choose(options)
        });
        // Root run branches 3 ways. Replays alternate between the two option
        // lists, and the third replay's index no longer fits.
        assert_eq!(result, vec![7, 2]);
    }

    proptest! {
        #[test]
        fn prop_choose_yields_options_in_order(options in prop::collection::vec(any::<i64>(), 0..16)) {
            let result = collect(|amb| amb.choose(&options));
            prop_assert_eq!(result, options);
        }

        #[test]
        fn prop_two_choices_are_row_major(
            a in prop::collection::vec(any::<u16>(), 0..8),
            b in prop::collection::vec(any::<u16>(), 0..8),
        ) {
            let result = collect(|amb| {
                let x = amb.choose(&a)?;
                let y = amb.choose(&b)?;
                Ok((x, y))
            });
            let expected: Vec<(u16, u16)> = a
                .iter()
                .flat_map(|&x| b.iter().map(move |&y| (x, y)))
                .collect();
            prop_assert_eq!(result.len(), a.len() * b.len());
            prop_assert_eq!(result, expected);
        }

        #[test]
        fn prop_prune_drops_exactly_pruned_branches(
            options in prop::collection::vec(any::<i32>(), 0..16),
            modulus in 1i32..5,
        ) {
            let keep = |x: i32| x.rem_euclid(modulus) == 0;
            let result = collect(|amb| {
                let x = amb.choose(&options)?;
                if !keep(x) {
                    return amb.prune();
                }
                Ok(x)
            });
            let expected: Vec<i32> = options.iter().copied().filter(|&x| keep(x)).collect();
            prop_assert_eq!(result, expected);
        }
    }
}
