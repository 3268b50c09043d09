use std::collections::HashMap;

use crate::error::PuzzleError;
use crate::puzzle::StateKey;

/// Child key -> parent key, `None` for the start state.
pub type ParentMap = HashMap<StateKey, Option<StateKey>>;

/// Follows parent links back from `end` and returns the keys from the start
/// state to `end`, both inclusive.
///
/// Fails with [`PuzzleError::MissingKey`] if `end`, or any ancestor on its
/// chain, was never recorded.
pub fn reconstruct(parents: &ParentMap, end: &StateKey) -> Result<Vec<StateKey>, PuzzleError> {
    let mut path = Vec::new();
    let mut current = Some(end.clone());
    while let Some(key) = current {
        let parent = parents.get(&key).ok_or(PuzzleError::MissingKey)?;
        path.push(key);
        current = parent.clone();
        if path.len() > parents.len() {
            // a cycle in the links; cannot happen for maps built by one search
            return Err(PuzzleError::MissingKey);
        }
    }
    path.reverse();
    Ok(path)
}
