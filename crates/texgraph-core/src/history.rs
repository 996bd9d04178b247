//! Undo/redo history of item moves.

use crate::item::ItemRef;
use crate::scene::SceneItems;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of actions to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// History errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("action arrays differ in length: {items} items, {before} before, {after} after")]
    LengthMismatch {
        items: usize,
        before: usize,
        after: usize,
    },
    #[error("action does not move any item")]
    NoDisplacement,
    #[error("item {0:?} is no longer in the scene")]
    MissingItem(ItemRef),
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, ActionError>;

/// A committed move of one or more items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    items: Vec<ItemRef>,
    before: Vec<Point>,
    after: Vec<Point>,
}

impl Action {
    /// Build an action from index-aligned item/position lists.
    ///
    /// Fails if the lists differ in length or no item actually moved.
    pub fn new(items: Vec<ItemRef>, before: Vec<Point>, after: Vec<Point>) -> HistoryResult<Self> {
        if items.len() != before.len() || items.len() != after.len() {
            return Err(ActionError::LengthMismatch {
                items: items.len(),
                before: before.len(),
                after: after.len(),
            });
        }
        if before.iter().zip(&after).all(|(b, a)| b == a) {
            return Err(ActionError::NoDisplacement);
        }
        Ok(Self { items, before, after })
    }

    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }

    pub fn before(&self) -> &[Point] {
        &self.before
    }

    pub fn after(&self) -> &[Point] {
        &self.after
    }

    /// Put every item at its before (`forward == false`) or after position.
    ///
    /// All items are resolved first so a missing item leaves the scene
    /// untouched.
    fn apply(&self, scene: &mut SceneItems, forward: bool) -> HistoryResult<()> {
        if let Some(missing) = self.items.iter().find(|item| !scene.contains(**item)) {
            return Err(ActionError::MissingItem(*missing));
        }
        let targets = if forward { &self.after } else { &self.before };
        for (item, &position) in self.items.iter().zip(targets) {
            if let Some(target) = scene.item_mut(*item) {
                target.set_position(position);
            }
        }
        Ok(())
    }
}

/// Linear undo history.
#[derive(Debug, Clone)]
pub struct ActionLog {
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
    limit: usize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    /// Create an empty history with the default limit.
    pub fn new() -> Self {
        Self::with_limit(MAX_UNDO_HISTORY)
    }

    /// Create an empty history keeping at most `limit` actions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a completed action. Clears the redo history.
    pub fn push(&mut self, action: Action) {
        log::debug!("recording move of {} item(s)", action.items.len());
        self.undo_stack.push(action);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Revert the most recent action.
    /// Returns `Ok(false)` if there was nothing to undo.
    pub fn undo(&mut self, scene: &mut SceneItems) -> HistoryResult<bool> {
        let Some(action) = self.undo_stack.last() else {
            return Ok(false);
        };
        action.apply(scene, false)?;
        if let Some(action) = self.undo_stack.pop() {
            self.redo_stack.push(action);
        }
        Ok(true)
    }

    /// Re-apply the most recently undone action.
    /// Returns `Ok(false)` if there was nothing to redo.
    pub fn redo(&mut self, scene: &mut SceneItems) -> HistoryResult<bool> {
        let Some(action) = self.redo_stack.last() else {
            return Ok(false);
        };
        action.apply(scene, true)?;
        if let Some(action) = self.redo_stack.pop() {
            self.undo_stack.push(action);
        }
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable actions.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Most recent undoable action.
    pub fn last(&self) -> Option<&Action> {
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
