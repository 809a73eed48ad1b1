use crate::Action;
use std::collections::BTreeSet;

/// The set of actions held during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: BTreeSet<Action>,
}

impl InputSnapshot {
    /// A snapshot with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: return a copy with `action` held.
    pub fn with(mut self, action: Action) -> Self {
        self.held.insert(action);
        self
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Held actions in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.held.iter().copied()
    }
}

impl FromIterator<Action> for InputSnapshot {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}
