use crate::{Action, InputError, InputSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Physical keys the demo can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    Escape,
}

impl Key {
    const NAMES: [(Key, &'static str); 14] = [
        (Key::W, "W"),
        (Key::A, "A"),
        (Key::S, "S"),
        (Key::D, "D"),
        (Key::Up, "Up"),
        (Key::Down, "Down"),
        (Key::Left, "Left"),
        (Key::Right, "Right"),
        (Key::Space, "Space"),
        (Key::LeftShift, "LeftShift"),
        (Key::RightShift, "RightShift"),
        (Key::LeftControl, "LeftControl"),
        (Key::RightControl, "RightControl"),
        (Key::Escape, "Escape"),
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(k, _)| *k == self)
            .map(|(_, n)| *n)
            .unwrap_or("?")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = InputError;

    /// Case-insensitive lookup by key name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(s.trim()))
            .map(|(k, _)| *k)
            .ok_or_else(|| InputError::UnknownKey(s.to_string()))
    }
}

/// Key -> action table.
///
/// Several keys may map to the same action. Unbound keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<Key, Action>,
}

impl Default for KeyBindings {
    /// WASD driving, Space to jump, Shift/Ctrl to tune acceleration, Escape to quit.
    fn default() -> Self {
        let map = BTreeMap::from([
            (Key::A, Action::TurnLeft),
            (Key::D, Action::TurnRight),
            (Key::W, Action::Accelerate),
            (Key::S, Action::Decelerate),
            (Key::Space, Action::Jump),
            (Key::LeftShift, Action::BoostAcceleration),
            (Key::LeftControl, Action::ReduceAcceleration),
            (Key::Escape, Action::Quit),
        ]);
        Self { map }
    }
}

impl KeyBindings {
    /// A table with no bindings.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Bind `key` to `action`, returning the action it was previously bound to.
    pub fn bind(&mut self, key: Key, action: Action) -> Option<Action> {
        self.map.insert(key, action)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Action> {
        self.map.remove(&key)
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.map.get(&key).copied()
    }

    /// All keys bound to `action`, in key order.
    pub fn keys_for(&self, action: Action) -> Vec<Key> {
        self.map
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Action)> + '_ {
        self.map.iter().map(|(k, a)| (*k, *a))
    }

    /// Translate the set of currently held keys into a frame snapshot.
    pub fn snapshot<I>(&self, held: I) -> InputSnapshot
    where
        I: IntoIterator<Item = Key>,
    {
        held.into_iter()
            .filter_map(|k| self.action_for(k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_action() {
        let b = KeyBindings::default();
        for a in Action::ALL {
            assert!(!b.keys_for(a).is_empty(), "{a:?} has no key");
        }
    }

    #[test]
    fn key_names_parse_case_insensitively() {
        assert_eq!("space".parse::<Key>().unwrap(), Key::Space);
        assert_eq!("LeftShift".parse::<Key>().unwrap(), Key::LeftShift);
        assert_eq!(" w ".parse::<Key>().unwrap(), Key::W);
        assert!(matches!(
            "F13".parse::<Key>(),
            Err(InputError::UnknownKey(_))
        ));
    }

    #[test]
    fn names_round_trip_through_display() {
        for (k, _) in Key::NAMES {
            assert_eq!(k.to_string().parse::<Key>().unwrap(), k);
        }
    }

    #[test]
    fn snapshot_ignores_unbound_keys() {
        let b = KeyBindings::default();
        let s = b.snapshot([Key::W, Key::A, Key::Up]);
        assert!(s.is_held(Action::Accelerate));
        assert!(s.is_held(Action::TurnLeft));
        assert_eq!(s.iter().count(), 2);
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut b = KeyBindings::default();
        assert_eq!(b.bind(Key::W, Action::Jump), Some(Action::Accelerate));
        b.bind(Key::Up, Action::Accelerate);
        assert_eq!(b.keys_for(Action::Accelerate), vec![Key::Up]);
        assert_eq!(b.keys_for(Action::Jump), vec![Key::W, Key::Space]);
    }

    #[test]
    fn bindings_load_from_yaml() {
        let yaml = "Up: Accelerate\nDown: Decelerate\nEscape: Quit\n";
        let b: KeyBindings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(b.action_for(Key::Up), Some(Action::Accelerate));
        assert_eq!(b.action_for(Key::W), None);
        assert_eq!(b.iter().count(), 3);
    }
}
