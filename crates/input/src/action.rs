use serde::{Deserialize, Serialize};

/// A driving intent produced by the input layer.
///
/// Ordering is the order in which the motion core evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Accelerate,
    Decelerate,
    Jump,
    /// Raise the acceleration factor while held.
    BoostAcceleration,
    /// Lower the acceleration factor while held, down to its floor.
    ReduceAcceleration,
    /// End the session. Handled by the frame loop, not the motion core.
    Quit,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::Accelerate,
        Action::Decelerate,
        Action::Jump,
        Action::BoostAcceleration,
        Action::ReduceAcceleration,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::TurnLeft => "turn-left",
            Action::TurnRight => "turn-right",
            Action::Accelerate => "accelerate",
            Action::Decelerate => "decelerate",
            Action::Jump => "jump",
            Action::BoostAcceleration => "boost-acceleration",
            Action::ReduceAcceleration => "reduce-acceleration",
            Action::Quit => "quit",
        }
    }
}
