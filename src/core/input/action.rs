//=========================================================================
// Input Actions
//=========================================================================
//
// The closed set of logical actions every scene reads.
//
// Physical keys and buttons never reach scenes directly; adapters report
// physical edges, the action mapper folds them onto these actions.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== InputAction =========================================================

/// Logical input action.
///
/// The appliance has at most four physical buttons, so scenes are
/// written against these eight actions and tolerate any subset of them
/// being unbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputAction {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    /// Previous item (bracket / `Q` / GPIO "prev" button).
    Prev,
    /// Next item (bracket / `E` / GPIO "next" button).
    Next,
}

impl InputAction {
    /// Every action, in declaration order.
    pub const ALL: [InputAction; 8] = [
        InputAction::Up,
        InputAction::Down,
        InputAction::Left,
        InputAction::Right,
        InputAction::Enter,
        InputAction::Escape,
        InputAction::Prev,
        InputAction::Next,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Enter => "ENTER",
            Self::Escape => "ESCAPE",
            Self::Prev => "PREV",
            Self::Next => "NEXT",
        }
    }
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_lists_each_action_once() {
        let unique: HashSet<_> = InputAction::ALL.iter().collect();
        assert_eq!(unique.len(), InputAction::ALL.len());
    }

    #[test]
    fn display_uses_upper_case_name() {
        assert_eq!(InputAction::Escape.to_string(), "ESCAPE");
        assert_eq!(format!("{}", InputAction::Next), "NEXT");
    }
}
