//! Player actions translated to commands for the player's aircraft

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::command::{Action, AircraftAction, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
    LaunchMissile,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 6] = [
        PlayerAction::MoveLeft,
        PlayerAction::MoveRight,
        PlayerAction::MoveUp,
        PlayerAction::MoveDown,
        PlayerAction::Fire,
        PlayerAction::LaunchMissile,
    ];

    pub fn command(self) -> Command {
        let action = match self {
            PlayerAction::MoveLeft => AircraftAction::Accelerate(Vec2::new(-1.0, 0.0)),
            PlayerAction::MoveRight => AircraftAction::Accelerate(Vec2::new(1.0, 0.0)),
            PlayerAction::MoveUp => AircraftAction::Accelerate(Vec2::new(0.0, -1.0)),
            PlayerAction::MoveDown => AircraftAction::Accelerate(Vec2::new(0.0, 1.0)),
            PlayerAction::Fire => AircraftAction::Fire,
            PlayerAction::LaunchMissile => AircraftAction::LaunchMissile,
        };
        Command::new(Category::PLAYER_AIRCRAFT, Action::Aircraft(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_target_player() {
        for action in PlayerAction::ALL {
            assert_eq!(action.command().category, Category::PLAYER_AIRCRAFT);
        }
    }
}
