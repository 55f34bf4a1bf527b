use serde::{Deserialize, Serialize};

/// Side to move; `None` marks empty cells and undecided games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Player {
    #[default]
    None,
    Player1,
    Player2,
}

impl Player {
    pub fn to_char(self) -> char {
        match self {
            Player::None => 'N',
            Player::Player1 => 'B',
            Player::Player2 => 'W',
        }
    }

    /// Inverse of [`Player::to_char`]; stone colours are case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(Player::None),
            'B' | 'b' => Some(Player::Player1),
            'W' | 'w' => Some(Player::Player2),
            _ => None,
        }
    }

    /// Who moves after `self` in a game of `num_player` players
    pub fn next_player(self, num_player: usize) -> Self {
        match num_player {
            1 => self,
            2 if self == Player::Player1 => Player::Player2,
            2 => Player::Player1,
            _ => Player::None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_roundtrip() {
        for player in [Player::None, Player::Player1, Player::Player2] {
            assert_eq!(Player::from_char(player.to_char()), Some(player));
        }
        assert_eq!(Player::from_char('w'), Some(Player::Player2));
        assert_eq!(Player::from_char('n'), None);
        assert_eq!(Player::from_char('?'), None);
    }

    #[test]
    fn test_next_player() {
        assert_eq!(Player::Player1.next_player(2), Player::Player2);
        assert_eq!(Player::Player2.next_player(2), Player::Player1);
        // anything that is not player 1 hands the move to player 1
        assert_eq!(Player::None.next_player(2), Player::Player1);
        assert_eq!(Player::Player2.next_player(1), Player::Player2);
        assert_eq!(Player::Player1.next_player(3), Player::None);
    }
}
