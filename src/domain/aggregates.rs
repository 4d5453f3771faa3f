use serde::Serialize;

use super::models::{Bracket, BracketType, Division, Match, Player, PlayerId};

/// An active match together with everything intake needs to judge a report
/// against it: both participants and the division's race length.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    pub record: Match,
    pub player1: Option<Player>,
    pub player2: Option<Player>,
    pub match_length: i32,
    pub bracket_type: BracketType,
}

impl MatchContext {
    pub fn participants(&self) -> impl Iterator<Item = &Player> {
        self.player1.iter().chain(self.player2.iter())
    }

    pub fn participant_name(&self, player_id: PlayerId) -> Option<&str> {
        self.participants()
            .find(|p| p.id == player_id)
            .map(|p| p.name.as_str())
    }
}

/// Who sent a score report, as resolved by the caller from the phone number
#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub phone: String,
    pub player: Option<Player>,
}

impl Sender {
    pub fn player_id(&self) -> Option<PlayerId> {
        self.player.as_ref().map(|p| p.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BracketView {
    pub bracket: Bracket,
    pub matches: Vec<Match>,
    pub winner_id: Option<PlayerId>,
}

/// Division with its brackets and their matches, for read-only consumers
#[derive(Debug, Clone, Serialize)]
pub struct DivisionOverview {
    pub division: Division,
    pub players: Vec<Player>,
    pub brackets: Vec<BracketView>,
}

impl DivisionOverview {
    pub fn player_name(&self, player_id: Option<PlayerId>) -> &str {
        player_id
            .and_then(|id| self.players.iter().find(|p| p.id == id))
            .map(|p| p.name.as_str())
            .unwrap_or("-")
    }
}
