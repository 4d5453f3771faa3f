//! Human-readable replies handed to the notification channel.

pub fn approved(winner_name: &str, winner_score: i32, loser_score: i32) -> String {
    format!("{} wins {}-{}", winner_name, winner_score, loser_score)
}

pub fn rejected(reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.trim().is_empty() => {
            format!("Your score report was rejected: {}", reason.trim())
        }
        _ => "Your score report was rejected. Please see the tournament director.".to_string(),
    }
}

pub fn queued() -> String {
    "Score received. The tournament director will confirm it shortly.".to_string()
}

/// Re-entry prompt with an example result that fits the division's race
pub fn needs_clarification(player1_name: &str, player2_name: &str, race_to: i32) -> String {
    format!(
        "We couldn't read that score. Please reply like: {} {} {} {}",
        first_word(player1_name),
        race_to,
        first_word(player2_name),
        race_to / 2
    )
}

pub fn no_active_match() -> String {
    "No active match found for your number.".to_string()
}

pub fn already_recorded() -> String {
    "That match was already recorded.".to_string()
}

fn first_word(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        assert_eq!(approved("John", 9, 4), "John wins 9-4");
        assert_eq!(rejected(Some(" wrong table ")), "Your score report was rejected: wrong table");
        assert!(rejected(None).starts_with("Your score report was rejected."));
        assert_eq!(
            needs_clarification("John Smith", "Sarah Lee", 9),
            "We couldn't read that score. Please reply like: John 9 Sarah 4"
        );
        assert_eq!(
            needs_clarification("John Smith", "Sarah Lee", 5),
            "We couldn't read that score. Please reply like: John 5 Sarah 2"
        );
    }
}
