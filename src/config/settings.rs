#[derive(Debug, Clone)]
pub struct BracketSettings {
    /// First table number handed out when a round is generated
    pub starting_table: u32,
    /// Generate the next round as soon as the last result of a round lands
    pub auto_advance: bool,
    pub consolation_enabled: bool,
}

impl Default for BracketSettings {
    fn default() -> Self {
        Self {
            starting_table: 1,
            auto_advance: true,
            consolation_enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub high_trust: u8,
    pub medium_trust: u8,
    pub low_trust: u8,
    /// Ceiling applied when the score fails the division's race rule
    pub invalid_score_cap: u8,
    pub auto_apply_threshold: u8,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            high_trust: 90,
            medium_trust: 60,
            low_trust: 30,
            invalid_score_cap: 40,
            auto_apply_threshold: 90,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "tournament_desk.db".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bracket: BracketSettings,
    pub reports: ReportSettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            bracket: BracketSettings::default(),
            reports: ReportSettings::default(),
            database: DatabaseSettings::default(),
        }
    }
}
