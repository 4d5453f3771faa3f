pub mod api;
pub mod bracket;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod scoring;
pub mod services;
pub mod workflow;

use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::database::DbPool;
use crate::services::draw::DrawService;
use crate::services::import::ImportService;
use crate::services::overview;
use crate::services::progression::{ProgressionService, log_outcome};
use crate::services::reports::ReportService;
use crate::services::server::ServerService;
use crate::workflow::LogNotifier;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_store(config: &AppConfig) -> Result<DbPool> {
    let pool = database::create_pool(&config.database.path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&conn)?;
    Ok(pool)
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_reset() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database.path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)
}

pub fn handle_import(path: &Path) -> Result<()> {
    let config = AppConfig::new();
    let service = ImportService::new(open_store(&config)?);
    let summary = service.import_file(path)?;
    println!(
        "Imported {} players, {} divisions, {} entries",
        summary.players, summary.divisions, summary.entries
    );
    Ok(())
}

pub fn handle_draw(division_id: i64, seed: Option<u64>) -> Result<()> {
    let config = AppConfig::new();
    let service = DrawService::new(open_store(&config)?, config.bracket.clone());
    let outcome = service.draw_division(division_id, seed)?;
    println!(
        "Bracket {} drawn with seed {}: {} round-1 matches",
        outcome.bracket.id,
        outcome.bracket.seed.unwrap_or_default(),
        outcome.matches.len()
    );
    Ok(())
}

pub fn handle_advance(bracket_id: i64, from_round: Option<u32>) -> Result<()> {
    let config = AppConfig::new();
    let service = ProgressionService::new(open_store(&config)?, config.bracket.clone());
    let outcome = service.advance_round(bracket_id, from_round)?;
    log_outcome(&outcome);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub fn handle_show(division_id: i64) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_store(&config)?;
    let division = overview::load_overview(&pool, division_id)?;
    print!("{}", overview::render(&division));
    Ok(())
}

pub fn handle_pending() -> Result<()> {
    let config = AppConfig::new();
    let service = ReportService::new(open_store(&config)?, &config, std::sync::Arc::new(LogNotifier))?;
    let open = service.open_reports()?;

    if open.is_empty() {
        println!("{}", "No reports waiting".dimmed());
    }
    for report in open {
        let scores = match (report.player1_score, report.player2_score) {
            (Some(a), Some(b)) => format!("{}-{}", a, b),
            _ => "?".to_string(),
        };
        println!(
            "#{:<4} match {:<4} {:>3}% {:<6} {:<20} \"{}\" {}",
            report.id,
            report.match_id,
            report.confidence_score,
            scores,
            report.status.as_str().yellow(),
            report.raw_text,
            report.notes.unwrap_or_default().red()
        );
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
