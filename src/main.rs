use anyhow::Result;

use tournament_desk::cli::Command;
use tournament_desk::{
    handle_advance, handle_completions, handle_draw, handle_import, handle_pending, handle_reset, handle_serve,
    handle_show, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Reset => handle_reset(),
        Command::Import { path } => handle_import(path),
        Command::Draw { division_id, seed } => handle_draw(*division_id, *seed),
        Command::Advance { bracket_id, from_round } => handle_advance(*bracket_id, *from_round),
        Command::Show { division_id } => handle_show(*division_id),
        Command::Pending => handle_pending(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
