//! Interactive console for exploring and exporting relational data.
//!
//! Reads commands from standard input, one per line, and runs them against
//! a single database connection. Type `help` at the prompt for the command
//! list.
//!
//! # Credential Handling
//! - Passwords typed at the prompt are not echoed and never logged
//! - Connection URLs are redacted in logs
//! - The history file stores URLs only

use anyhow::Context;
use clap::Parser;
use dbconn_core::{
    ConsoleConfig, Exit,
    adapters::{DriverConnector, compiled_drivers},
    console::{Console, LineSource, input::trim_line_ending},
    logging::init_logging,
    session::{ConnectionHistory, ConnectionManager, DEFAULT_HISTORY_FILE},
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dbconn")]
#[command(about = "Interactive console for exploring and exporting relational data")]
#[command(version)]
#[command(long_about = "
DBConn - interactive relational data console

Connect to a database, browse its schemas, tables and columns, count rows,
and export table data to CSV or the schema to XML.

EXAMPLES:
  dbconn
  -> connect postgres://localhost:5432/app alice
  -> describe table orders
  -> export data orders \"where status = 'open'\"
")]
struct Cli {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    quiet: bool,

    /// Connection history file
    #[arg(
        long,
        env = "DBCONN_HISTORY",
        default_value = DEFAULT_HISTORY_FILE,
        help = "File holding previously used connection URLs"
    )]
    history_file: PathBuf,

    /// List supported databases and exit
    #[arg(long, help = "List the compiled-in database drivers and exit")]
    list_dbs: bool,
}

/// Standard input, with hidden password entry on a terminal.
struct StdinSource {
    interactive: bool,
}

impl StdinSource {
    fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }
}

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(trim_line_ending(line))),
        }
    }

    fn read_password(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.interactive {
            rpassword::prompt_password(prompt).map(Some)
        } else {
            self.read_line(prompt)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_dbs {
        list_supported_databases();
        return Ok(());
    }

    let log_level = init_logging(cli.verbose, cli.quiet)?;

    let config = ConsoleConfig::default().with_history_file(&cli.history_file);
    let history = ConnectionHistory::load(&config.history_file)
        .await
        .with_context(|| format!("Failed to load {}", config.history_file.display()))?;
    tracing::debug!(
        "Loaded {} history entries from {}",
        history.len(),
        config.history_file.display()
    );

    let session = ConnectionManager::new(Box::new(DriverConnector::default()), history);
    let mut console = Console::new(session, config, StdinSource::new(), io::stdout(), log_level);

    match console.run().await? {
        Exit::Quit => std::process::exit(0),
        Exit::EndOfInput => {
            let (mut session, _) = console.into_parts();
            session.close().await;
            Ok(())
        }
    }
}

/// Lists the compiled-in drivers and their URL schemes
fn list_supported_databases() {
    println!("Supported Database Types:");
    println!();

    for database_type in compiled_drivers() {
        println!("{}:", database_type);
        println!("  URL schemes: {}", database_type.url_schemes().join(", "));
        println!();
    }

    println!("JDBC-style URLs (jdbc:postgresql://...) are accepted as well.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["dbconn"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.list_dbs);
    }

    #[test]
    fn test_cli_flags() {
        let cli =
            Cli::try_parse_from(["dbconn", "-vv", "--history-file", "/tmp/h.txt", "--list-dbs"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.history_file, PathBuf::from("/tmp/h.txt"));
        assert!(cli.list_dbs);
    }
}
