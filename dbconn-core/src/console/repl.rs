//! Read-eval-print loop and command handlers.
//!
//! The console reads one line at a time, resolves it through the
//! [`CommandRegistry`] and runs the matching handler to completion before
//! reading the next line. Handlers report every failure as a printed line;
//! only `quit` and end of input stop the loop.

use super::input::LineSource;
use super::parser::{Phrase, tokenize};
use super::registry::{CommandKind, CommandRegistry};
use super::timespan::{format_count, format_elapsed};
use crate::adapters::redact_database_url;
use crate::config::ConsoleConfig;
use crate::error::DbConnError;
use crate::export::{export_schema, export_table_data};
use crate::logging::LogLevelHandle;
use crate::metadata::NO_VALUE;
use crate::session::ConnectionManager;
use comfy_table::Table;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use zeroize::Zeroizing;

/// Prompt shown before each command line.
pub const PROMPT: &str = "-> ";

const NO_CONNECTION: &str = "No database connection found";
const NO_HISTORY: &str = "No connection history found";

/// Whether the loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Why [`Console::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user typed `quit`; the connection is already closed
    Quit,
    /// The input source ran dry
    EndOfInput,
}

/// Interactive console bound to one session.
pub struct Console<I: LineSource, W: Write> {
    session: ConnectionManager,
    config: ConsoleConfig,
    input: I,
    out: W,
    log_level: LogLevelHandle,
    registry: CommandRegistry,
}

impl<I: LineSource, W: Write> Console<I, W> {
    /// Creates a console with the standard command set.
    pub fn new(
        session: ConnectionManager,
        config: ConsoleConfig,
        input: I,
        out: W,
        log_level: LogLevelHandle,
    ) -> Self {
        Self {
            session,
            config,
            input,
            out,
            log_level,
            registry: CommandRegistry::default(),
        }
    }

    /// Runs until `quit` or end of input.
    ///
    /// # Errors
    /// Returns error if reading from the input source fails
    pub async fn run(&mut self) -> crate::Result<Exit> {
        loop {
            let line = self
                .input
                .read_line(PROMPT)
                .map_err(|e| DbConnError::io("Failed to read command", e))?;

            let Some(line) = line else {
                tracing::debug!("End of input");
                return Ok(Exit::EndOfInput);
            };

            if self.execute_line(&line).await == Flow::Quit {
                return Ok(Exit::Quit);
            }
        }
    }

    /// Executes one command line.
    ///
    /// A failure to write console output is logged and never stops the loop.
    pub async fn execute_line(&mut self, line: &str) -> Flow {
        let flow = match self.dispatch(line).await {
            Ok(flow) => flow,
            Err(e) => {
                tracing::warn!("Failed to write console output: {}", e);
                Flow::Continue
            }
        };

        if let Err(e) = self.out.flush() {
            tracing::warn!("Failed to flush console output: {}", e);
        }
        flow
    }

    pub fn session(&self) -> &ConnectionManager {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes the console, returning the session and output.
    pub fn into_parts(self) -> (ConnectionManager, W) {
        (self.session, self.out)
    }

    async fn dispatch(&mut self, line: &str) -> io::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        let phrases = tokenize(line);
        let texts: Vec<String> = phrases.iter().map(|phrase| phrase.text.clone()).collect();

        let Some(kind) = self.registry.resolve(&texts) else {
            if !line.trim_start().starts_with('-') {
                writeln!(self.out, "Unknown command")?;
            }
            return Ok(Flow::Continue);
        };

        tracing::trace!("Resolved {:?} from {} phrases", kind, texts.len());

        match kind {
            CommandKind::Quit => return Ok(self.quit().await),
            CommandKind::Time => {
                let nested = trailing_text(line, &phrases, 1).unwrap_or_default();
                let start = Instant::now();
                let flow = Box::pin(self.dispatch(&nested)).await?;
                if flow == Flow::Quit {
                    return Ok(flow);
                }
                writeln!(self.out, "Elapsed Time: {}", format_elapsed(start.elapsed()))?;
            }
            CommandKind::Help => self.help(texts.get(1).map(String::as_str))?,
            CommandKind::Debug => self.print_debug()?,
            CommandKind::DebugOn => self.set_debug(true)?,
            CommandKind::DebugOff => self.set_debug(false)?,
            CommandKind::Connect => self.connect_command(&texts).await?,
            CommandKind::CloseDatabase => self.session.close().await,
            CommandKind::CheckDatabase => {
                let valid = self.session.is_valid(Some(self.config.probe_timeout)).await;
                writeln!(self.out, "Database valid? {}", valid)?;
            }
            CommandKind::ListTables => self.list_tables().await?,
            CommandKind::ListSchemas => self.list_schemas().await?,
            CommandKind::SelectSchema => self.select_schema(&texts[2]).await?,
            CommandKind::SelectConnection => self.select_connection().await?,
            CommandKind::DescribeTable => self.describe_table(&texts[2]).await?,
            CommandKind::CountTables => self.count_tables().await?,
            CommandKind::CountRows => self.count_rows(&texts[2]).await?,
            CommandKind::ExportData => {
                let clause = trailing_text(line, &phrases, 3);
                self.export_data(&texts[2], clause.as_deref()).await?;
            }
            CommandKind::ExportSchema => self.export_schema(&texts[2]).await?,
            CommandKind::Connections => self.print_history()?,
            CommandKind::Now => {
                let now = chrono::Local::now().format("%m/%d/%Y %H:%M:%S");
                writeln!(self.out, "Current date/time: {}", now)?;
            }
            CommandKind::DbInfo => self.print_db_info().await?,
            CommandKind::Version => {
                writeln!(self.out, "DBConn v{}", env!("CARGO_PKG_VERSION"))?;
            }
        }

        Ok(Flow::Continue)
    }

    async fn quit(&mut self) -> Flow {
        self.session.close().await;
        if let Err(e) = writeln!(self.out, "Shutting down") {
            tracing::warn!("Failed to write console output: {}", e);
        }
        Flow::Quit
    }

    fn help(&mut self, prefix: Option<&str>) -> io::Result<()> {
        let usages = self.registry.usages(prefix);
        if usages.is_empty() {
            return writeln!(self.out, "No matching commands found");
        }
        for usage in usages {
            writeln!(self.out, "{}", usage)?;
        }
        Ok(())
    }

    fn print_debug(&mut self) -> io::Result<()> {
        let state = if self.log_level.is_debug() { "on" } else { "off" };
        writeln!(self.out, "Debug is {}", state)
    }

    fn set_debug(&mut self, enabled: bool) -> io::Result<()> {
        if let Err(e) = self.log_level.set_debug(enabled) {
            tracing::warn!("{}", e);
        }
        self.print_debug()
    }

    async fn connect_command(&mut self, phrases: &[String]) -> io::Result<()> {
        if !(2..=4).contains(&phrases.len()) {
            return writeln!(self.out, "Format: connect <url> [<user> [<pw>]]");
        }

        self.connect(
            &phrases[1],
            phrases.get(2).cloned(),
            phrases.get(3).cloned().map(Zeroizing::new),
        )
        .await
    }

    /// Prompts for missing credentials, records the URL and reconnects.
    async fn connect(
        &mut self,
        url: &str,
        user: Option<String>,
        password: Option<Zeroizing<String>>,
    ) -> io::Result<()> {
        let user = match user {
            Some(user) => Some(user),
            None => self.input.read_line("User: ")?,
        };
        let Some(user) = user.filter(|user| !user.trim().is_empty()) else {
            return writeln!(
                self.out,
                "User name not specified.  Aborting connection attempt."
            );
        };

        let password = match password {
            Some(password) => password,
            None => Zeroizing::new(self.input.read_password("Password: ")?.unwrap_or_default()),
        };

        self.session.init(url, &user, &password).await;
        if !self.session.create().await {
            writeln!(self.out, "Error creating database connection")?;
        }
        Ok(())
    }

    async fn list_tables(&mut self) -> io::Result<()> {
        let Ok(metadata) = self.session.metadata() else {
            return writeln!(self.out, "{}", NO_CONNECTION);
        };

        match metadata.list_tables(None).await {
            Ok(tables) if tables.is_empty() => writeln!(self.out, "No tables were found"),
            Ok(mut tables) => {
                tables.sort();
                tables.iter().try_for_each(|table| writeln!(self.out, "{}", table))
            }
            Err(e) => writeln!(self.out, "Unable to list tables: {}", e),
        }
    }

    async fn list_schemas(&mut self) -> io::Result<()> {
        let Ok(metadata) = self.session.metadata() else {
            return writeln!(self.out, "{}", NO_CONNECTION);
        };

        match metadata.list_schemas().await {
            Ok(schemas) if schemas.is_empty() => writeln!(self.out, "No schemas were found"),
            Ok(mut schemas) => {
                schemas.sort();
                schemas.iter().try_for_each(|schema| writeln!(self.out, "{}", schema))
            }
            Err(e) => writeln!(self.out, "Unable to list schemas: {}", e),
        }
    }

    async fn select_schema(&mut self, name: &str) -> io::Result<()> {
        match self.session.select_schema(name).await {
            Ok(()) => Ok(()),
            Err(DbConnError::NotConnected) => writeln!(self.out, "{}", NO_CONNECTION),
            Err(e) => writeln!(self.out, "Unable to select schema {}: {}", name, e),
        }
    }

    async fn select_connection(&mut self) -> io::Result<()> {
        let urls = self.session.history().urls().to_vec();
        if urls.is_empty() {
            return writeln!(self.out, "{}", NO_HISTORY);
        }

        for (index, url) in urls.iter().enumerate() {
            writeln!(self.out, "#{} - {}", index + 1, url)?;
        }
        self.out.flush()?;

        let selection = self
            .input
            .read_line("Select a number: ")?
            .and_then(|answer| answer.trim().parse::<usize>().ok())
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| urls.get(index));

        let Some(url) = selection else {
            return writeln!(self.out, "Illegal selection");
        };

        writeln!(self.out, "Selected {}", url)?;
        self.out.flush()?;
        self.connect(url, None, None).await
    }

    async fn describe_table(&mut self, table: &str) -> io::Result<()> {
        let Ok(metadata) = self.session.metadata() else {
            return writeln!(self.out, "{}", NO_CONNECTION);
        };

        let columns = match metadata.list_columns(table, true).await {
            Ok(columns) if columns.is_empty() => {
                return writeln!(self.out, "No table description found");
            }
            Ok(columns) => columns,
            Err(e) => return writeln!(self.out, "Unable to describe table {}: {}", table, e),
        };

        let mut grid = Table::new();
        grid.set_header(vec!["#", "Name", "Type", "Nullable?", "PK?"]);
        for column in &columns {
            grid.add_row(vec![
                column.ordinal.to_string(),
                column.name.clone(),
                column.display_type.clone(),
                column.nullable_label().to_string(),
                column.primary_key_label().to_string(),
            ]);
        }

        writeln!(self.out, "{grid}")
    }

    async fn count_tables(&mut self) -> io::Result<()> {
        let Ok(metadata) = self.session.metadata() else {
            return writeln!(self.out, "{}", NO_CONNECTION);
        };

        match metadata.list_tables(None).await {
            Ok(tables) => writeln!(self.out, "Number of database tables: {}", tables.len()),
            Err(e) => writeln!(self.out, "Unable to count tables: {}", e),
        }
    }

    async fn count_rows(&mut self, table: &str) -> io::Result<()> {
        let Ok(metadata) = self.session.metadata() else {
            return writeln!(self.out, "{}", NO_CONNECTION);
        };

        let count = metadata
            .run_scalar_int_query(&format!("select count(*) from {}", table))
            .await;
        if count == NO_VALUE {
            return writeln!(self.out, "Unable to count the rows in table {}", table);
        }

        writeln!(
            self.out,
            "The number of rows in table {} is {}",
            table,
            format_count(count)
        )
    }

    async fn export_data(&mut self, table: &str, clause: Option<&str>) -> io::Result<()> {
        let Ok(metadata) = self.session.metadata() else {
            return writeln!(self.out, "{}", NO_CONNECTION);
        };

        // The table name must identify exactly one table
        match metadata.list_tables(Some(table)).await {
            Ok(matches) if matches.len() == 1 => {}
            _ => return writeln!(self.out, "Error getting table data"),
        }

        writeln!(self.out, "Exporting table data for {}...", table)?;
        self.out.flush()?;

        let file_name = format!("{}.csv", table);
        let path = self.config.export_dir.join(&file_name);
        match export_table_data(&metadata, table, clause, &path).await {
            Ok(_) => writeln!(self.out, "Data saved to {}", file_name),
            Err(e) => writeln!(self.out, "Error exporting table data: {}", e),
        }
    }

    async fn export_schema(&mut self, file_name: &str) -> io::Result<()> {
        let Ok(metadata) = self.session.metadata() else {
            return writeln!(self.out, "{}", NO_CONNECTION);
        };

        writeln!(self.out, "Generating the list of tables...")?;
        self.out.flush()?;

        match export_schema(&metadata, Path::new(file_name)).await {
            Ok(0) => writeln!(self.out, "No tables were found"),
            Ok(_) => writeln!(self.out, "Database information saved to file"),
            Err(DbConnError::Configuration { message }) => writeln!(self.out, "{}", message),
            Err(e) => writeln!(self.out, "Exception while saving the data: {}", e),
        }
    }

    fn print_history(&mut self) -> io::Result<()> {
        let urls = self.session.history().urls();
        if urls.is_empty() {
            return writeln!(self.out, "{}", NO_HISTORY);
        }
        urls.iter().try_for_each(|url| writeln!(self.out, "{}", url))
    }

    async fn print_db_info(&mut self) -> io::Result<()> {
        let Some(url) = self
            .session
            .connection()
            .and(self.session.url())
            .map(redact_database_url)
        else {
            return writeln!(self.out, "You are not connected to a database");
        };

        let valid = self.session.is_valid(Some(self.config.probe_timeout)).await;
        writeln!(self.out, "You are connected to {}", url)?;
        if !valid {
            writeln!(self.out, "The connection is no longer valid")?;
        }
        Ok(())
    }
}

/// Free-form text from phrase `from` onward.
///
/// A single trailing phrase is taken as parsed, so a quoted clause loses
/// its quotes. Several phrases are taken verbatim from the line, keeping any
/// quotes inside SQL text.
fn trailing_text(line: &str, phrases: &[Phrase], from: usize) -> Option<String> {
    match &phrases[from.min(phrases.len())..] {
        [] => None,
        [only] => Some(only.text.clone()),
        [first, ..] => Some(line[first.offset..].trim_end().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_text() {
        let line = "export data orders where name = 'x'";
        let phrases = tokenize(line);
        assert_eq!(trailing_text(line, &phrases, 3).as_deref(), Some("where name = 'x'"));
        assert_eq!(trailing_text(line, &phrases, 9), None);

        let line = "export data orders \"where id > 3\"";
        let phrases = tokenize(line);
        assert_eq!(trailing_text(line, &phrases, 3).as_deref(), Some("where id > 3"));

        let line = "export data orders";
        assert_eq!(trailing_text(line, &tokenize(line), 3), None);
    }

    #[test]
    fn test_trailing_text_for_timed_command() {
        let line = "time  describe table \"order lines\"  ";
        let phrases = tokenize(line);
        assert_eq!(
            trailing_text(line, &phrases, 1).as_deref(),
            Some("describe table \"order lines\"")
        );
    }
}
