//! Interactive command console.
//!
//! # Example
//! ```rust,no_run
//! use dbconn_core::adapters::DriverConnector;
//! use dbconn_core::config::ConsoleConfig;
//! use dbconn_core::console::{Console, ScriptedInput};
//! use dbconn_core::logging::LogLevelHandle;
//! use dbconn_core::session::{ConnectionHistory, ConnectionManager};
//! use tracing_subscriber::filter::LevelFilter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::default();
//! let history = ConnectionHistory::load(&config.history_file).await?;
//! let session = ConnectionManager::new(Box::new(DriverConnector::default()), history);
//! let input = ScriptedInput::new(["connect sqlite::memory: admin ''", "list tables", "quit"]);
//!
//! let mut console = Console::new(
//!     session,
//!     config,
//!     input,
//!     std::io::stdout(),
//!     LogLevelHandle::detached(LevelFilter::INFO),
//! );
//! console.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod input;
pub mod parser;
pub mod registry;
pub mod repl;
pub mod timespan;

pub use input::{LineSource, ScriptedInput};
pub use parser::parse_phrases;
pub use registry::{CommandKind, CommandRegistry};
pub use repl::{Console, Exit, Flow, PROMPT};
