/*!
 * Command Line Interface
 * Argument parsing, output rendering and the persistent session
 */

pub mod command;
pub mod render;
pub mod session;

pub use command::Command;
pub use session::Session;

use miette::Diagnostic;
use thiserror::Error;

/// Usage line shown with argument errors
pub const USAGE: &str = "heapsim <allocate <size> | deallocate <pid> | compact | display | \
add_relation <from> <to> | show_graph | logout | stats | show_free_index | show_pid_table | snapshot_json>";

/// Argument errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum CliError {
    #[error("No command given")]
    #[diagnostic(code(cli::usage), help("Usage: heapsim <command> [args]"))]
    MissingCommand,

    #[error("Invalid command: {0}")]
    #[diagnostic(
        code(cli::unknown_command),
        help("Commands: allocate, deallocate, compact, display, add_relation, show_graph, logout, stats, show_free_index, show_pid_table, snapshot_json.")
    )]
    UnknownCommand(String),

    #[error("`{command}` expects {expected}")]
    #[diagnostic(code(cli::arity), help("Usage: heapsim <command> [args]"))]
    WrongArity {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid {name} for `{command}`: {value:?}")]
    #[diagnostic(code(cli::invalid_argument), help("Sizes and PIDs are whole numbers."))]
    InvalidArgument {
        command: &'static str,
        name: &'static str,
        value: String,
    },
}
