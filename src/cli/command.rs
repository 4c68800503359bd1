/*!
 * Commands
 * One simulator invocation, parsed from its arguments
 */

use super::CliError;
use crate::core::types::{Pid, Size};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Allocate { size: Size },
    Deallocate { pid: Pid },
    Compact,
    Display,
    AddRelation { from: Pid, to: Pid },
    ShowGraph,
    Logout,
    Stats,
    ShowFreeIndex,
    ShowPidTable,
    SnapshotJson,
}

impl Command {
    /// Parse arguments following the program name
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let (name, rest) = args.split_first().ok_or(CliError::MissingCommand)?;
        let rest: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();

        let command = match name.as_ref() {
            "allocate" => {
                let [size] = exact::<1>("allocate", "<size>", &rest)?;
                Command::Allocate {
                    size: number("allocate", "size", size)?,
                }
            }
            "deallocate" => {
                let [pid] = exact::<1>("deallocate", "<pid>", &rest)?;
                Command::Deallocate {
                    pid: number("deallocate", "pid", pid)?,
                }
            }
            "add_relation" => {
                let [from, to] = exact::<2>("add_relation", "<from> <to>", &rest)?;
                Command::AddRelation {
                    from: number("add_relation", "from", from)?,
                    to: number("add_relation", "to", to)?,
                }
            }
            other => {
                let command = match other {
                    "compact" => Command::Compact,
                    "display" => Command::Display,
                    "show_graph" => Command::ShowGraph,
                    "logout" => Command::Logout,
                    "stats" => Command::Stats,
                    "show_free_index" => Command::ShowFreeIndex,
                    "show_pid_table" => Command::ShowPidTable,
                    "snapshot_json" => Command::SnapshotJson,
                    _ => return Err(CliError::UnknownCommand(other.to_string())),
                };
                exact::<0>(command.name(), "no arguments", &rest)?;
                command
            }
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Allocate { .. } => "allocate",
            Command::Deallocate { .. } => "deallocate",
            Command::Compact => "compact",
            Command::Display => "display",
            Command::AddRelation { .. } => "add_relation",
            Command::ShowGraph => "show_graph",
            Command::Logout => "logout",
            Command::Stats => "stats",
            Command::ShowFreeIndex => "show_free_index",
            Command::ShowPidTable => "show_pid_table",
            Command::SnapshotJson => "snapshot_json",
        }
    }

    /// Commands whose effect is written back to the snapshot files
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Allocate { .. }
                | Command::Deallocate { .. }
                | Command::Compact
                | Command::AddRelation { .. }
                | Command::Logout
        )
    }
}

fn exact<'a, const N: usize>(
    command: &'static str,
    expected: &'static str,
    rest: &[&'a str],
) -> Result<[&'a str; N], CliError> {
    <[&str; N]>::try_from(rest).map_err(|_| CliError::WrongArity { command, expected })
}

fn number<T: FromStr>(command: &'static str, name: &'static str, raw: &str) -> Result<T, CliError> {
    raw.trim().parse().map_err(|_| CliError::InvalidArgument {
        command,
        name,
        value: raw.to_string(),
    })
}
