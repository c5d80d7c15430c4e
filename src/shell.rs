/*!
 * Command Shell
 * Parses host commands and dispatches them to the process manager
 */

use crate::core::types::{Pid, Priority};
use crate::process::{NoopWork, ProcessError, ProcessManager};
use thiserror::Error;

/// Shell operation result
pub type ShellResult<T> = Result<T, ShellError>;

/// Shell errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {what}: '{value}'")]
    InvalidArgument { what: &'static str, value: String },

    #[error(transparent)]
    Process(#[from] ProcessError),
}

const HELP: &str = "\
Commands:
  ps                         list processes as a tree
  pinfo <pid>                show process details
  pstat                      show scheduler statistics
  kill <pid>                 block a process
  unblock <pid>              return a blocked process to the ready queue
  terminate <pid>            terminate a process
  priority <pid> <value>     change a process's priority
  spawn <name> [priority]    create a process
  child <parent> <name>      create a child process
  help                       show this message
  exit                       leave the shell";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ps,
    Pinfo { pid: Pid },
    Pstat,
    Kill { pid: Pid },
    Unblock { pid: Pid },
    Terminate { pid: Pid },
    Priority { pid: Pid, value: Priority },
    Spawn { name: String, priority: Option<Priority> },
    Child { parent: Pid, name: String },
    Help,
    Exit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> ShellResult<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (word, args.as_slice()) {
            ("ps", []) => Self::Ps,
            ("pstat", []) => Self::Pstat,
            ("help" | "?", _) => Self::Help,
            ("exit" | "quit", _) => Self::Exit,
            ("pinfo", [pid]) => Self::Pinfo { pid: parse_pid(pid)? },
            ("kill", [pid]) => Self::Kill { pid: parse_pid(pid)? },
            ("unblock", [pid]) => Self::Unblock { pid: parse_pid(pid)? },
            ("terminate", [pid]) => Self::Terminate { pid: parse_pid(pid)? },
            ("priority", [pid, value]) => Self::Priority {
                pid: parse_pid(pid)?,
                value: parse_priority(value)?,
            },
            ("spawn", [name]) => Self::Spawn {
                name: (*name).to_string(),
                priority: None,
            },
            ("spawn", [name, priority]) => Self::Spawn {
                name: (*name).to_string(),
                priority: Some(parse_priority(priority)?),
            },
            ("child", [parent, name]) => Self::Child {
                parent: parse_pid(parent)?,
                name: (*name).to_string(),
            },
            ("ps" | "pstat", _) => return Err(ShellError::Usage(word_usage(word))),
            ("pinfo" | "kill" | "unblock" | "terminate" | "priority" | "spawn" | "child", _) => {
                return Err(ShellError::Usage(word_usage(word)))
            }
            (other, _) => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn word_usage(word: &str) -> &'static str {
    match word {
        "ps" => "ps",
        "pstat" => "pstat",
        "pinfo" => "pinfo <pid>",
        "kill" => "kill <pid>",
        "unblock" => "unblock <pid>",
        "terminate" => "terminate <pid>",
        "priority" => "priority <pid> <value>",
        "spawn" => "spawn <name> [priority]",
        "child" => "child <parent> <name>",
        _ => "help",
    }
}

fn parse_pid(raw: &str) -> ShellResult<Pid> {
    raw.parse().map_err(|_| ShellError::InvalidArgument {
        what: "pid",
        value: raw.to_string(),
    })
}

fn parse_priority(raw: &str) -> ShellResult<Priority> {
    raw.parse().map_err(|_| ShellError::InvalidArgument {
        what: "priority",
        value: raw.to_string(),
    })
}

/// What the host should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Exit,
}

/// Command dispatcher bound to one process manager
#[derive(Debug, Clone)]
pub struct Shell {
    manager: ProcessManager,
}

impl Shell {
    pub fn new(manager: ProcessManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &ProcessManager {
        &self.manager
    }

    /// Parse and run one line; blank lines reply with empty text
    pub fn execute(&self, line: &str) -> ShellResult<Reply> {
        match Command::parse(line)? {
            Some(command) => self.run(command),
            None => Ok(Reply::Text(String::new())),
        }
    }

    pub fn run(&self, command: Command) -> ShellResult<Reply> {
        let pm = &self.manager;
        let text = match command {
            Command::Ps => pm.render_process_list(),
            Command::Pinfo { pid } => pm
                .get_by_id(pid)
                .ok_or(ProcessError::NotFound(pid))?
                .to_string(),
            Command::Pstat => pm.scheduler_statistics().to_string(),
            // kill blocks rather than terminates
            Command::Kill { pid } => {
                pm.try_block(pid)?;
                format!("Process {pid} blocked")
            }
            Command::Unblock { pid } => {
                pm.try_unblock(pid)?;
                format!("Process {pid} unblocked")
            }
            Command::Terminate { pid } => {
                pm.try_terminate(pid)?;
                format!("Process {pid} terminated")
            }
            Command::Priority { pid, value } => {
                if !pm.set_priority(pid, value) {
                    return Err(ProcessError::NotFound(pid).into());
                }
                format!("Priority of process {pid} set to {value}")
            }
            Command::Spawn { name, priority } => {
                let pid = match priority {
                    Some(priority) => pm.create_process(name.as_str(), NoopWork, priority),
                    None => pm.spawn(name.as_str(), NoopWork),
                };
                format!("Created process {name} (PID {pid})")
            }
            Command::Child { parent, name } => {
                let pid = pm
                    .create_child_process(parent, name.as_str(), NoopWork)
                    .ok_or(ProcessError::NotFound(parent))?;
                format!("Created process {name} (PID {pid}) under {parent}")
            }
            Command::Help => HELP.to_string(),
            Command::Exit => return Ok(Reply::Exit),
        };
        Ok(Reply::Text(text))
    }
}

/// Summarize live process counts on one line
pub fn status_line(manager: &ProcessManager) -> String {
    let stats = manager.get_statistics();
    format!(
        "{} processes: {} running, {} ready, {} blocked",
        stats.total, stats.running, stats.ready, stats.blocked
    )
}
