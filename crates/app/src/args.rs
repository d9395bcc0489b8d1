use std::fmt;
use std::path::PathBuf;

use prep_core::QuestionId;
use services::ServicesConfig;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidQuestionId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidSlot { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, what } => {
                write!(f, "{command} requires a {what}")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidQuestionId { raw } => write!(f, "invalid question id: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSlot { raw } => write!(f, "invalid --slot value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Topics,
    Show { topic: String },
    Toggle { topic: String, question: QuestionId },
    MarkAll { topic: String },
    Reset { topic: String },
    Search { term: String },
    Stats,
    Export,
    Import { path: PathBuf },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config: ServicesConfig,
    pub command: Command,
}

/// Environment lookups, injectable for tests.
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

pub fn print_usage() {
    eprint!("{}", usage());
}

fn usage() -> String {
    let defaults = ServicesConfig::default();
    format!(
        "Usage:
  app [flags] topics                     # list topics with progress (default)
  app [flags] show <topic>               # show a topic's questions
  app [flags] toggle <topic> <question>  # flip a question's read state
  app [flags] mark-all <topic>           # mark every question of a topic read
  app [flags] reset <topic>              # clear a topic's progress
  app [flags] search <term...>           # search questions, answers and examples
  app [flags] stats                      # overall progress
  app [flags] export                     # print progress as JSON
  app [flags] import <file>              # replace progress from a JSON file

Flags:
  --catalog <path>   question bank (default {catalog})
  --db <sqlite_url>  progress database (default {db})
  --slot <name>      progress slot (default {slot})
  --topic <id>       open a topic directly (same as `show <id>`)

Environment:
  PREP_CATALOG, PREP_DB_URL, PREP_SLOT, PREP_LOG
",
        catalog = defaults.catalog_path.display(),
        db = defaults.db_url,
        slot = defaults.progress_slot,
    )
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    /// Parse flags and the subcommand. Environment values are defaults that
    /// flags override.
    pub fn parse(argv: impl IntoIterator<Item = String>, env: &dyn Env) -> Result<Self, ArgsError> {
        let mut config = ServicesConfig::default();
        if let Some(path) = env.var("PREP_CATALOG") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(url) = env.var("PREP_DB_URL") {
            config.db_url = normalize_sqlite_url(url);
        }
        if let Some(slot) = env.var("PREP_SLOT").filter(|s| !s.trim().is_empty()) {
            config.progress_slot = slot;
        }

        let mut deep_link: Option<String> = None;
        let mut positional: Vec<String> = Vec::new();
        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => {
                    config.catalog_path = PathBuf::from(require_value(&mut args, "--catalog")?);
                }
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.db_url = normalize_sqlite_url(value);
                }
                "--slot" => {
                    let value = require_value(&mut args, "--slot")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidSlot { raw: value });
                    }
                    config.progress_slot = value;
                }
                "--topic" => deep_link = Some(require_value(&mut args, "--topic")?),
                "--help" | "-h" => {
                    return Ok(Self {
                        config,
                        command: Command::Help,
                    });
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let command = match (parse_command(positional)?, deep_link) {
            (Command::Topics, Some(topic)) => Command::Show { topic },
            (command, _) => command,
        };
        Ok(Self { config, command })
    }
}

fn parse_command(positional: Vec<String>) -> Result<Command, ArgsError> {
    let mut rest = positional.into_iter();
    let Some(name) = rest.next() else {
        return Ok(Command::Topics);
    };

    let command = match name.as_str() {
        "topics" => Command::Topics,
        "stats" => Command::Stats,
        "export" => Command::Export,
        "help" => Command::Help,
        "show" => Command::Show {
            topic: take_topic(&mut rest, "show")?,
        },
        "mark-all" => Command::MarkAll {
            topic: take_topic(&mut rest, "mark-all")?,
        },
        "reset" => Command::Reset {
            topic: take_topic(&mut rest, "reset")?,
        },
        "toggle" => {
            let topic = take_topic(&mut rest, "toggle")?;
            let raw = rest.next().ok_or(ArgsError::MissingArgument {
                command: "toggle",
                what: "question id",
            })?;
            let question = raw
                .parse::<QuestionId>()
                .map_err(|_| ArgsError::InvalidQuestionId { raw: raw.clone() })?;
            Command::Toggle { topic, question }
        }
        "search" => {
            let term = rest.by_ref().collect::<Vec<_>>().join(" ");
            if term.trim().is_empty() {
                return Err(ArgsError::MissingArgument {
                    command: "search",
                    what: "search term",
                });
            }
            Command::Search { term }
        }
        "import" => {
            let path = rest.next().ok_or(ArgsError::MissingArgument {
                command: "import",
                what: "file path",
            })?;
            Command::Import {
                path: PathBuf::from(path),
            }
        }
        _ => return Err(ArgsError::UnknownCommand(name)),
    };

    if let Some(extra) = rest.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(command)
}

fn take_topic(
    rest: &mut impl Iterator<Item = String>,
    command: &'static str,
) -> Result<String, ArgsError> {
    rest.next().ok_or(ArgsError::MissingArgument {
        command,
        what: "topic id",
    })
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:")
    {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
