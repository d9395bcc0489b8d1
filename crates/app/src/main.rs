use services::{AppServices, SessionError, StudySession};
use tracing_subscriber::EnvFilter;

mod args;
mod render;

use args::{Args, Command, ProcessEnv, print_usage};

fn init_tracing() {
    let filter = std::env::var("PREP_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), &ProcessEnv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tracing::debug!(command = ?parsed.command, db = %parsed.config.db_url, "starting");
    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.config.db_url)?;
    let services = AppServices::bootstrap(&parsed.config).await?;
    let mut session = services.into_session();

    let output = execute(&mut session, parsed.command).await?;
    print!("{output}");
    Ok(())
}

async fn execute(
    session: &mut StudySession,
    command: Command,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match command {
        Command::Topics => render::topic_list(session),
        Command::Stats => {
            let total = session.total_progress();
            format!(
                "{}\n{} {}%\n",
                render::overview_line(&session.overview()),
                render::progress_bar(total.pct, 40),
                total.pct
            )
        }
        Command::Show { topic } => {
            let topic = session
                .resolve_topic(&topic)
                .ok_or(SessionError::UnknownTopic(topic))?;
            render::topic_view(session, topic)
        }
        Command::Toggle { topic, question } => {
            let outcome = session.toggle_read(&topic, question).await?;
            let stats = session.topic_progress(topic.trim());
            let status = if outcome.read {
                "Marked as reviewed!"
            } else {
                "Unmarked"
            };
            format!("{status} ({}/{} completed)\n", stats.read, stats.total)
        }
        Command::MarkAll { topic } => {
            session.mark_topic_read(&topic).await?;
            let stats = session.topic_progress(topic.trim());
            format!("All marked as reviewed! ({}/{} completed)\n", stats.read, stats.total)
        }
        Command::Reset { topic } => {
            session.reset_topic(&topic).await;
            format!("Progress cleared for {}\n", topic.trim())
        }
        Command::Search { term } => {
            let results = session.search(&term);
            render::search_view(session, &results)
        }
        Command::Export => format!("{}\n", session.export_progress()?),
        Command::Import { path } => {
            let raw = tokio::fs::read_to_string(&path).await?;
            session.import_progress(&raw).await?;
            let total = session.total_progress();
            format!("Progress imported ({}/{} completed)\n", total.read, total.total)
        }
        Command::Help => String::new(),
    };
    Ok(output)
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| args::ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(args::ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::QuestionId;

    #[tokio::test]
    async fn toggle_then_search_reflects_new_state() {
        let mut session = render::tests::session().await;
        let command = Command::Toggle {
            topic: " css ".to_owned(),
            question: QuestionId::new(1),
        };

        let output = execute(&mut session, command).await.unwrap();
        assert_eq!(output, "Marked as reviewed! (1/2 completed)\n");

        let output = execute(&mut session, Command::Search { term: "flexbox".to_owned() })
            .await
            .unwrap();
        assert!(output.starts_with("Found 1 questions matching \"flexbox\" across: CSS\n"));
        assert!(output.contains("  1. [x] Explain **flexbox**  (#1)\n"));
    }

    #[tokio::test]
    async fn unknown_topic_is_an_error() {
        let mut session = render::tests::session().await;
        let err = execute(&mut session, Command::Show { topic: "go".to_owned() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown topic: go");
    }
}
