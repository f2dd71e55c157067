mod cli;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use advisor::config::Config;
use advisor::errors::AdvisorError;
use advisor::handlers;
use advisor::ranking::parse_records;
use advisor::state::AdvisorState;

use crate::cli::{read_documents, read_file, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on malformed env values)
    let config = Config::from_env()?;

    // Structured logging on stderr; stdout carries command output only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting career advisor v{}", env!("CARGO_PKG_VERSION"));

    // Model load and corpus embedding are CPU-bound
    let init_config = config.clone();
    let initialized = tokio::task::spawn_blocking(move || AdvisorState::initialize(&init_config))
        .await
        .context("Initialization task failed")?;
    let mut state = match initialized {
        Ok(state) => state,
        Err(e) => {
            emit_error(&e);
            std::process::exit(1);
        }
    };

    cli.overrides.apply(&mut state.settings);
    let state = Arc::new(state);

    if let Err(e) = run(cli.command, &state).await {
        match e.downcast_ref::<AdvisorError>() {
            Some(advisor_error) => emit_error(advisor_error),
            None => {
                error!("{e:#}");
                print_json(&ErrorBody::new("INTERNAL_ERROR", format!("{e:#}")))?;
            }
        }
        std::process::exit(1);
    }

    if let Ok(state) = Arc::try_unwrap(state) {
        state.teardown();
    }
    Ok(())
}

async fn run(command: Commands, state: &Arc<AdvisorState>) -> Result<()> {
    match command {
        Commands::Extract(input) => {
            let text = input.read()?;
            let skills = blocking(state, move |s| handlers::extract_skills(s, &text)).await?;
            print_json(&skills)
        }

        Commands::Suggest { files } => {
            let documents = read_documents(&files)?;
            let response = blocking(state, move |s| handlers::suggest_careers(s, &documents)).await?;
            print_json(&response)
        }

        Commands::Recommend {
            records,
            skills,
            resume,
            field,
        } => {
            let records = parse_records(&read_file(&records)?)?;
            let resume_text = resume.as_deref().map(read_file).transpose()?;
            let ranked = blocking(state, move |s| {
                let skills = match resume_text {
                    Some(text) => handlers::extract_skills(s, &text)?.to_vec(),
                    None => skills,
                };
                handlers::recommend_records(s, &skills, &records, &field)
            })
            .await?;
            print_json(&ranked)
        }

        Commands::Roles(input) => {
            let text = input.read()?;
            let ranked = blocking(state, move |s| handlers::recommend_roles(s, &text)).await?;
            print_json(&ranked)
        }

        Commands::Ask { query } => {
            let answer = handlers::answer_query(state, &query).await?;
            print_json(&answer)
        }

        Commands::Chat => chat(state).await,
    }
}

/// Reads questions from stdin until EOF, `exit` or `quit`.
async fn chat(state: &AdvisorState) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Ask about your career path (type 'exit' to quit)");

    loop {
        eprint!("> ");
        std::io::stderr().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        match handlers::answer_query(state, query).await {
            Ok(answer) => match (answer.answer, answer.generation_error) {
                (Some(text), _) => println!("{text}\n"),
                (None, Some(reason)) => {
                    eprintln!("No answer: {reason}");
                    for chunk in &answer.context {
                        println!("- {}", chunk.text);
                    }
                }
                (None, None) => eprintln!("No answer"),
            },
            Err(e) => {
                let (code, message) = e.report();
                eprintln!("{code}: {message}");
            }
        }
    }

    info!("Chat session ended");
    Ok(())
}

/// Runs a synchronous handler on the blocking pool.
async fn blocking<T, F>(state: &Arc<AdvisorState>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&AdvisorState) -> Result<T, AdvisorError> + Send + 'static,
{
    let state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || f(&state))
        .await
        .context("Worker task failed")?;
    Ok(result?)
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ErrorBody {
    fn new(code: &'static str, message: String) -> Self {
        Self {
            error: ErrorDetail { code, message },
        }
    }
}

fn emit_error(e: &AdvisorError) {
    let (code, message) = e.report();
    if let Err(write_error) = print_json(&ErrorBody::new(code, message)) {
        error!("Failed to write error output: {write_error}");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}
