//! Fieldeaze application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML (`--init-config`
//!    writes it back out and exits)
//! 2. Load the catalog (file or built-in sample)
//! 3. Build the chat orchestrator
//! 4. Run the terminal chat loop over stdin

mod cli;
mod repl;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use fieldeaze_chat::{ChatOrchestrator, ConversationState, TurnOutcome};
use fieldeaze_core::{Catalog, FieldeazeConfig};

use cli::CliArgs;
use repl::{render, ReplyCommand, USAGE};

/// Pick the catalog: --catalog flag (must load), then the configured path
/// (falls back to the sample), then the sample.
fn load_catalog(
    args: &CliArgs,
    config: &FieldeazeConfig,
) -> Result<Catalog, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.catalog {
        return Ok(Catalog::load(path)?);
    }
    if let Some(ref path) = config.general.catalog_path {
        return Ok(Catalog::load_or_default(path));
    }
    tracing::info!("No catalog configured, using the built-in sample");
    Ok(Catalog::sample())
}

/// Send one user line and print whatever comes back.
async fn send(
    orchestrator: &ChatOrchestrator<Arc<Catalog>>,
    state: &mut ConversationState,
    text: &str,
    delay: Duration,
) {
    match orchestrator.handle_message(state, text) {
        Ok(TurnOutcome::Replied(message)) => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            println!(
                "{}",
                render(&message, &orchestrator.config().assistant_name)
            );
        }
        Ok(TurnOutcome::Dial { uri }) => {
            println!("Dialing {}", uri);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Message rejected");
            println!("({})", e);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts so its log level can apply.
    let config_file = args.resolve_config_path();
    let loaded = FieldeazeConfig::load(&config_file);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Tracing. RUST_LOG wins, then --log-level, then the config file.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Fieldeaze v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(_) if !config_file.exists() => tracing::info!(
            path = %config_file.display(),
            "No configuration file, using defaults"
        ),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Using default configuration"
        ),
    }

    if args.init_config {
        config.save(&config_file)?;
        println!("Wrote configuration to {}", config_file.display());
        return Ok(());
    }

    let catalog = load_catalog(&args, &config)?;
    let delay = args.resolve_typing_delay(Duration::from_millis(config.assistant.typing_delay_ms));
    let assistant_name = config.assistant.assistant_name.clone();
    let orchestrator = ChatOrchestrator::new(config.assistant, Arc::new(catalog));

    let mut state = orchestrator.start_conversation();
    println!("{}", USAGE);
    if let Some(welcome) = state.last_bot_message() {
        println!("{}", render(welcome, &assistant_name));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ReplyCommand::parse(&line) {
            ReplyCommand::Say(text) if text.is_empty() => {}
            ReplyCommand::Say(text) => {
                send(&orchestrator, &mut state, &text, delay).await;
            }
            ReplyCommand::QuickReply(n) => match orchestrator.quick_reply(&state, n) {
                Some(text) => {
                    println!("You: {}", text);
                    send(&orchestrator, &mut state, &text, delay).await;
                }
                None => println!("(no quick reply {})", n),
            },
            ReplyCommand::Reset => {
                let welcome = orchestrator.reset(&mut state);
                println!("{}", render(&welcome, &assistant_name));
            }
            ReplyCommand::Quit => break,
            ReplyCommand::Invalid(reason) => println!("({}) {}", reason, USAGE),
        }
    }

    tracing::info!(
        conversation = %state.id,
        messages = state.messages.len(),
        "Chat ended"
    );
    Ok(())
}
