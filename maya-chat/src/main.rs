use anyhow::Context;
use maya_chat::client::HttpRelayClient;
use maya_chat::config::ChatSettings;
use maya_chat::controller::{IgnoreReason, InteractionController, Submission, SubmitOutcome};
use maya_chat::models::Attachment;
use maya_chat::repl::{self, Command};
use maya_chat::store::{FileBlobStore, SessionStore};
use service_core::observability::init_cli_tracing;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = ChatSettings::load().context("Failed to load configuration")?;
    init_cli_tracing(&settings.log_level);

    let client = HttpRelayClient::new(
        &settings.server_url,
        settings.route,
        settings.request_timeout(),
    )?;

    let blob = Arc::new(FileBlobStore::new(&settings.history_dir));
    let mut store = SessionStore::new(blob, settings.history_key.clone());
    let restored = store.load();

    let controller = InteractionController::new(client, store, settings.max_message_chars);

    println!(
        "Maya AI ({}) via {}. /help for commands.",
        settings.route.provider_name(),
        settings.server_url
    );
    if restored == 0 {
        println!("{}", repl::render_suggestions());
    } else {
        println!("Restored {} messages. /history to show them.", restored);
    }

    let mut staged: Option<Attachment> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt();
    while let Some(line) = lines.next_line().await? {
        match repl::parse_command(&line) {
            Command::Submit(message) => {
                let submission = Submission {
                    message,
                    attachment: staged.take(),
                };
                match controller.submit(submission).await {
                    SubmitOutcome::Replied(turn) | SubmitOutcome::Failed(turn) => {
                        println!("{}", repl::render_turn(&turn));
                    }
                    SubmitOutcome::Ignored(IgnoreReason::Busy) => {
                        println!("Still waiting for the previous reply.");
                    }
                    SubmitOutcome::Ignored(IgnoreReason::Empty) | SubmitOutcome::Discarded => {}
                }
            }
            Command::Attach(path) => match Attachment::from_path(&path).await {
                Ok(attachment) => {
                    println!(
                        "Attached {} ({} bytes, {})",
                        attachment.file_name,
                        attachment.bytes.len(),
                        attachment.media_type
                    );
                    staged = Some(attachment);
                }
                Err(e) => println!("Cannot read {}: {}", path.display(), e),
            },
            Command::Detach => {
                if staged.take().is_some() {
                    println!("Attachment dropped.");
                }
            }
            Command::Clear => {
                controller.reset().await;
                staged = None;
                println!("History cleared.");
                println!("{}", repl::render_suggestions());
            }
            Command::History => {
                for turn in controller.history().await {
                    println!("{}", repl::render_turn(&turn));
                }
            }
            Command::Session => {
                println!("{}", repl::render_session(controller.session().await.as_ref()));
            }
            Command::Help => println!("{}", repl::HELP),
            Command::Quit => break,
            Command::Invalid(reason) => println!("{}", reason),
        }
        prompt();
    }

    Ok(())
}
