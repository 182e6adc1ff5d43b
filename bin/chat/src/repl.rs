//! Stdin/stdout chat loop.
//!
//! Renders the transcript one exchange at a time: the seeded greeting
//! first, then each reply as its turn resolves. A three-dot typing
//! indicator animates while a turn is in flight. Remote failures print
//! a generic failure line and the loop continues.

use crate::turn::{ChatEngine, TurnError};
use bestself_conversation::Session;
use std::io::Write as _;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prompt shown before each user input.
const PROMPT: &str = "you> ";

/// Label shown before each assistant reply.
const ASSISTANT: &str = "bestself> ";

/// Failure line shown when a turn's remote call fails.
const FAILURE_LINE: &str = "bestself> (no reply: something went wrong fetching a response)";

/// Runs the chat loop until stdin closes.
pub async fn run(engine: &ChatEngine, session: &mut Session) -> std::io::Result<()> {
    // Render the transcript as it stands: the seeded greeting, plus any
    // hydrated history when resuming.
    for message in session.transcript().iter() {
        let label = if message.is_user() { PROMPT } else { ASSISTANT };
        println!("{label}{}", message.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let indicator = spawn_typing_indicator();
        let outcome = engine.submit(session, &line).await;
        indicator.abort();
        // Clear the indicator line before printing the outcome.
        print!("\r\x1b[2K");

        match outcome {
            Ok(reply) => println!("{ASSISTANT}{}", reply.content),
            Err(TurnError::SessionBusy) => {
                println!("bestself> (still thinking, give me a moment)");
            }
            Err(TurnError::Remote(e)) => {
                tracing::error!(error = %e, "turn failed");
                println!("{FAILURE_LINE}");
            }
        }
    }

    Ok(())
}

/// Animates a three-dot typing indicator until aborted.
fn spawn_typing_indicator() -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let frames = [".", "..", "..."];
        let mut i = 0;
        loop {
            print!("\r\x1b[2K{ASSISTANT}{}", frames[i % frames.len()]);
            let _ = std::io::stdout().flush();
            i += 1;
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
    })
}
