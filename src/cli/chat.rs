//! Interactive chat loop over any line-oriented input.

use crate::cli::output::Output;
use crate::session::{ChatSession, SessionEvent, SessionStats};
use crate::types::Result;
use crate::utils::toml_config::AssistantConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read lines from `input` until `exit` or end of input, printing each event.
///
/// Returns the session stats at the point the loop ended.
pub async fn run_chat<R>(
    session: &mut ChatSession,
    input: R,
    output: &Output,
    assistant: &AssistantConfig,
    show_sources: bool,
) -> Result<SessionStats>
where
    R: AsyncBufRead + Unpin,
{
    output.banner(assistant);
    let mut lines = input.lines();

    loop {
        output.prompt();
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match session.handle_input(&line).await {
            SessionEvent::Ignored => {}
            SessionEvent::Help => output.chat_help(),
            SessionEvent::Stats(stats) => output.session_stats(&stats),
            SessionEvent::Answered(result) => {
                output.answer(&assistant.restaurant_name, &result, show_sources)
            }
            SessionEvent::Failed(result) => {
                output.error(&format!(
                    "Error: {}",
                    result.error.as_deref().unwrap_or("desconocido")
                ));
                output.answer(&assistant.restaurant_name, &result, false);
            }
            SessionEvent::Exit { final_stats } => {
                if let Some(stats) = final_stats {
                    output.session_stats(&stats);
                }
                output.info("¡Hasta pronto!");
                break;
            }
        }
    }

    Ok(session.stats().clone())
}
