// Console input loop.
//
// Reads operator lines, parses them, and forwards commands to the app loop.
// Help text and parse errors are answered locally without a round trip.

use draftsheet_core::protocol::UserCommand;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::input::{self, ParsedLine};

/// Forward commands read from `reader` until EOF, `quit`, or the app loop
/// hanging up.
///
/// A line that is not valid UTF-8 is reported and skipped. Any other read
/// error ends input and is returned.
pub async fn run<R>(reader: R, cmd_tx: &mpsc::Sender<UserCommand>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!("Ignoring unreadable input line: {}", e);
                println!("error: input is not valid UTF-8, line ignored\n");
                continue;
            }
            Err(e) => return Err(e),
        };

        let cmd = match input::parse_line(&line) {
            Ok(ParsedLine::Command(cmd)) => cmd,
            Ok(ParsedLine::Help) => {
                println!("{}\n", input::USAGE);
                continue;
            }
            Ok(ParsedLine::Blank) => continue,
            Err(e) => {
                println!("error: {e}\n");
                continue;
            }
        };
        let quit = cmd == UserCommand::Quit;
        if cmd_tx.send(cmd).await.is_err() {
            error!("App loop is gone; stopping input");
            break;
        }
        if quit {
            break;
        }
    }
    Ok(())
}
