//! Session event sources: OS signals and terminal input

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use super::input::{InputError, UiCommand};

/// Events driving the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    /// A parsed command from the terminal
    Command(UiCommand),
    /// A line that didn't parse
    Invalid(InputError),
    /// SIGINT/SIGTERM or end of input
    Shutdown,
}

/// Session signal handler
///
/// Handles OS shutdown signals (SIGINT/SIGTERM) and provides a channel
/// for receiving commands from other sources (e.g., the stdin reader).
pub struct SessionSignalHandler {
    receiver: mpsc::Receiver<SessionSignal>,
}

impl SessionSignalHandler {
    /// Create a new signal handler and start listening for shutdown signals.
    ///
    /// Returns the handler and a sender other sources can feed.
    pub async fn new() -> Result<(Self, mpsc::Sender<SessionSignal>), std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            eprintln!("{} Received SIGINT (shutdown)", "↓".cyan());
            let _ = tx_int.send(SessionSignal::Shutdown).await;
        });

        let tx_term = tx.clone();
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan());
            let _ = tx_term.send(SessionSignal::Shutdown).await;
        });

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<SessionSignal> {
        self.receiver.recv().await
    }
}

/// Turn one input line into a session signal
pub fn line_to_signal(line: &str) -> SessionSignal {
    match line.parse::<UiCommand>() {
        Ok(command) => SessionSignal::Command(command),
        Err(e) => SessionSignal::Invalid(e),
    }
}

/// Forward stdin lines into the session channel until EOF
pub fn spawn_stdin_reader(tx: mpsc::Sender<SessionSignal>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let signal = match lines.next_line().await {
                Ok(Some(line)) => line_to_signal(&line),
                Ok(None) | Err(_) => SessionSignal::Shutdown,
            };
            let done = signal == SessionSignal::Shutdown;
            if tx.send(signal).await.is_err() || done {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_map_to_commands() {
        assert_eq!(line_to_signal(""), SessionSignal::Command(UiCommand::Toggle));
        assert_eq!(
            line_to_signal("p 1"),
            SessionSignal::Command(UiCommand::Play(1))
        );
    }

    #[test]
    fn bad_lines_map_to_invalid() {
        assert!(matches!(line_to_signal("zzz"), SessionSignal::Invalid(_)));
    }

    #[test]
    fn session_signal_equality() {
        assert_eq!(SessionSignal::Shutdown, SessionSignal::Shutdown);
        assert_ne!(
            SessionSignal::Command(UiCommand::List),
            SessionSignal::Command(UiCommand::Status)
        );
    }
}
