use std::io::{self, BufRead, Write};
use std::thread;

use tokio::sync::mpsc;

use crate::core::{Lanes, MatchOutcome, MatchView, Phase, NUM_LANES};
use crate::ui;

use super::{Command, Player};

/// What the user typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Quit,
}

/// Parse one line of user input: `r`/`roll`, a lane number, or `q`/`quit`.
pub fn parse_input(input: &str) -> Result<Input, String> {
    let input = input.trim().to_ascii_lowercase();
    match input.as_str() {
        "" => Err("Empty input".to_string()),
        "r" | "roll" => Ok(Input::Command(Command::Roll)),
        "q" | "quit" => Ok(Input::Quit),
        other => {
            let lane: usize = other
                .parse()
                .map_err(|_| format!("Unknown command '{}' - type r, 1-{} or q", other, NUM_LANES))?;
            if lane == 0 || lane > NUM_LANES {
                return Err(format!("Lane {} out of range - must be 1-{}", lane, NUM_LANES));
            }
            Ok(Input::Command(Command::Push(lane - 1)))
        }
    }
}

/// Interactive player reading commands from stdin.
///
/// Stdin is read on its own thread so the match loop never blocks on it.
pub struct CliPlayer {
    lines: Option<mpsc::UnboundedReceiver<String>>,
    last_shown: Option<(Lanes, Phase)>,
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliPlayer {
    pub fn new() -> Self {
        Self {
            lines: None,
            last_shown: None,
        }
    }

    fn spawn_reader() -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        rx
    }

    fn show(&mut self, view: &MatchView) {
        let key = (view.lanes, view.phase);
        if self.last_shown == Some(key) {
            return;
        }
        self.last_shown = Some(key);
        println!("{}", ui::render_view(view));
        match view.phase {
            Phase::Rolling(_) => print!("Type r to roll (q to quit): "),
            Phase::Moving(_, face) => {
                print!("You rolled {}. Push which lane (1-{})? ", face, NUM_LANES)
            }
            _ => {}
        }
        let _ = io::stdout().flush();
    }
}

#[async_trait::async_trait]
impl Player for CliPlayer {
    async fn next_command(&mut self, view: &MatchView) -> Option<Command> {
        self.show(view);
        loop {
            let line = self
                .lines
                .get_or_insert_with(Self::spawn_reader)
                .recv()
                .await?;
            match parse_input(&line) {
                Ok(Input::Command(cmd)) => return Some(cmd),
                Ok(Input::Quit) => return None,
                Err(e) => {
                    print!("{}. Try again: ", e);
                    let _ = io::stdout().flush();
                }
            }
        }
    }

    fn handle_status(&mut self, status: &str) {
        println!("{}", status);
        // re-prompt on the next poll
        self.last_shown = None;
    }

    fn handle_outcome(&mut self, outcome: &MatchOutcome) {
        println!("{}", ui::render_outcome(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("r"), Ok(Input::Command(Command::Roll)));
        assert_eq!(parse_input(" ROLL \n"), Ok(Input::Command(Command::Roll)));
        assert_eq!(parse_input("3"), Ok(Input::Command(Command::Push(2))));
        assert_eq!(parse_input("q"), Ok(Input::Quit));
        assert!(parse_input("0").is_err());
        assert!(parse_input("4").is_err());
        assert!(parse_input("push").is_err());
        assert!(parse_input("").is_err());
    }
}
