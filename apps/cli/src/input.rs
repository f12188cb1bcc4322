use std::sync::Arc;

use async_trait::async_trait;
use chess_client_core::Prompter;
use chess_shared::domain::{Color, PromotionPiece, Square, TimeControl};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, Mutex},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// One board click.
    Click(Square),
    /// Two clicks typed together, e.g. `e2e4`.
    Move(Square, Square),
    New {
        color: Option<Color>,
        time_control: Option<TimeControl>,
    },
    Undo,
    Resign,
    Hint,
    Flip,
    Stats,
    Board,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' is neither a color nor a time control")]
    BadNewGameOption(String),
    #[error("'{command}' takes no arguments")]
    UnexpectedArgument { command: String },
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Unknown(String::new()));
    };
    let rest: Vec<&str> = words.collect();
    let head = head.to_ascii_lowercase();

    if head == "new" {
        return parse_new_game(&rest);
    }

    let command = match head.as_str() {
        "undo" | "u" => Command::Undo,
        "resign" => Command::Resign,
        "hint" | "h" => Command::Hint,
        "flip" => Command::Flip,
        "stats" => Command::Stats,
        "board" | "b" => Command::Board,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => parse_squares(other).ok_or_else(|| CommandError::Unknown(other.to_string()))?,
    };

    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::UnexpectedArgument { command: head })
    }
}

fn parse_squares(word: &str) -> Option<Command> {
    if !word.is_ascii() {
        return None;
    }
    match word.len() {
        2 => Square::from_notation(word).ok().map(Command::Click),
        4 => {
            let from = Square::from_notation(&word[..2]).ok()?;
            let to = Square::from_notation(&word[2..]).ok()?;
            Some(Command::Move(from, to))
        }
        _ => None,
    }
}

fn parse_new_game(options: &[&str]) -> Result<Command, CommandError> {
    let mut color = None;
    let mut time_control = None;
    for option in options {
        if let Ok(parsed) = option.parse::<Color>() {
            color = Some(parsed);
        } else if let Ok(parsed) = option.parse::<TimeControl>() {
            time_control = Some(parsed);
        } else {
            return Err(CommandError::BadNewGameOption(option.to_string()));
        }
    }
    Ok(Command::New {
        color,
        time_control,
    })
}

pub fn parse_promotion(answer: &str) -> Option<PromotionPiece> {
    let answer = answer.trim();
    PromotionPiece::ALL
        .into_iter()
        .find(|piece| piece.name().eq_ignore_ascii_case(answer))
        .or_else(|| {
            let mut chars = answer.chars();
            match (chars.next(), chars.next()) {
                (Some(code), None) => PromotionPiece::from_code(code),
                _ => None,
            }
        })
}

pub fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Shared line source for the command loop and modal prompts.
#[derive(Clone)]
pub struct LineQueue {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl LineQueue {
    pub fn new(rx: mpsc::Receiver<String>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        Self::new(rx)
    }

    /// `None` once input is closed.
    pub async fn next_line(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }
}

pub struct StdinPrompter {
    lines: LineQueue,
}

impl StdinPrompter {
    pub fn new(lines: LineQueue) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl Prompter for StdinPrompter {
    async fn choose_promotion(&self) -> Option<PromotionPiece> {
        println!("Promote to [q]ueen, [r]ook, [b]ishop or k[n]ight (empty line cancels):");
        loop {
            let line = self.lines.next_line().await?;
            if line.trim().is_empty() {
                return None;
            }
            match parse_promotion(&line) {
                Some(piece) => return Some(piece),
                None => println!("Pick one of q, r, b, n"),
            }
        }
    }

    async fn confirm(&self, question: &str) -> bool {
        println!("{question} [y/n]");
        match self.lines.next_line().await {
            Some(answer) => parse_confirmation(&answer),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
