//! Interactive questions on stdin

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};

use crate::error::{AppError, AppResult};

pub struct Prompt {
    reader: BufReader<Stdin>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }

    /// Print `question` and read one trimmed line
    pub async fn ask(&mut self, question: &str) -> AppResult<String> {
        write_question(question).await?;
        self.read_line().await
    }

    /// Like [`Prompt::ask`], without echoing what is typed on a terminal
    pub async fn ask_hidden(&mut self, question: &str) -> AppResult<String> {
        write_question(question).await?;
        if !std::io::stdin().is_terminal() {
            return self.read_line().await;
        }
        tokio::task::spawn_blocking(read_hidden)
            .await
            .map_err(|e| AppError::Internal(format!("Password reader stopped: {}", e)))?
    }

    /// Yes/no question, defaulting to no
    pub async fn confirm(&mut self, question: &str) -> AppResult<bool> {
        let answer = self.ask(&format!("{} [y/N]", question)).await?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    async fn read_line(&mut self) -> AppResult<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(AppError::Validation("No answer given".to_string()));
        }
        Ok(line.trim().to_string())
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}

async fn write_question(question: &str) -> AppResult<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{} ", question).as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum KeyStep {
    Continue,
    Done,
    Cancelled,
}

/// Apply one key press to the hidden answer typed so far
fn apply_key(buffer: &mut String, key: KeyEvent) -> KeyStep {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return KeyStep::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyStep::Done,
        KeyCode::Esc => KeyStep::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyStep::Cancelled,
        KeyCode::Backspace => {
            buffer.pop();
            KeyStep::Continue
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            KeyStep::Continue
        }
        _ => KeyStep::Continue,
    }
}

/// Raw mode keeps the terminal from echoing; it is restored before returning
fn read_hidden() -> AppResult<String> {
    terminal::enable_raw_mode()?;
    let answer = read_keys();
    terminal::disable_raw_mode()?;
    println!();
    answer
}

fn read_keys() -> AppResult<String> {
    let mut buffer = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            match apply_key(&mut buffer, key) {
                KeyStep::Continue => {}
                KeyStep::Done => return Ok(buffer.trim().to_string()),
                KeyStep::Cancelled => return Err(AppError::Validation("Password entry cancelled".to_string())),
            }
        }
    }
}
