//! Terminal input: the prompt line and the deadline-bounded read used by the
//! brace mechanic.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

/// Prints a prompt and reads one line from stdin. Returns None on EOF.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Outcome of a deadline-bounded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimedRead {
    /// Enter arrived before the deadline.
    Entered(String),
    /// The deadline passed first; carries whatever was typed by then.
    Expired(String),
}

/// Reads a line with a hard deadline, in raw mode so keys land without
/// buffering. Characters accumulate until Enter; hitting the deadline first
/// ends the read with the partial buffer. Never blocks past the deadline and
/// never retries.
pub fn read_line_timeout(timeout: Duration) -> io::Result<TimedRead> {
    terminal::enable_raw_mode()?;
    let result = collect_until_enter(timeout);
    terminal::disable_raw_mode()?;
    result
}

fn collect_until_enter(timeout: Duration) -> io::Result<TimedRead> {
    let deadline = Instant::now() + timeout;
    let mut buffer = String::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(TimedRead::Expired(buffer));
        }
        if !event::poll(remaining)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if apply_key(&mut buffer, key.code) {
                return Ok(TimedRead::Entered(buffer));
            }
        }
    }
}

/// Feeds one key into the line buffer. Returns true when Enter ends the read.
fn apply_key(buffer: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Enter => true,
        KeyCode::Char(c) => {
            buffer.push(c);
            false
        }
        KeyCode::Backspace => {
            buffer.pop();
            false
        }
        _ => false,
    }
}
