use crate::sim::Button;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Press(Button),
    Quit,
}

/// Maps a key to a panel button. Keys are named after the Pico Unicorn buttons.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    // Holding a key must not spam the button; only fresh presses count.
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::Press(Button::Spawn)),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::Press(Button::Despawn)),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Command::Press(Button::SlowDown)),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::Press(Button::SpeedUp)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Drains pending key presses without blocking the tick.
pub fn poll_commands() -> anyhow::Result<Vec<Command>> {
    let mut out = Vec::new();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(k) = event::read()? {
            if let Some(cmd) = map_key(k) {
                out.push(cmd);
            }
            if out.len() >= 32 {
                break;
            }
        }
    }
    Ok(out)
}
