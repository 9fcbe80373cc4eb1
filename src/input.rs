use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::game::Command;

/// What a terminal event means to the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Game(Command),
    Resize(u16, u16),
    Quit,
}

pub fn translate(event: &Event) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..
        }) => Some(Input::Game(Command::Flap)),
        Event::Resize(cols, rows) => Some(Input::Resize(*cols, *rows)),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<Input> {
    // Terminals with key release reporting would otherwise flap twice.
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Input::Game(Command::Flap)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Input::Game(Command::Restart)),
        _ => None,
    }
}
