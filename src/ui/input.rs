/// Keyboard handling and the entry line.
///
/// Two modes:
///   - Purge: every printable key clears words starting with that letter
///   - Entry: keys edit a one-line text field; Enter submits it
///
/// Enter or '/' switches Purge → Entry, Esc switches back. Esc in Purge
/// mode quits; Ctrl+C quits from either mode.
///
/// Events are drained once per frame without blocking and turned into
/// `Action`s for the frame loop. Release events are ignored, so keyboard
/// enhancement is never needed.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_input::{Input, InputRequest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Purge,
    Entry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Text from the entry line, already trimmed and non-empty.
    Submit(String),
    /// Remove words beginning with this letter.
    Purge(char),
    Resize(u16, u16),
    Quit,
}

pub struct InputState {
    pub mode: Mode,
    line: Input,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            mode: Mode::Purge,
            line: Input::default(),
        }
    }

    /// Current entry line text and cursor (in chars), if it has focus.
    pub fn entry(&self) -> Option<(&str, usize)> {
        match self.mode {
            Mode::Entry => Some((self.line.value(), self.line.cursor())),
            Mode::Purge => None,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) -> std::io::Result<Vec<Action>> {
        let mut actions = Vec::new();
        while poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key(key) {
                        actions.push(action);
                    }
                }
                Event::Resize(w, h) => actions.push(Action::Resize(w, h)),
                _ => {}
            }
        }
        Ok(actions)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Some(Action::Quit);
        }

        match self.mode {
            Mode::Purge => self.handle_purge(key),
            Mode::Entry => self.handle_entry(key),
        }
    }

    // ── Internal ──

    fn handle_purge(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter | KeyCode::Char('/') => {
                self.mode = Mode::Entry;
                None
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    && !c.is_control()
                    && !c.is_whitespace() =>
            {
                Some(Action::Purge(c))
            }
            _ => None,
        }
    }

    fn handle_entry(&mut self, key: KeyEvent) -> Option<Action> {
        let request = match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Purge;
                return None;
            }
            KeyCode::Enter => {
                let text = self.line.value().trim().to_owned();
                self.line.reset();
                return if text.is_empty() { None } else { Some(Action::Submit(text)) };
            }
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                InputRequest::InsertChar(c)
            }
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return None,
        };
        self.line.handle(request);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut InputState, s: &str) {
        for c in s.chars() {
            assert_eq!(input.handle_key(press(KeyCode::Char(c))), None);
        }
    }

    #[test]
    fn letters_purge_in_purge_mode() {
        let mut input = InputState::new();
        assert_eq!(input.handle_key(press(KeyCode::Char('h'))), Some(Action::Purge('h')));
        assert_eq!(input.handle_key(press(KeyCode::Char(' '))), None);
        assert_eq!(input.entry(), None);
    }

    #[test]
    fn enter_opens_entry_and_submits_trimmed() {
        let mut input = InputState::new();
        assert_eq!(input.handle_key(press(KeyCode::Enter)), None);
        assert_eq!(input.mode, Mode::Entry);

        type_str(&mut input, "  Hello World ");
        assert_eq!(input.entry(), Some(("  Hello World ", 14)));
        assert_eq!(
            input.handle_key(press(KeyCode::Enter)),
            Some(Action::Submit("Hello World".into()))
        );
        // line is cleared, focus stays
        assert_eq!(input.entry(), Some(("", 0)));
    }

    #[test]
    fn blank_entry_submits_nothing() {
        let mut input = InputState::new();
        input.handle_key(press(KeyCode::Char('/')));
        type_str(&mut input, "   ");
        assert_eq!(input.handle_key(press(KeyCode::Enter)), None);
    }

    #[test]
    fn editing_keys() {
        let mut input = InputState::new();
        input.handle_key(press(KeyCode::Enter));
        type_str(&mut input, "abd");
        input.handle_key(press(KeyCode::Left));
        type_str(&mut input, "c");
        assert_eq!(input.entry(), Some(("abcd", 3)));
        input.handle_key(press(KeyCode::Backspace));
        input.handle_key(press(KeyCode::Home));
        input.handle_key(press(KeyCode::Delete));
        assert_eq!(input.entry(), Some(("bd", 0)));
    }

    #[test]
    fn esc_leaves_entry_then_quits() {
        let mut input = InputState::new();
        input.handle_key(press(KeyCode::Enter));
        assert_eq!(input.handle_key(press(KeyCode::Esc)), None);
        assert_eq!(input.mode, Mode::Purge);
        assert_eq!(input.handle_key(press(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut input = InputState::new();
        assert_eq!(input.handle_key(ctrl_c), Some(Action::Quit));
        input.handle_key(press(KeyCode::Enter));
        assert_eq!(input.handle_key(ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut input = InputState::new();
        let mut key = press(KeyCode::Char('x'));
        key.kind = KeyEventKind::Release;
        assert_eq!(input.handle_key(key), None);
    }
}
