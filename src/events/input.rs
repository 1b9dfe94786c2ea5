use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Tab,

    // Playback
    PlayPause,
    NextItem,
    PrevItem,
    Skip,

    // Selection
    OpenBrowser,
    EditSkip,

    // UI
    Help,
    Quit,

    // Text entry
    Backspace,
    Char(char),

    // Mouse actions
    MouseClick { x: u16, y: u16 },
    MouseScrollUp { x: u16, y: u16 },
    MouseScrollDown { x: u16, y: u16 },

    None,
}

impl Action {
    pub fn from_key_event(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

            // Navigation
            (KeyCode::Up | KeyCode::Char('k'), KeyModifiers::NONE) => Action::Up,
            (KeyCode::Down | KeyCode::Char('j'), KeyModifiers::NONE) => Action::Down,
            (KeyCode::Left | KeyCode::Char('h'), KeyModifiers::NONE) => Action::Left,
            (KeyCode::Right, KeyModifiers::NONE) => Action::Right,
            (KeyCode::Tab, KeyModifiers::NONE) => Action::Tab,
            (KeyCode::Enter, _) => Action::Enter,
            (KeyCode::Esc, _) => Action::Escape,

            // Playback
            (KeyCode::Char(' '), KeyModifiers::NONE) => Action::PlayPause,
            (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NextItem,
            (KeyCode::Char('p'), KeyModifiers::NONE) => Action::PrevItem,
            (KeyCode::Char('s'), KeyModifiers::NONE) => Action::Skip,

            (KeyCode::Char('o'), KeyModifiers::NONE) => Action::OpenBrowser,
            (KeyCode::Char('e'), KeyModifiers::NONE) => Action::EditSkip,
            (KeyCode::Char('?'), _) => Action::Help,

            (KeyCode::Backspace, _) => Action::Backspace,
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::Char(c),

            _ => Action::None,
        }
    }

    /// Mapping used while a text field has focus: every printable key is text.
    pub fn from_text_key(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            (KeyCode::Enter, _) => Action::Enter,
            (KeyCode::Esc, _) => Action::Escape,
            (KeyCode::Backspace, _) => Action::Backspace,
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::Char(c),
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn player_keys() {
        assert_eq!(Action::from_key_event(key(KeyCode::Char('n'))), Action::NextItem);
        assert_eq!(Action::from_key_event(key(KeyCode::Char('p'))), Action::PrevItem);
        assert_eq!(Action::from_key_event(key(KeyCode::Char('s'))), Action::Skip);
        assert_eq!(Action::from_key_event(key(KeyCode::Char(' '))), Action::PlayPause);
        assert_eq!(Action::from_key_event(key(KeyCode::Char('j'))), Action::Down);
        assert_eq!(Action::from_key_event(key(KeyCode::Char('l'))), Action::Char('l'));
    }

    #[test]
    fn text_entry_swallows_shortcuts() {
        assert_eq!(Action::from_text_key(key(KeyCode::Char('q'))), Action::Char('q'));
        assert_eq!(Action::from_text_key(key(KeyCode::Char('5'))), Action::Char('5'));
        assert_eq!(
            Action::from_text_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }
}
