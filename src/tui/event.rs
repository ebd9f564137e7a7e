//! Event Handling
//!
//! Turns keyboard, paste and timer events into application actions.

use crate::ingest::UploadMode;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Quit immediately (Ctrl+C)
    ForceQuit,
    /// Enter: run search / confirm
    Submit,
    /// Toggle the help overlay
    ToggleHelp,
    /// Switch between the search and upload views
    SwitchView,
    /// Close overlays
    Escape,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    /// Tab
    NextField,
    /// Shift+Tab
    PrevField,
    /// F5 / F6 / F7
    SelectUploadMode(UploadMode),
    /// Ctrl+L
    ValidateJson,
    /// Ctrl+S
    SubmitUpload,
    /// Ctrl+N
    AddEntry,
    /// Ctrl+D
    RemoveEntry,
    /// Ctrl+R
    RefreshHealth,
    /// Bracketed paste
    Paste(String),
    /// Any other key, routed to the focused input
    Input(KeyEvent),
    /// Timer tick
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = Self::map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }

    /// Map a crossterm event to an app action
    pub fn map_event(event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::map_key_event(key),
            Event::Paste(text) => Some(AppAction::Paste(text)),
            _ => None,
        }
    }

    /// Map a key event to an app action
    pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(AppAction::ValidateJson),
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(AppAction::SubmitUpload),
            (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(AppAction::AddEntry),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(AppAction::RemoveEntry),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(AppAction::RefreshHealth),

            (_, KeyCode::BackTab) => Some(AppAction::PrevField),

            (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => Some(AppAction::Escape),
                KeyCode::Enter => Some(AppAction::Submit),
                KeyCode::Tab => Some(AppAction::NextField),

                KeyCode::F(1) => Some(AppAction::ToggleHelp),
                KeyCode::F(2) => Some(AppAction::SwitchView),
                KeyCode::F(5) => Some(AppAction::SelectUploadMode(UploadMode::Json)),
                KeyCode::F(6) => Some(AppAction::SelectUploadMode(UploadMode::Form)),
                KeyCode::F(7) => Some(AppAction::SelectUploadMode(UploadMode::Excel)),

                KeyCode::Up => Some(AppAction::ScrollUp),
                KeyCode::Down => Some(AppAction::ScrollDown),
                KeyCode::PageUp => Some(AppAction::ScrollPageUp),
                KeyCode::PageDown => Some(AppAction::ScrollPageDown),

                // Characters, Backspace, Left/Right, Home/End...
                _ => Some(AppAction::Input(key)),
            },

            _ => Some(AppAction::Input(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(AppAction::ForceQuit)
        );
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('s'))),
            Some(AppAction::SubmitUpload)
        );
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('l'))),
            Some(AppAction::ValidateJson)
        );
    }

    #[test]
    fn test_function_keys_select_modes() {
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::NONE, KeyCode::F(6))),
            Some(AppAction::SelectUploadMode(UploadMode::Form))
        );
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::NONE, KeyCode::F(2))),
            Some(AppAction::SwitchView)
        );
    }

    #[test]
    fn test_plain_and_shifted_characters_are_input() {
        let lower = key(KeyModifiers::NONE, KeyCode::Char('e'));
        assert_eq!(EventHandler::map_key_event(lower), Some(AppAction::Input(lower)));

        let upper = key(KeyModifiers::SHIFT, KeyCode::Char('E'));
        assert_eq!(EventHandler::map_key_event(upper), Some(AppAction::Input(upper)));
    }

    #[test]
    fn test_back_tab_with_shift() {
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::SHIFT, KeyCode::BackTab)),
            Some(AppAction::PrevField)
        );
    }

    #[test]
    fn test_paste_and_release() {
        assert_eq!(
            EventHandler::map_event(Event::Paste("[1]".into())),
            Some(AppAction::Paste("[1]".into()))
        );

        let mut release = key(KeyModifiers::NONE, KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;
        assert_eq!(EventHandler::map_event(Event::Key(release)), None);
    }
}
