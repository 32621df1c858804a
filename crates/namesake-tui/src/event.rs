//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,

    // Groups
    Collapse,
    Expand,
    ToggleExpand,

    // Paging
    PrevPage,
    NextPage,

    // Selection
    /// Toggle selection of the member (or whole group) under the cursor.
    ToggleSelect,

    // Operations
    Rename,
    Search,
    ResetSearch,
    ToggleDuplicates,
    Rescan,

    // UI toggles
    ToggleHelp,
    ToggleTheme,

    Cancel,

    // Application
    Quit,
    ForceQuit,

    // No action
    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::ForceQuit,

            (KeyCode::Esc, _) => KeyAction::Cancel,

            // Navigation - vim style
            (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::MoveDown,
            (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::MoveUp,
            (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Collapse,
            (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Expand,

            // Navigation - arrow keys
            (KeyCode::Down, _) => KeyAction::MoveDown,
            (KeyCode::Up, _) => KeyAction::MoveUp,
            (KeyCode::Left, _) => KeyAction::Collapse,
            (KeyCode::Right, _) => KeyAction::Expand,

            // Jump
            (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::JumpToTop,
            (KeyCode::Char('G'), KeyModifiers::SHIFT) => KeyAction::JumpToBottom,
            (KeyCode::Home, _) => KeyAction::JumpToTop,
            (KeyCode::End, _) => KeyAction::JumpToBottom,

            (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::ToggleExpand,
            (KeyCode::Enter, _) => KeyAction::ToggleExpand,

            // Pages
            (KeyCode::Char('['), KeyModifiers::NONE) => KeyAction::PrevPage,
            (KeyCode::Char(']'), KeyModifiers::NONE) => KeyAction::NextPage,
            (KeyCode::PageUp, _) => KeyAction::PrevPage,
            (KeyCode::PageDown, _) => KeyAction::NextPage,

            (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ToggleSelect,

            (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Rename,
            (KeyCode::Char('/'), KeyModifiers::NONE) => KeyAction::Search,
            (KeyCode::Backspace, _) => KeyAction::ResetSearch,
            (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::ToggleDuplicates,

            // Rescan (Shift-R since r is rename)
            (KeyCode::Char('R'), KeyModifiers::SHIFT) => KeyAction::Rescan,

            // UI toggles
            (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::ToggleHelp,
            (KeyCode::Char('?'), KeyModifiers::SHIFT) => KeyAction::ToggleHelp,
            (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::ToggleTheme,

            _ => KeyAction::None,
        }
    }
}

/// A section of key bindings for the help display.
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: Vec<KeyBinding>,
}

/// Key binding for display in help.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Get all key bindings organized by section for help display.
pub fn get_help_sections() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Navigation",
            bindings: vec![
                KeyBinding { keys: "j/k ↑/↓", description: "Move up/down" },
                KeyBinding { keys: "h/l ←/→", description: "Collapse/expand group" },
                KeyBinding { keys: "o/Enter", description: "Toggle group" },
                KeyBinding { keys: "g/G", description: "Jump to top/bottom" },
                KeyBinding { keys: "[/]", description: "Previous/next page" },
            ],
        },
        HelpSection {
            title: "Renaming",
            bindings: vec![
                KeyBinding { keys: "Space", description: "Select member (all on group)" },
                KeyBinding { keys: "r", description: "Rename selected members" },
            ],
        },
        HelpSection {
            title: "Filtering",
            bindings: vec![
                KeyBinding { keys: "/", description: "Search group names" },
                KeyBinding { keys: "Backspace", description: "Clear search" },
                KeyBinding { keys: "d", description: "Toggle duplicates only" },
                KeyBinding { keys: "R", description: "Rescan project" },
            ],
        },
        HelpSection {
            title: "Display",
            bindings: vec![
                KeyBinding { keys: "t", description: "Toggle dark/light theme" },
                KeyBinding { keys: "?", description: "Show this help" },
                KeyBinding { keys: "q", description: "Quit" },
            ],
        },
    ]
}
