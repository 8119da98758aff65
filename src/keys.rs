// src/keys.rs - Selectable keys, typing modes and the zone/finger-count tables
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::zones::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    Enter,
    Tab,
    Escape,
    Delete,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    F(u8),
    Ctrl,
    Alt,
    Shift,
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
    Save,
    Find,
    Replace,
    SelectAll,
    CapsLock,
    NumLock,
    ScrollLock,
    Pause,
    PrintScreen,
    Insert,
    Menu,
    Super,
    Command,
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::F(n) => return write!(f, "f{}", n),
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::Escape => "escape",
            Self::Delete => "delete",
            Self::Home => "home",
            Self::End => "end",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::PageUp => "pageup",
            Self::PageDown => "pagedown",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::Cut => "cut",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Save => "save",
            Self::Find => "find",
            Self::Replace => "replace",
            Self::SelectAll => "select-all",
            Self::CapsLock => "capslock",
            Self::NumLock => "numlock",
            Self::ScrollLock => "scrolllock",
            Self::Pause => "pause",
            Self::PrintScreen => "printscreen",
            Self::Insert => "insert",
            Self::Menu => "menu",
            Self::Super => "super",
            Self::Command => "command",
        };
        f.write_str(name)
    }
}

/// Something the user can select: a character or a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Space,
    Backspace,
    Action(ActionKey),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::Space => f.write_str("space"),
            Self::Backspace => f.write_str("backspace"),
            Self::Action(action) => write!(f, "{}", action),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingMode {
    #[default]
    Letters,
    Numbers,
    Symbols,
    Actions,
}

impl TypingMode {
    /// Letters -> Numbers -> Symbols -> Actions -> Letters.
    pub fn next(&self) -> Self {
        match self {
            Self::Letters => Self::Numbers,
            Self::Numbers => Self::Symbols,
            Self::Symbols => Self::Actions,
            Self::Actions => Self::Letters,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letters => "letters",
            Self::Numbers => "numbers",
            Self::Symbols => "symbols",
            Self::Actions => "actions",
        }
    }
}

// Rows are finger counts 1-5, columns are zones 0-8.
const LETTERS: [[char; Zone::COUNT]; 5] = [
    ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i'],
    ['j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r'],
    ['s', 't', 'u', 'v', 'w', 'x', 'y', 'z', '.'],
    ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I'],
    ['J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R'],
];

const NUMBERS: [[char; Zone::COUNT]; 5] = [
    ['1', '2', '3', '4', '5', '6', '7', '8', '9'],
    ['0', '+', '-', '*', '/', '=', '(', ')', '%'],
    ['!', '@', '#', '$', '&', '?', ',', ';', ':'],
    ['<', '>', '[', ']', '{', '}', '|', '\\', '"'],
    ['~', '`', '^', '_', '\'', '.', ',', '!', '?'],
];

const SYMBOLS: [[char; Zone::COUNT]; 5] = [
    ['!', '@', '#', '$', '%', '^', '&', '*', '?'],
    ['(', ')', '[', ']', '{', '}', '<', '>', '|'],
    ['+', '-', '*', '/', '=', '_', '~', '`', '\\'],
    ['\'', '"', ',', '.', ':', ';', '?', '!', '-'],
    ['#', '$', '%', '&', '@', '^', '~', '`', '_'],
];

const ACTIONS: [[ActionKey; Zone::COUNT]; 5] = {
    use ActionKey::*;
    [
        [Enter, Tab, Escape, Delete, Home, End, Up, Down, Left],
        [Right, PageUp, PageDown, F(1), F(2), F(3), F(4), F(5), F(6)],
        [F(7), F(8), F(9), F(10), F(11), F(12), Ctrl, Alt, Shift],
        [Copy, Paste, Cut, Undo, Redo, Save, Find, Replace, SelectAll],
        [CapsLock, NumLock, ScrollLock, Pause, PrintScreen, Insert, Menu, Super, Command],
    ]
};

/// Key for a stable (zone, finger count) pair in the given mode.
///
/// A fist is always Space and an open hand in the top row is always
/// Backspace; everything else comes from the mode's table.
pub fn key_for(mode: TypingMode, finger_count: u8, zone: Zone) -> Option<Key> {
    if finger_count == 0 {
        return Some(Key::Space);
    }
    if finger_count == 5 && zone.is_top_row() {
        return Some(Key::Backspace);
    }

    let row = usize::from(finger_count).checked_sub(1).filter(|r| *r < 5)?;
    let col = zone.index();
    let key = match mode {
        TypingMode::Letters => Key::Char(LETTERS[row][col]),
        TypingMode::Numbers => Key::Char(NUMBERS[row][col]),
        TypingMode::Symbols => Key::Char(SYMBOLS[row][col]),
        TypingMode::Actions => Key::Action(ACTIONS[row][col]),
    };
    Some(key)
}
