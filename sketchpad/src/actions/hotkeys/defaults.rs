use super::super::Action;
use super::KeyboardHotkey;

pub const KEYBOARD: &[(Action, &[KeyboardHotkey])] = &[
    (Action::Undo, &[KeyboardHotkey::ctrl('Z')]),
    (
        Action::Redo,
        &[KeyboardHotkey::ctrl('Y'), KeyboardHotkey::ctrl_shift('Z')],
    ),
    (Action::Clear, &[KeyboardHotkey::ctrl_shift('X')]),
];
