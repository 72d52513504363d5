//! # Session scripts
//!
//! A line based recording of input, replayed in place of live device events. One event per line,
//! blank lines ignored. A `#` starting a line, or standing alone as a word, begins a comment.
//! Elsewhere it is literal, as in `color #ff0000`:
//!
//! ```text
//! down <x> <y>      press at a point, starting a stroke
//! move <x> <y>      drag to a point
//! up                release, completing the stroke
//! cancel            abandon the stroke in progress
//! undo | redo | clear
//! key <hotkey>      e.g. `key ctrl+Z`, looked up in the hotkey map
//! size <px>         brush diameter
//! color <#hex>      brush color
//! resize <w> <h>    resize the canvas, discarding history
//! export <path>     write the canvas to a PNG
//! ```

use crate::actions::{hotkeys::KeyboardHotkey, Action};
use sketchpad_core::color::Rgba8;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Down([f32; 2]),
    Move([f32; 2]),
    Up,
    Cancel,
    Action(Action),
    Key(KeyboardHotkey),
    BrushWidth(f32),
    BrushColor(Rgba8),
    Resize { width: u32, height: u32 },
    Export(std::path::PathBuf),
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    /// One-based.
    pub line: usize,
    pub kind: ScriptErrorKind,
}
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScriptErrorKind {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("expected {expected} argument(s), found {found}")]
    ArgumentCount { expected: usize, found: usize },
    #[error("invalid number {0:?}")]
    BadNumber(String),
    #[error(transparent)]
    BadColor(#[from] sketchpad_core::color::ColorParseError),
    #[error(transparent)]
    BadHotkey(#[from] crate::actions::hotkeys::KeyboardHotkeyFromStrError),
}

/// Parse a whole script. Stops at the first bad line.
pub fn parse(source: &str) -> Result<Vec<Event>, ScriptError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_line(line)
                .map_err(|kind| ScriptError {
                    line: idx + 1,
                    kind,
                })
                .transpose()
        })
        .collect()
}

/// Read and parse a script file.
pub fn read_path(path: &std::path::Path) -> anyhow::Result<Vec<Event>> {
    use anyhow::Context;
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    Ok(parse(&source)?)
}

/// Parse one line. `Ok(None)` for blanks and comments.
pub fn parse_line(line: &str) -> Result<Option<Event>, ScriptErrorKind> {
    let line = strip_comment(line);
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: smallvec::SmallVec<[&str; 2]> = words.collect();
    let arity = |expected: usize| -> Result<(), ScriptErrorKind> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ScriptErrorKind::ArgumentCount {
                expected,
                found: args.len(),
            })
        }
    };

    let event = match command {
        "down" => {
            arity(2)?;
            Event::Down(point(&args)?)
        }
        "move" => {
            arity(2)?;
            Event::Move(point(&args)?)
        }
        "up" => {
            arity(0)?;
            Event::Up
        }
        "cancel" => {
            arity(0)?;
            Event::Cancel
        }
        "undo" | "redo" | "clear" => {
            arity(0)?;
            Event::Action(match command {
                "undo" => Action::Undo,
                "redo" => Action::Redo,
                _ => Action::Clear,
            })
        }
        "key" => {
            arity(1)?;
            Event::Key(args[0].parse()?)
        }
        "size" => {
            arity(1)?;
            Event::BrushWidth(number(args[0])?)
        }
        "color" => {
            arity(1)?;
            Event::BrushColor(args[0].parse()?)
        }
        "resize" => {
            arity(2)?;
            Event::Resize {
                width: number(args[0])?,
                height: number(args[1])?,
            }
        }
        "export" => {
            // Paths may contain spaces, take the rest of the line verbatim.
            let path = line.trim_start().strip_prefix("export").unwrap_or_default().trim();
            if path.is_empty() {
                return Err(ScriptErrorKind::ArgumentCount {
                    expected: 1,
                    found: 0,
                });
            }
            Event::Export(path.into())
        }
        other => return Err(ScriptErrorKind::UnknownCommand(other.to_owned())),
    };
    Ok(Some(event))
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    let bytes = line.as_bytes();
    line.match_indices('#')
        .find(|&(idx, _)| {
            let after_space = idx > 0 && bytes[idx - 1].is_ascii_whitespace();
            let before_space = bytes.get(idx + 1).map_or(true, u8::is_ascii_whitespace);
            after_space && before_space
        })
        .map_or(line, |(idx, _)| &line[..idx])
}
fn number<T: std::str::FromStr>(word: &str) -> Result<T, ScriptErrorKind> {
    word.parse().map_err(|_| ScriptErrorKind::BadNumber(word.to_owned()))
}
fn point(args: &[&str]) -> Result<[f32; 2], ScriptErrorKind> {
    let point = [number::<f32>(args[0])?, number::<f32>(args[1])?];
    if point.iter().all(|v| v.is_finite()) {
        Ok(point)
    } else {
        Err(ScriptErrorKind::BadNumber(args.join(" ")))
    }
}
