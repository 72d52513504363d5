//! Actions are the history requests a user can make independently of any stroke, bound to hotkeys
//! or issued directly.

pub mod hotkeys;

#[derive(
    serde::Serialize,
    serde::Deserialize,
    Hash,
    PartialEq,
    Eq,
    strum::AsRefStr,
    strum::EnumIter,
    Clone,
    Copy,
    Debug,
)]
pub enum Action {
    Undo,
    Redo,
    /// Blank the canvas and forget its history.
    Clear,
}
