//! Core of the sketchpad: raster snapshots, the stroke history that moves them between
//! undo and redo, and the canvas that keeps a surface in step with its history.
#![warn(clippy::pedantic)]

pub mod canvas;
pub mod color;
pub mod history;
pub mod id;
pub mod raster;

pub use id::SequenceID;
