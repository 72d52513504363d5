#![warn(clippy::pedantic)]

pub mod actions;
pub mod brush;
pub mod export;
pub mod global;
pub mod input;
pub mod script;

use anyhow::Result as AnyResult;
use sketchpad_core::{
    canvas::{Availability, Canvas},
    raster::{Dimensions, PixelBuffer},
};

/// Replay one session script on a fresh canvas built from the user's settings.
fn replay_path(
    path: &std::path::Path,
    settings: &global::settings::Settings,
    keys: &actions::hotkeys::KeysToActions,
) -> AnyResult<Availability> {
    let events = script::read_path(path)?;
    let dimensions = Dimensions::new(settings.canvas.width, settings.canvas.height)?;
    let surface = PixelBuffer::new(dimensions, settings.canvas.background);
    let canvas = Canvas::new(surface, settings.history.capacity());

    let mut session = input::Session::new(canvas, (&settings.brush).into(), keys);
    session.replay(events)?;
    if session.canvas().is_drawing() {
        log::warn!("{path:?} ended mid-stroke, the stroke was not recorded");
    }
    Ok(session.canvas().availability())
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let settings = global::settings::Settings::get();
    let hotkeys = global::hotkeys::Hotkeys::get();
    if let Err(e) = settings.save_if_absent() {
        log::warn!("Failed to save settings:\n{e:?}");
    }
    // Don't clobber a user's file that merely failed to parse.
    let hotkeys_absent = global::preferences_file(global::hotkeys::Hotkeys::FILENAME)
        .is_some_and(|path| !path.exists());
    if hotkeys_absent {
        if let Err(e) = hotkeys.save() {
            log::warn!("Failed to save hotkey config:\n{e:?}");
        }
    } else if hotkeys.did_fail_to_load() {
        log::warn!("Hotkey config could not be loaded, using defaults.");
    }

    // Args are a simple list of session scripts, each replayed on its own canvas.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        log::info!("No session scripts given, nothing to do.");
        return Ok(());
    }
    let results: Vec<AnyResult<Availability>> = {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        paths
            .par_iter()
            .map(|path| replay_path(path, settings, &hotkeys.keys_to_actions))
            .collect()
    };

    let mut had_success = false;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(Availability { can_undo, can_redo }) => {
                had_success = true;
                println!("{}: can undo: {can_undo}, can redo: {can_redo}", path.display());
            }
            Err(e) => log::error!("failed to replay {path:?}: {e:#}"),
        }
    }
    // False if every script failed.
    if !had_success {
        log::warn!("Failed to replay any provided session.");
    }
    Ok(())
}
