//! Global singletons: user preferences loaded once per process.

pub mod hotkeys;
pub mod settings;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// Path of a file within the preferences dir.
#[must_use]
pub fn preferences_file(name: &str) -> Option<std::path::PathBuf> {
    let mut path = preferences_dir()?;
    path.push(name);
    Some(path)
}

/// Make the parent dir of a preferences file.
fn create_preferences_dir(file: &std::path::Path) {
    // Explicitly do *not* create recursively. If the base is missing, the user probably has a good reason.
    // Errors are ignored (could already exist), any real problem shows up on the following write.
    if let Some(dir) = file.parent() {
        let _ = std::fs::DirBuilder::new().create(dir);
    }
}
