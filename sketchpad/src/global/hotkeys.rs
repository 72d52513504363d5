use crate::actions;

const DOCUMENTATION: &str = r#"# Sketchpad hotkeys. You may edit this file, but be aware that formatting and comments will not
# be preserved. Modifiers are case sensitive, keys are not.

# Each action is specified here in [brackets]. Available actions are listed below.
# Keyboard hotkeys, specified by the "keyboard" field of an action, are written `[ctrl+][alt+][shift+]<key>`,
# where the key is a single letter or digit.
# Each action may have many hotkeys associated with it, but each hotkey should only be used at most once.

# Examples:
# [Undo]
# keyboard = ["ctrl+Z"]
# [Redo]
# keyboard = ["ctrl+Y", "ctrl+shift+Z"]

"#;

pub struct Hotkeys {
    failed_to_load: bool,
    pub actions_to_keys: actions::hotkeys::ActionsToKeys,
    pub keys_to_actions: actions::hotkeys::KeysToActions,
}
impl Hotkeys {
    pub const FILENAME: &'static str = "hotkeys.toml";
    /// Shared global hotkeys, loaded from user preferences.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_HOTKEYS: std::sync::OnceLock<Hotkeys> = std::sync::OnceLock::new();

        GLOBAL_HOTKEYS.get_or_init(|| match super::preferences_file(Self::FILENAME) {
            None => Self::no_path(),
            Some(path) => Self::load_or_default(&path),
        })
    }
    #[must_use]
    pub fn no_path() -> Self {
        use actions::hotkeys::ActionsToKeys;
        log::warn!("Hotkeys weren't available, defaulting.");
        let default = ActionsToKeys::default();
        // Default action map is reversible - checked by the default impl when debugging.
        let reverse = (&default).try_into().unwrap();

        Self {
            failed_to_load: true,
            keys_to_actions: reverse,
            actions_to_keys: default,
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        use actions::hotkeys::{ActionsToKeys, KeysToActions};
        let mappings: anyhow::Result<(ActionsToKeys, KeysToActions)> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let actions_to_keys : ActionsToKeys = toml::from_str(&string)?;
            let keys_to_actions : KeysToActions = (&actions_to_keys).try_into()?;

            Ok((actions_to_keys,keys_to_actions))
        };

        match mappings {
            Ok((actions_to_keys, keys_to_actions)) => Self {
                failed_to_load: false,
                actions_to_keys,
                keys_to_actions,
            },
            Err(e) => {
                log::debug!("Loading {path:?}: {e:#}");
                Self::no_path()
            }
        }
    }
    /// Return true if loading user's hotkeys failed.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// Serialize, prefixed with documentation.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        use strum::IntoEnumIterator;
        let mut string = DOCUMENTATION.to_owned();
        let names: Vec<String> = actions::Action::iter()
            .map(|action| action.as_ref().to_owned())
            .collect();
        string += &format!("# Actions: {}\n\n", names.join(", "));
        string += &toml::ser::to_string_pretty(&self.actions_to_keys)?;
        Ok(string)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let path = super::preferences_file(Self::FILENAME)
            .ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        super::create_preferences_dir(&path);
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
