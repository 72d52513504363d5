//! Keyboard chords bound to [`Action`](super::Action)s.
//!
//! An action can have many hotkeys, and a hotkey can trigger at most one action. For editing by hand
//! the one-to-many map of actions to keys is nicer, so that is what's stored on disk, and the reverse
//! map is built from it when loaded.

use std::sync::Arc;
mod defaults;

/// A key pressed with some set of modifiers.
#[derive(Hash, PartialEq, Eq, Clone, Debug, Copy)]
pub struct KeyboardHotkey {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Uppercase ASCII letter or digit.
    pub key: char,
}
impl serde::Serialize for KeyboardHotkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Written as a string so the file stays human editable.
        serializer.serialize_str(&self.to_string())
    }
}
impl<'de> serde::Deserialize<'de> for KeyboardHotkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let str =
            <std::borrow::Cow<'de, str> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        str.parse().map_err(serde::de::Error::custom)
    }
}
impl KeyboardHotkey {
    /// Key with no modifiers.
    #[must_use]
    pub const fn bare(key: char) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            key,
        }
    }
    #[must_use]
    pub const fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            ..Self::bare(key)
        }
    }
    #[must_use]
    pub const fn ctrl_shift(key: char) -> Self {
        Self {
            shift: true,
            ..Self::ctrl(key)
        }
    }
}
impl std::fmt::Display for KeyboardHotkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut key_buf = [0; 4];
        let mut components = smallvec::SmallVec::<[&str; 4]>::new();
        if self.ctrl {
            components.push("ctrl");
        }
        if self.alt {
            components.push("alt");
        }
        if self.shift {
            components.push("shift");
        }
        components.push(self.key.encode_utf8(&mut key_buf));
        f.write_str(&components.join("+"))
    }
}
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyboardHotkeyFromStrError {
    #[error("expected a single letter or digit key")]
    InvalidKeyName,
}
/// Parse from syntax `[ctrl+][alt+][shift+]<key>`. Modifiers are case-sensitive,
/// the key is not.
impl std::str::FromStr for KeyboardHotkey {
    type Err = KeyboardHotkeyFromStrError;
    fn from_str(mut str: &str) -> Result<Self, Self::Err> {
        let mut take_if_has = |prefix: &str| -> bool {
            if let Some(new_str) = str.strip_prefix(prefix) {
                str = new_str;
                true
            } else {
                false
            }
        };
        let ctrl = take_if_has("ctrl+");
        let alt = take_if_has("alt+");
        let shift = take_if_has("shift+");
        // Only the key remains.
        let mut chars = str.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(key), None) if key.is_ascii_alphanumeric() => key.to_ascii_uppercase(),
            _ => return Err(KeyboardHotkeyFromStrError::InvalidKeyName),
        };

        Ok(Self {
            ctrl,
            alt,
            shift,
            key,
        })
    }
}

/// Maps each action onto potentially many hotkeys.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ActionsToKeys(hashbrown::HashMap<super::Action, HotkeyCollection>);
/// Hotkeys of one action. Contained as an Arc'd slice, as it is not intended to change frequently.
#[derive(serde::Serialize, serde::Deserialize, Clone, Default)]
pub struct HotkeyCollection {
    pub keyboard: Option<Arc<[KeyboardHotkey]>>,
}
impl HotkeyCollection {
    pub fn iter(&self) -> impl Iterator<Item = KeyboardHotkey> + '_ {
        self.keyboard.iter().flat_map(|keys| keys.iter().copied())
    }
}
impl Default for ActionsToKeys {
    fn default() -> Self {
        let mut keys_map = hashbrown::HashMap::with_capacity(defaults::KEYBOARD.len());
        for (action, keys) in defaults::KEYBOARD {
            keys_map.insert(
                *action,
                HotkeyCollection {
                    keyboard: Some((*keys).into()),
                },
            );
        }

        let new = Self(keys_map);
        // The defaults must never bind a key twice.
        debug_assert!(TryInto::<KeysToActions>::try_into(&new).is_ok());
        new
    }
}
impl ActionsToKeys {
    #[must_use]
    pub fn keys_of(&self, action: super::Action) -> Option<&HotkeyCollection> {
        self.0.get(&action)
    }
}

/// Derived from [`ActionsToKeys`], maps each hotkey onto at most one action.
pub struct KeysToActions(hashbrown::HashMap<KeyboardHotkey, super::Action>);
#[derive(thiserror::Error, Debug)]
pub enum KeysToActionsError {
    /// A single key was bound to multiple actions.
    /// Only the first two encountered (in arbitrary order) are reported.
    #[error("hotkey {key} used for more than one action: {actions:?}")]
    DuplicateBinding {
        key: KeyboardHotkey,
        actions: [super::Action; 2],
    },
}
impl TryFrom<&ActionsToKeys> for KeysToActions {
    type Error = KeysToActionsError;
    fn try_from(value: &ActionsToKeys) -> Result<Self, Self::Error> {
        let mut new = KeysToActions(hashbrown::HashMap::default());

        for (action, keys) in &value.0 {
            for key in keys.iter() {
                if let Some(old) = new.0.insert(key, *action) {
                    return Err(KeysToActionsError::DuplicateBinding {
                        key,
                        actions: [*action, old],
                    });
                }
            }
        }

        Ok(new)
    }
}
impl KeysToActions {
    #[must_use]
    pub fn action_of(&self, key: KeyboardHotkey) -> Option<super::Action> {
        self.0.get(&key).copied()
    }
}

#[cfg(test)]
mod test {
    use super::{ActionsToKeys, KeyboardHotkey, KeyboardHotkeyFromStrError, KeysToActions};
    use crate::actions::Action;

    #[test]
    fn parse() {
        assert_eq!(
            "ctrl+shift+z".parse::<KeyboardHotkey>(),
            Ok(KeyboardHotkey::ctrl_shift('Z'))
        );
        assert_eq!(
            "alt+7".parse::<KeyboardHotkey>(),
            Ok(KeyboardHotkey {
                alt: true,
                ..KeyboardHotkey::bare('7')
            })
        );
        // Modifiers must come in order.
        assert_eq!(
            "shift+ctrl+Z".parse::<KeyboardHotkey>(),
            Err(KeyboardHotkeyFromStrError::InvalidKeyName)
        );
        assert_eq!(
            "ctrl+".parse::<KeyboardHotkey>(),
            Err(KeyboardHotkeyFromStrError::InvalidKeyName)
        );
        assert_eq!(
            "ctrl+Space".parse::<KeyboardHotkey>(),
            Err(KeyboardHotkeyFromStrError::InvalidKeyName)
        );
    }
    #[test]
    fn display_parses_back() {
        for key in [
            KeyboardHotkey::bare('A'),
            KeyboardHotkey::ctrl('Y'),
            KeyboardHotkey::ctrl_shift('Z'),
            KeyboardHotkey {
                ctrl: true,
                alt: true,
                shift: true,
                key: '1',
            },
        ] {
            assert_eq!(key.to_string().parse::<KeyboardHotkey>(), Ok(key));
        }
        assert_eq!(KeyboardHotkey::ctrl_shift('Z').to_string(), "ctrl+shift+Z");
    }
    #[test]
    fn defaults() {
        let keys: KeysToActions = (&ActionsToKeys::default()).try_into().unwrap();
        assert_eq!(keys.action_of(KeyboardHotkey::ctrl('Z')), Some(Action::Undo));
        assert_eq!(keys.action_of(KeyboardHotkey::ctrl('Y')), Some(Action::Redo));
        assert_eq!(
            keys.action_of(KeyboardHotkey::ctrl_shift('Z')),
            Some(Action::Redo)
        );
        assert_eq!(
            keys.action_of(KeyboardHotkey::ctrl_shift('X')),
            Some(Action::Clear)
        );
        assert_eq!(keys.action_of(KeyboardHotkey::bare('Z')), None);

        let redo: Vec<_> = ActionsToKeys::default()
            .keys_of(Action::Redo)
            .unwrap()
            .iter()
            .collect();
        assert_eq!(
            redo,
            [KeyboardHotkey::ctrl('Y'), KeyboardHotkey::ctrl_shift('Z')]
        );
    }
    #[test]
    fn duplicate_binding() {
        let toml = r#"
            [Undo]
            keyboard = ["ctrl+Z"]
            [Redo]
            keyboard = ["ctrl+Y", "ctrl+z"]
        "#;
        let actions_to_keys: ActionsToKeys = toml::from_str(toml).unwrap();
        assert!(KeysToActions::try_from(&actions_to_keys).is_err());
    }
    #[test]
    fn toml_round_trip() {
        let string = toml::to_string_pretty(&ActionsToKeys::default()).unwrap();
        let back: ActionsToKeys = toml::from_str(&string).unwrap();
        let keys: KeysToActions = (&back).try_into().unwrap();
        assert_eq!(keys.action_of(KeyboardHotkey::ctrl('Z')), Some(Action::Undo));
    }
}
