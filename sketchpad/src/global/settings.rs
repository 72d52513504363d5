use sketchpad_core::{color::Rgba8, history::Capacity};

const DOCUMENTATION: &str = r"# Sketchpad settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Colors are written #rrggbb or #rrggbbaa.

# [history]
# capacity: the most strokes that can be undone. Older strokes are forgotten for good once it is
#   exceeded. Leave out (or 0) for no limit - every stroke keeps a full copy of the canvas in memory!

";

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub history: HistorySettings,
    pub canvas: CanvasSettings,
    pub brush: BrushSettings,
}
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct HistorySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}
impl HistorySettings {
    #[must_use]
    pub fn capacity(&self) -> Capacity {
        Capacity::from_limit(self.capacity)
    }
}
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    #[serde(with = "hex_color")]
    pub background: Rgba8,
}
impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgba8::WHITE,
        }
    }
}
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrushSettings {
    /// Diameter in pixels.
    pub width: f32,
    #[serde(with = "hex_color")]
    pub color: Rgba8,
}
impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            width: 4.0,
            color: Rgba8::BLACK,
        }
    }
}

mod hex_color {
    use sketchpad_core::color::Rgba8;
    pub fn serialize<S>(color: &Rgba8, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&color.to_string())
    }
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Rgba8, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let str =
            <std::borrow::Cow<'de, str> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        str.parse().map_err(serde::de::Error::custom)
    }
}

impl Settings {
    pub const FILENAME: &'static str = "settings.toml";
    /// Shared global settings, loaded from user preferences, or defaulted.
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_SETTINGS: std::sync::OnceLock<Settings> = std::sync::OnceLock::new();

        GLOBAL_SETTINGS.get_or_init(|| match super::preferences_file(Self::FILENAME) {
            None => {
                log::warn!("Settings weren't available, defaulting.");
                Self::default()
            }
            Some(path) => Self::load_or_default(&path),
        })
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let settings: Self = toml::from_str(&string)?;
            Ok(settings)
        };
        match settings {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings from {path:?}, defaulting: {e:#}");
                Self::default()
            }
        }
    }
    /// Serialize, prefixed with documentation.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?)
    }
    /// Write to the preferences dir, unless a file is already there.
    pub fn save_if_absent(&self) -> anyhow::Result<()> {
        let path = super::preferences_file(Self::FILENAME)
            .ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        if path.exists() {
            return Ok(());
        }
        super::create_preferences_dir(&path);
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
