//! Caption text color.

use palette::Srgb;
use serde::{Deserialize, Serialize};

/// The user's chosen caption color, as entered (hex or CSS color name).
///
/// The raw string is what gets persisted; [`TextColor::resolve`] turns it
/// into RGB at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TextColor(String);

impl TextColor {
    pub const WHITE: &'static str = "#FFFFFF";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses `#rgb`, `#rrggbb` or a CSS color name.
    pub fn parse(&self) -> Option<Srgb<u8>> {
        let value = self.0.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return hex.parse::<Srgb<u8>>().ok();
        }
        palette::named::from_str(&value.to_ascii_lowercase())
    }

    /// Like [`parse`](Self::parse), falling back to white.
    pub fn resolve(&self) -> Srgb<u8> {
        self.parse().unwrap_or_else(|| {
            tracing::warn!(color = %self.0, "unparseable caption color, using white");
            Srgb::new(255, 255, 255)
        })
    }

    /// The resolved color as `[r, g, b]`.
    pub fn to_rgb(&self) -> [u8; 3] {
        let c = self.resolve();
        [c.red, c.green, c.blue]
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::new(Self::WHITE)
    }
}

impl From<&str> for TextColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
