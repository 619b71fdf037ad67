//! Static font-style catalog.
//!
//! Every combination of family, weight, italic and letter-spacing variant is
//! addressable by one string key. Persisted captions reference styles by key,
//! so keys are never removed once they ship.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// Key used when a slide has no font or an unknown one.
pub const DEFAULT_FONT_KEY: &str = "inter-700";

/// `(family key, family name as the host knows it)`.
const FAMILIES: [(&str, &str); 5] = [
    ("inter", "Inter"),
    ("playfair", "Playfair Display"),
    ("space-mono", "Space Mono"),
    ("caveat", "Caveat"),
    ("bebas", "Bebas Neue"),
];

const WEIGHTS: [u16; 2] = [400, 700];

/// `(key suffix, letter spacing in px)`. The normal variant has no suffix.
const SPACINGS: [(&str, f32); 2] = [("", 0.0), ("-wide", 1.5)];

/// A concrete text style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    pub key: String,
    pub family_key: &'static str,
    pub family: &'static str,
    pub weight: u16,
    pub italic: bool,
    pub letter_spacing: f32,
}

struct FontCatalog {
    styles: Vec<FontStyle>,
    by_key: HashMap<String, usize>,
}

static CATALOG: LazyLock<FontCatalog> = LazyLock::new(|| {
    let mut styles = Vec::with_capacity(FAMILIES.len() * WEIGHTS.len() * 2 * SPACINGS.len());
    for (family_key, family) in FAMILIES {
        for weight in WEIGHTS {
            for italic in [false, true] {
                for (suffix, letter_spacing) in SPACINGS {
                    let slant = if italic { "-italic" } else { "" };
                    styles.push(FontStyle {
                        key: format!("{family_key}-{weight}{slant}{suffix}"),
                        family_key,
                        family,
                        weight,
                        italic,
                        letter_spacing,
                    });
                }
            }
        }
    }
    let by_key = styles
        .iter()
        .enumerate()
        .map(|(i, s)| (s.key.clone(), i))
        .collect();
    FontCatalog { styles, by_key }
});

/// All styles in catalog order.
pub fn font_catalog() -> &'static [FontStyle] {
    &CATALOG.styles
}

/// Looks up a style by key.
pub fn font_style(key: &str) -> Option<&'static FontStyle> {
    CATALOG.by_key.get(key).map(|&i| &CATALOG.styles[i])
}

/// Looks up a style by key, falling back to [`DEFAULT_FONT_KEY`].
pub fn resolve_font(key: &str) -> &'static FontStyle {
    if let Some(style) = font_style(key) {
        return style;
    }
    tracing::warn!(font = key, "unknown font key, using default");
    default_font()
}

fn default_font() -> &'static FontStyle {
    // The default key is generated from FAMILIES[0] and WEIGHTS[1].
    let index = CATALOG.by_key.get(DEFAULT_FONT_KEY).copied().unwrap_or(0);
    &CATALOG.styles[index]
}
