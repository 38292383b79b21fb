//! Theme model: named color scheme and font scheme.

use serde::{Deserialize, Serialize};

/// Named slot in a theme color scheme.
///
/// The `tx1`/`bg1`/`tx2`/`bg2` aliases used by scheme-color references map
/// onto the dark/light slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemeSlot {
    Dark1,
    Light1,
    Dark2,
    Light2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hyperlink,
    FollowedHyperlink,
}

impl SchemeSlot {
    /// Map a scheme-color reference name (`dk1`, `tx1`, `accent3`, ...) to
    /// its slot. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "dk1" | "tx1" => SchemeSlot::Dark1,
            "lt1" | "bg1" => SchemeSlot::Light1,
            "dk2" | "tx2" => SchemeSlot::Dark2,
            "lt2" | "bg2" => SchemeSlot::Light2,
            "accent1" => SchemeSlot::Accent1,
            "accent2" => SchemeSlot::Accent2,
            "accent3" => SchemeSlot::Accent3,
            "accent4" => SchemeSlot::Accent4,
            "accent5" => SchemeSlot::Accent5,
            "accent6" => SchemeSlot::Accent6,
            "hlink" => SchemeSlot::Hyperlink,
            "folHlink" => SchemeSlot::FollowedHyperlink,
            _ => return None,
        })
    }
}

/// The fixed set of named theme colors, each an RGB hex value ("RRGGBB").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub dark1: String,
    pub light1: String,
    pub dark2: String,
    pub light2: String,
    pub accent1: String,
    pub accent2: String,
    pub accent3: String,
    pub accent4: String,
    pub accent5: String,
    pub accent6: String,
    pub hyperlink: String,
    pub followed_hyperlink: String,
}

impl Default for ColorScheme {
    /// The stock "Office" scheme, also used when a scheme color must be
    /// resolved without a theme in scope.
    fn default() -> Self {
        Self {
            dark1: "000000".to_string(),
            light1: "FFFFFF".to_string(),
            dark2: "44546A".to_string(),
            light2: "E7E6E6".to_string(),
            accent1: "4472C4".to_string(),
            accent2: "ED7D31".to_string(),
            accent3: "A5A5A5".to_string(),
            accent4: "FFC000".to_string(),
            accent5: "5B9BD5".to_string(),
            accent6: "70AD47".to_string(),
            hyperlink: "0563C1".to_string(),
            followed_hyperlink: "954F72".to_string(),
        }
    }
}

impl ColorScheme {
    /// Get the RGB hex value for a slot.
    pub fn slot(&self, slot: SchemeSlot) -> &str {
        match slot {
            SchemeSlot::Dark1 => &self.dark1,
            SchemeSlot::Light1 => &self.light1,
            SchemeSlot::Dark2 => &self.dark2,
            SchemeSlot::Light2 => &self.light2,
            SchemeSlot::Accent1 => &self.accent1,
            SchemeSlot::Accent2 => &self.accent2,
            SchemeSlot::Accent3 => &self.accent3,
            SchemeSlot::Accent4 => &self.accent4,
            SchemeSlot::Accent5 => &self.accent5,
            SchemeSlot::Accent6 => &self.accent6,
            SchemeSlot::Hyperlink => &self.hyperlink,
            SchemeSlot::FollowedHyperlink => &self.followed_hyperlink,
        }
    }

    /// Set the RGB hex value for a slot by its scheme-element name.
    pub fn set_by_name(&mut self, name: &str, rgb: String) {
        if let Some(slot) = SchemeSlot::from_name(name) {
            match slot {
                SchemeSlot::Dark1 => self.dark1 = rgb,
                SchemeSlot::Light1 => self.light1 = rgb,
                SchemeSlot::Dark2 => self.dark2 = rgb,
                SchemeSlot::Light2 => self.light2 = rgb,
                SchemeSlot::Accent1 => self.accent1 = rgb,
                SchemeSlot::Accent2 => self.accent2 = rgb,
                SchemeSlot::Accent3 => self.accent3 = rgb,
                SchemeSlot::Accent4 => self.accent4 = rgb,
                SchemeSlot::Accent5 => self.accent5 = rgb,
                SchemeSlot::Accent6 => self.accent6 = rgb,
                SchemeSlot::Hyperlink => self.hyperlink = rgb,
                SchemeSlot::FollowedHyperlink => self.followed_hyperlink = rgb,
            }
        }
    }
}

/// One script-specific font family set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSet {
    /// Latin-script typeface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
    /// East Asian typeface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub east_asian: Option<String>,
    /// Complex-script typeface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex_script: Option<String>,
}

/// Major (heading) and minor (body) fonts declared by the theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontScheme {
    pub major: FontSet,
    pub minor: FontSet,
}

/// A presentation theme: name plus color and font schemes.
///
/// Every field has a fallback, so theme resolution never fails: an absent
/// or malformed theme part yields `Theme::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name as declared by the part.
    pub name: String,
    /// Named color slots.
    pub colors: ColorScheme,
    /// Major/minor font families.
    pub fonts: FontScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Office".to_string(),
            colors: ColorScheme::default(),
            fonts: FontScheme::default(),
        }
    }
}
