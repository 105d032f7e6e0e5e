//! Chart-wide visual configuration.
//!
//! The record is plain data; clamping and palette switching live in
//! [`crate::customize::CustomizationStore`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generates `ALL`, `as_str`, `Display` and `FromStr` for a fieldless option
/// enum whose serde names are the lowercase strings given here.
macro_rules! option_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn next(self) -> $name {
                let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
                Self::ALL[(idx + 1) % Self::ALL.len()]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| format!("unknown {} '{s}'", stringify!($name)))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    #[default]
    Medium,
    Semibold,
    Bold,
}

option_enum!(FontWeight {
    Normal => "normal",
    Medium => "medium",
    Semibold => "semibold",
    Bold => "bold",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Outline,
    Filled,
    Minimal,
}

option_enum!(IconStyle {
    Outline => "outline",
    Filled => "filled",
    Minimal => "minimal",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Auto,
    Square,
    #[default]
    Wide,
    Tall,
}

option_enum!(AspectRatio {
    Auto => "auto",
    Square => "square",
    Wide => "wide",
    Tall => "tall",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Auto,
}

option_enum!(ThemeMode {
    Light => "light",
    Dark => "dark",
    Auto => "auto",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Default,
    Colorful,
    Monochrome,
    Pastel,
}

option_enum!(Palette {
    Default => "default",
    Colorful => "colorful",
    Monochrome => "monochrome",
    Pastel => "pastel",
});

impl Palette {
    /// The colour scheme this palette installs.
    pub fn scheme(self) -> ColorScheme {
        let (primary, secondary, background, text, grid) = match self {
            Palette::Default => ("#3b82f6", "#10b981", "#ffffff", "#1f2937", "#e5e7eb"),
            Palette::Colorful => ("#ff6b6b", "#4ecdc4", "#ffffff", "#2c3e50", "#bdc3c7"),
            Palette::Monochrome => ("#2c3e50", "#34495e", "#ffffff", "#2c3e50", "#bdc3c7"),
            Palette::Pastel => ("#a8e6cf", "#ffd3a5", "#ffffff", "#2c3e50", "#e8f4f8"),
        };
        ColorScheme {
            primary: primary.into(),
            secondary: secondary.into(),
            background: background.into(),
            text: text.into(),
            grid: grid.into(),
        }
    }
}

pub const FONT_FAMILIES: [&str; 6] = [
    "Inter",
    "Roboto",
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
    pub grid: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Palette::Default.scheme()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub title_size: u32,
    pub label_size: u32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Inter".into(),
            font_size: 14,
            font_weight: FontWeight::Medium,
            title_size: 18,
            label_size: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconOptions {
    pub show_legend: bool,
    pub show_data_labels: bool,
    pub show_grid: bool,
    pub show_axes: bool,
    pub icon_style: IconStyle,
}

impl Default for IconOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_data_labels: false,
            show_grid: true,
            show_axes: true,
            icon_style: IconStyle::Outline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: AspectRatio,
    pub responsive: bool,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            aspect_ratio: AspectRatio::Wide,
            responsive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub mode: ThemeMode,
    pub palette: Palette,
}

/// Everything the chart surface needs to style the final chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCustomization {
    #[serde(default)]
    pub colors: ColorScheme,
    #[serde(default)]
    pub typography: Typography,
    #[serde(default)]
    pub icons: IconOptions,
    #[serde(default)]
    pub size: ChartSize,
    #[serde(default)]
    pub theme: Theme,
}
