use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Top-level indicator domain a chart draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Macro,
    Micro,
    Options,
    Cta,
    Combination,
    Exclusive,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category '{0}' (expected one of macro, micro, options, cta, combination, exclusive)")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Macro,
        Category::Micro,
        Category::Options,
        Category::Cta,
        Category::Combination,
        Category::Exclusive,
    ];

    /// Numeric id used by the report backend.
    pub fn backend_id(self) -> u32 {
        match self {
            Category::Macro => 1,
            Category::Micro => 2,
            Category::Options => 3,
            Category::Cta => 4,
            Category::Combination => 5,
            Category::Exclusive => 6,
        }
    }

    pub fn from_backend_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.backend_id() == id)
    }

    /// Lowercase identifier, as stored in `categoryName`.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Macro => "macro",
            Category::Micro => "micro",
            Category::Options => "options",
            Category::Cta => "cta",
            Category::Combination => "combination",
            Category::Exclusive => "exclusive",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Macro => "Macro",
            Category::Micro => "Micro",
            Category::Options => "Options",
            Category::Cta => "CTA",
            Category::Combination => "Combination",
            Category::Exclusive => "Exclusive",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Macro => "Economic indicators and market trends",
            Category::Micro => "Individual stock and company analysis",
            Category::Options => "Options trading analysis and derivatives data",
            Category::Cta => "Commodity Trading Advisor strategies",
            Category::Combination => "Multiple category combinations",
            Category::Exclusive => "Exclusive category for special analysis",
        }
    }

    /// Combination merges several underlying categories and unlocks the
    /// uniform date/chart-type step.
    pub fn is_combination(self) -> bool {
        matches!(self, Category::Combination)
    }

    /// Categories whose flat indicators are pruned to those with data in the
    /// requested window (defaults are always kept).
    pub fn prunes_empty_series(self) -> bool {
        matches!(self, Category::Macro)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.title().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
