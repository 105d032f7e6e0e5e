//! Chart type and text-wrap position enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Series rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Area,
    Pie,
    Scatter,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Line,
        ChartType::Bar,
        ChartType::Area,
        ChartType::Pie,
        ChartType::Scatter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartType::Line => "Line Chart",
            ChartType::Bar => "Bar Chart",
            ChartType::Area => "Area Chart",
            ChartType::Pie => "Pie Chart",
            ChartType::Scatter => "Scatter Chart",
        }
    }

    /// Next type in `ALL`, wrapping. Used by keyboard cycling.
    pub fn next(self) -> ChartType {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown chart type '{s}'"))
    }
}

/// How the chart block sits relative to surrounding report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartPosition {
    Inline,
    #[default]
    Square,
    Tight,
    Through,
    TopBottom,
    BehindText,
    FrontText,
}

impl ChartPosition {
    pub const ALL: [ChartPosition; 7] = [
        ChartPosition::Inline,
        ChartPosition::Square,
        ChartPosition::Tight,
        ChartPosition::Through,
        ChartPosition::TopBottom,
        ChartPosition::BehindText,
        ChartPosition::FrontText,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartPosition::Inline => "inline",
            ChartPosition::Square => "square",
            ChartPosition::Tight => "tight",
            ChartPosition::Through => "through",
            ChartPosition::TopBottom => "top-bottom",
            ChartPosition::BehindText => "behind-text",
            ChartPosition::FrontText => "front-text",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartPosition::Inline => "In line with text",
            ChartPosition::Square => "Square",
            ChartPosition::Tight => "Tight",
            ChartPosition::Through => "Through",
            ChartPosition::TopBottom => "Top and bottom",
            ChartPosition::BehindText => "Behind text",
            ChartPosition::FrontText => "In front of text",
        }
    }

    pub fn next(self) -> ChartPosition {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ChartPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown chart position '{s}'"))
    }
}
