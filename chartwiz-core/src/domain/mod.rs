//! Domain types for chart composition

pub mod category;
pub mod chart;
pub mod customization;
pub mod date_range;
pub mod indicator;
pub mod payload;
pub mod selected;

pub use category::{Category, UnknownCategory};
pub use chart::{ChartPosition, ChartType};
pub use customization::{
    AspectRatio, ChartCustomization, ChartSize, ColorScheme, FontWeight, IconOptions, IconStyle,
    Palette, Theme, ThemeMode, Typography, FONT_FAMILIES,
};
pub use date_range::{earliest_supported_date, DatePreset, DateRangeError, DateRangeSpec, DateWindow};
pub use indicator::{
    CombinedIndicator, FlatIndicator, IndicatorDescriptor, IndicatorGroup, IndicatorKind,
    SelectionKey, TimeSeriesPoint,
};
pub use payload::{ChartConfig, ChartPayload, PayloadStatus, DEFAULT_CHART_TITLE};
pub use selected::{IndicatorSettings, IndicatorVisualConfig, SelectedIndicator, SourceIndicator};
