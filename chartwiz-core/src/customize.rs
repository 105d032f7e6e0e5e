//! Chart-wide customization state.

use serde_json::Error as JsonError;
use std::ops::RangeInclusive;
use tracing::debug;

use crate::domain::{
    AspectRatio, ChartCustomization, ChartPosition, FontWeight, IconStyle, Palette, ThemeMode,
};

pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 10..=24;
pub const TITLE_SIZE_RANGE: RangeInclusive<u32> = 14..=32;
pub const LABEL_SIZE_RANGE: RangeInclusive<u32> = 8..=16;
pub const WIDTH_RANGE: RangeInclusive<u32> = 400..=1200;
pub const HEIGHT_RANGE: RangeInclusive<u32> = 200..=800;

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

/// Toggleable icon/legend flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFlag {
    Legend,
    DataLabels,
    Grid,
    Axes,
}

/// Owns the [`ChartCustomization`] and the chart position. Every numeric
/// setter clamps into its allowed range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomizationStore {
    customization: ChartCustomization,
    position: ChartPosition,
}

impl CustomizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hydrate(&mut self, customization: ChartCustomization, position: ChartPosition) {
        self.customization = customization;
        self.clamp_all();
        self.position = position;
    }

    pub fn customization(&self) -> &ChartCustomization {
        &self.customization
    }

    /// Independent copy for the assembler.
    pub fn snapshot(&self) -> ChartCustomization {
        self.customization.clone()
    }

    pub fn position(&self) -> ChartPosition {
        self.position
    }

    pub fn set_position(&mut self, position: ChartPosition) {
        self.position = position;
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.customization.typography.font_family = family.to_string();
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.customization.typography.font_size = clamp(size, &FONT_SIZE_RANGE);
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.customization.typography.font_weight = weight;
    }

    pub fn set_title_size(&mut self, size: u32) {
        self.customization.typography.title_size = clamp(size, &TITLE_SIZE_RANGE);
    }

    pub fn set_label_size(&mut self, size: u32) {
        self.customization.typography.label_size = clamp(size, &LABEL_SIZE_RANGE);
    }

    pub fn set_width(&mut self, width: u32) {
        self.customization.size.width = clamp(width, &WIDTH_RANGE);
    }

    pub fn set_height(&mut self, height: u32) {
        self.customization.size.height = clamp(height, &HEIGHT_RANGE);
    }

    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.customization.size.aspect_ratio = ratio;
    }

    pub fn set_responsive(&mut self, responsive: bool) {
        self.customization.size.responsive = responsive;
    }

    pub fn set_icon_style(&mut self, style: IconStyle) {
        self.customization.icons.icon_style = style;
    }

    pub fn set_flag(&mut self, flag: IconFlag, on: bool) {
        let icons = &mut self.customization.icons;
        match flag {
            IconFlag::Legend => icons.show_legend = on,
            IconFlag::DataLabels => icons.show_data_labels = on,
            IconFlag::Grid => icons.show_grid = on,
            IconFlag::Axes => icons.show_axes = on,
        }
    }

    pub fn flag(&self, flag: IconFlag) -> bool {
        let icons = &self.customization.icons;
        match flag {
            IconFlag::Legend => icons.show_legend,
            IconFlag::DataLabels => icons.show_data_labels,
            IconFlag::Grid => icons.show_grid,
            IconFlag::Axes => icons.show_axes,
        }
    }

    pub fn toggle_flag(&mut self, flag: IconFlag) {
        let on = !self.flag(flag);
        self.set_flag(flag, on);
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.customization.theme.mode = mode;
    }

    /// Select a named palette; its colours replace the current scheme.
    pub fn set_palette(&mut self, palette: Palette) {
        self.customization.theme.palette = palette;
        self.customization.colors = palette.scheme();
        debug!(%palette, "palette applied");
    }

    pub fn set_color(&mut self, slot: ColorSlot, hex: &str) {
        let colors = &mut self.customization.colors;
        let target = match slot {
            ColorSlot::Primary => &mut colors.primary,
            ColorSlot::Secondary => &mut colors.secondary,
            ColorSlot::Background => &mut colors.background,
            ColorSlot::Text => &mut colors.text,
            ColorSlot::Grid => &mut colors.grid,
        };
        *target = hex.to_string();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// JSON string as stored in a report block's chart config.
    pub fn to_json(&self) -> Result<String, JsonError> {
        serde_json::to_string(&self.customization)
    }

    /// Replace the customization from its JSON form. Out-of-range numbers
    /// are clamped; the position is left as is.
    pub fn load_json(&mut self, json: &str) -> Result<(), JsonError> {
        self.customization = serde_json::from_str(json)?;
        self.clamp_all();
        Ok(())
    }

    fn clamp_all(&mut self) {
        let t = &mut self.customization.typography;
        t.font_size = clamp(t.font_size, &FONT_SIZE_RANGE);
        t.title_size = clamp(t.title_size, &TITLE_SIZE_RANGE);
        t.label_size = clamp(t.label_size, &LABEL_SIZE_RANGE);
        let s = &mut self.customization.size;
        s.width = clamp(s.width, &WIDTH_RANGE);
        s.height = clamp(s.height, &HEIGHT_RANGE);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSlot {
    Primary,
    Secondary,
    Background,
    Text,
    Grid,
}
