//! Date-range filtering of indicator series.
//!
//! All functions are pure: inputs are borrowed, results are new values.
//! Filtering is idempotent, so re-applying the same (or a wider) window to
//! an already filtered series returns it unchanged.

use rayon::prelude::*;

use crate::domain::{DateWindow, IndicatorDescriptor, TimeSeriesPoint};

/// Points with `window.start() <= date <= window.end()`, in input order.
pub fn filter_points(points: &[TimeSeriesPoint], window: &DateWindow) -> Vec<TimeSeriesPoint> {
    points
        .iter()
        .filter(|p| window.contains(p.date))
        .cloned()
        .collect()
}

/// True when at least one point falls inside the window.
pub fn has_points_in(points: &[TimeSeriesPoint], window: &DateWindow) -> bool {
    points.iter().any(|p| window.contains(p.date))
}

/// Copy of a descriptor with its series (if any) sliced to the window.
/// Groups carry no series and pass through unchanged.
pub fn filter_descriptor(descriptor: &IndicatorDescriptor, window: &DateWindow) -> IndicatorDescriptor {
    let mut out = descriptor.clone();
    if let Some(series) = out.series_mut() {
        series.points.retain(|p| window.contains(p.date));
    }
    out
}

/// Batch form used when a global date filter is applied to everything loaded.
/// Each descriptor is filtered independently on the rayon pool; output order
/// matches input order.
pub fn filter_all(descriptors: &[IndicatorDescriptor], window: &DateWindow) -> Vec<IndicatorDescriptor> {
    descriptors
        .par_iter()
        .map(|d| filter_descriptor(d, window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartType, FlatIndicator, IndicatorGroup};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series() -> Vec<TimeSeriesPoint> {
        vec![
            TimeSeriesPoint::new(d(2019, 12, 31), 1.0),
            TimeSeriesPoint::new(d(2020, 1, 1), 2.0),
            TimeSeriesPoint::new(d(2020, 6, 1), 3.0),
            TimeSeriesPoint::new(d(2021, 1, 1), 4.0),
            TimeSeriesPoint::new(d(2021, 1, 2), 5.0),
        ]
    }

    fn window(a: NaiveDate, b: NaiveDate) -> DateWindow {
        DateWindow::new(a, b).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let w = window(d(2020, 1, 1), d(2021, 1, 1));
        let out = filter_points(&series(), &w);
        let values: Vec<f64> = out.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = series();
        let w = window(d(2020, 1, 1), d(2020, 1, 1));
        let _ = filter_points(&input, &w);
        assert_eq!(input.len(), 5);
    }

    #[test]
    fn empty_window_result() {
        let w = window(d(2030, 1, 1), d(2031, 1, 1));
        assert!(filter_points(&series(), &w).is_empty());
        assert!(!has_points_in(&series(), &w));
    }

    #[test]
    fn wider_window_on_filtered_series_is_noop() {
        let narrow = window(d(2020, 1, 1), d(2020, 12, 31));
        let wide = window(d(2000, 1, 1), d(2030, 1, 1));
        let once = filter_points(&series(), &narrow);
        assert_eq!(filter_points(&once, &wide), once);
        assert_eq!(filter_points(&once, &narrow), once);
    }

    #[test]
    fn batch_filter_preserves_order_and_groups() {
        let flat = FlatIndicator {
            indicator_id: "A".into(),
            name: "A".into(),
            latest_date: d(2021, 1, 2),
            latest_value: 5.0,
            default_chart_type: ChartType::Line,
            is_default: false,
            source: None,
            subcategory: None,
            units: None,
            release_frequency: None,
            points: series(),
        };
        let group = IndicatorDescriptor::Grouped(IndicatorGroup {
            id: 1,
            name: "G".into(),
            members: vec!["A".into()],
            values: vec![1.0],
        });
        let input = vec![IndicatorDescriptor::Flat(flat), group.clone()];
        let out = filter_all(&input, &window(d(2020, 6, 1), d(2020, 6, 1)));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].series().unwrap().points.len(), 1);
        assert_eq!(out[1], group);
        assert_eq!(input[0].series().unwrap().points.len(), 5);
    }
}
