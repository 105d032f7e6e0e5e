//! Backend JSON shapes and their normalisation into descriptors.
//!
//! The backend distinguishes flat indicators from sub-groups only by which
//! fields are present. Both shapes are parsed here once, so nothing past
//! this module ever probes for fields.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::provider::{IndicatorPage, PageRequest, Pagination, SourceError};
use crate::domain::{ChartType, FlatIndicator, IndicatorDescriptor, IndicatorGroup, TimeSeriesPoint};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireBody {
    Paged {
        data: Vec<serde_json::Value>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Bare(Vec<serde_json::Value>),
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    #[serde(deserialize_with = "wire_date")]
    date: NaiveDate,
    value: Option<f64>,
    #[serde(default)]
    normalized_value: Option<f64>,
    #[serde(default)]
    z_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireFlat {
    #[serde(deserialize_with = "string_or_number")]
    indicator_id: String,
    indicator_name: String,
    #[serde(deserialize_with = "wire_date")]
    latest_date: NaiveDate,
    #[serde(default)]
    latest_value: Option<f64>,
    #[serde(default, alias = "is_default", rename = "isDefault")]
    is_default: Option<bool>,
    #[serde(default, alias = "default_chart_type", rename = "defaultChartType")]
    default_chart_type: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    units: Option<String>,
    #[serde(default)]
    release_frequency: Option<String>,
    #[serde(default)]
    data_points: Vec<WirePoint>,
}

#[derive(Debug, Deserialize)]
struct WireGroup {
    #[serde(default)]
    id: i64,
    name: String,
    indicators: Vec<String>,
    #[serde(default)]
    values: Vec<Option<f64>>,
}

/// Accepts `YYYY-MM-DD` or any ISO-8601 timestamp starting with one.
fn wire_date<'de, D>(de: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(de)?;
    parse_wire_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected id, got {other}"))),
    }
}

impl From<WireFlat> for FlatIndicator {
    fn from(w: WireFlat) -> Self {
        let default_chart_type = w
            .default_chart_type
            .as_deref()
            .and_then(|s| s.parse::<ChartType>().ok())
            .unwrap_or_default();
        let points = w
            .data_points
            .into_iter()
            .filter_map(|p| {
                p.value.map(|value| TimeSeriesPoint {
                    date: p.date,
                    value,
                    normalized_value: p.normalized_value,
                    z_score: p.z_score,
                })
            })
            .collect();
        FlatIndicator {
            indicator_id: w.indicator_id,
            name: w.indicator_name,
            latest_date: w.latest_date,
            latest_value: w.latest_value.unwrap_or(0.0),
            default_chart_type,
            is_default: w.is_default.unwrap_or(false),
            source: w.source,
            subcategory: w.subcategory,
            units: w.units,
            release_frequency: w.release_frequency,
            points,
        }
    }
}

impl From<WireGroup> for IndicatorGroup {
    fn from(w: WireGroup) -> Self {
        IndicatorGroup {
            id: w.id,
            name: w.name,
            members: w.indicators,
            values: w.values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
        }
    }
}

/// Normalise one row by its discriminating field.
pub fn parse_descriptor(row: serde_json::Value) -> Result<IndicatorDescriptor, SourceError> {
    let shape = |e: serde_json::Error| SourceError::ResponseFormatChanged(e.to_string());
    if row.get("indicator_id").is_some() {
        let flat: WireFlat = serde_json::from_value(row).map_err(shape)?;
        Ok(IndicatorDescriptor::Flat(flat.into()))
    } else if row.get("indicators").is_some() && row.get("name").is_some() {
        let group: WireGroup = serde_json::from_value(row).map_err(shape)?;
        Ok(IndicatorDescriptor::Grouped(group.into()))
    } else {
        Err(SourceError::ResponseFormatChanged(
            "indicator row is neither a flat indicator nor a group".into(),
        ))
    }
}

/// Parse a whole response body (bare array or `{data, pagination}`).
pub fn parse_page(body: &str, request: &PageRequest) -> Result<IndicatorPage, SourceError> {
    let parsed: WireBody = serde_json::from_str(body)
        .map_err(|e| SourceError::ResponseFormatChanged(format!("indicator response: {e}")))?;
    let (rows, pagination) = match parsed {
        WireBody::Paged { data, pagination } => (data, pagination),
        WireBody::Bare(rows) => (rows, None),
    };
    let data = rows
        .into_iter()
        .map(parse_descriptor)
        .collect::<Result<Vec<_>, _>>()?;
    let pagination = pagination.unwrap_or_else(|| Pagination::single_page(data.len(), request));
    Ok(IndicatorPage { data, pagination })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGED: &str = r#"{
        "data": [
            {
                "indicator_id": "GDP",
                "indicator_name": "Gross Domestic Product",
                "latest_date": "2024-03-31T00:00:00.000Z",
                "latest_value": 28.2,
                "isDefault": true,
                "defaultChartType": "bar",
                "subcategory": "Growth",
                "data_points": [
                    {"date": "2023-12-31", "value": 27.9},
                    {"date": "2024-03-31", "value": 28.2, "z_score": 0.4},
                    {"date": "2024-06-30", "value": null}
                ]
            },
            {"id": 9, "name": "Rates", "indicators": ["2Y", "10Y"], "values": [4.7, null]}
        ],
        "pagination": {"total": 12, "limit": 10, "offset": 0, "hasMore": true}
    }"#;

    #[test]
    fn parses_paged_body() {
        let req = PageRequest::first(10, None);
        let page = parse_page(PAGED, &req).unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.pagination.has_more);
        assert_eq!(page.pagination.total, 12);

        let IndicatorDescriptor::Flat(f) = &page.data[0] else {
            panic!("expected flat");
        };
        assert_eq!(f.indicator_id, "GDP");
        assert_eq!(f.latest_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert!(f.is_default);
        assert_eq!(f.default_chart_type, ChartType::Bar);
        assert_eq!(f.points.len(), 2, "null values are dropped");
        assert_eq!(f.points[1].z_score, Some(0.4));

        let IndicatorDescriptor::Grouped(g) = &page.data[1] else {
            panic!("expected group");
        };
        assert_eq!(g.members, vec!["2Y".to_string(), "10Y".to_string()]);
        assert_eq!(g.values, vec![4.7, 0.0]);
    }

    #[test]
    fn bare_array_synthesises_pagination() {
        let body = r#"[{"indicator_id": 42, "indicator_name": "X", "latest_date": "2020-01-01"}]"#;
        let req = PageRequest { limit: 10, offset: 20, report_type_id: None };
        let page = parse_page(body, &req).unwrap();
        assert_eq!(page.data[0].key().id, "42");
        assert_eq!(
            page.pagination,
            Pagination { total: 1, limit: 10, offset: 20, has_more: false }
        );
        assert_eq!(page.data[0].series().unwrap().default_chart_type, ChartType::Line);
    }

    #[test]
    fn unknown_shape_is_format_error() {
        let err = parse_page(r#"[{"foo": 1}]"#, &PageRequest::first(10, None)).unwrap_err();
        assert!(matches!(err, SourceError::ResponseFormatChanged(_)));
        let err = parse_page(r#"{"nope": true}"#, &PageRequest::first(10, None)).unwrap_err();
        assert!(matches!(err, SourceError::ResponseFormatChanged(_)));
    }
}
