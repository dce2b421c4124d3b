use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::positions::Position;
use crate::ranges::{parse_range, range_contains};

static OPEN_CHARTS_JSON: &str = include_str!("../data/open_charts.json");

#[derive(Deserialize, Debug)]
struct ChartEntry {
    raise: String,
    mixed: String,
    open_size_bb: f64,
}

#[derive(Deserialize, Debug)]
struct ChartFile {
    open: HashMap<String, ChartEntry>,
}

#[derive(Debug)]
pub struct OpeningChart {
    pub raise: Vec<String>,
    pub mixed: Vec<String>,
    pub open_size_bb: f64,
}

static CHARTS: Lazy<HashMap<String, OpeningChart>> = Lazy::new(|| {
    let file: ChartFile =
        serde_json::from_str(OPEN_CHARTS_JSON).expect("Failed to parse opening charts");
    file.open
        .into_iter()
        .map(|(pos, entry)| {
            let chart = OpeningChart {
                raise: parse_range(&entry.raise),
                mixed: parse_range(&entry.mixed),
                open_size_bb: entry.open_size_bb,
            };
            (pos, chart)
        })
        .collect()
});

pub fn opening_chart(position: Position) -> Option<&'static OpeningChart> {
    CHARTS.get(position.chart_key())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningClass {
    InRangeRaise,
    InMixedRange,
    OutsideRange,
}

impl std::fmt::Display for OpeningClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpeningClass::InRangeRaise => write!(f, "in opening range"),
            OpeningClass::InMixedRange => write!(f, "in mixed range"),
            OpeningClass::OutsideRange => write!(f, "outside opening range"),
        }
    }
}

/// Where `hand` ("AKs", "77") sits in the opening chart for `position`.
pub fn classify_opening(hand: &str, position: Position) -> OpeningClass {
    match opening_chart(position) {
        Some(chart) if range_contains(&chart.raise, hand) => OpeningClass::InRangeRaise,
        Some(chart) if range_contains(&chart.mixed, hand) => OpeningClass::InMixedRange,
        _ => OpeningClass::OutsideRange,
    }
}

pub fn open_size_bb(position: Position) -> f64 {
    opening_chart(position).map(|c| c.open_size_bb).unwrap_or(2.5)
}

pub fn rfi_range(position: Position) -> Vec<String> {
    opening_chart(position)
        .map(|c| c.raise.clone())
        .unwrap_or_default()
}
