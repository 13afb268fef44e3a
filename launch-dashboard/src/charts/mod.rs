// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Chart computations and the figure JSON they render to.
//!
//! Each chart function is a pure filter/aggregate over the dashboard context
//! producing a typed summary (`OutcomeBreakdown`, `PayloadScatter`). The
//! summaries convert into a [`Figure`], which serializes to the
//! `{"data": [...], "layout": {...}}` shape Plotly.js renders directly.

pub mod outcome;
pub mod payload;

pub use outcome::{outcome_distribution, OutcomeBreakdown, Slice};
pub use payload::{payload_vs_outcome, PayloadScatter, ScatterPoint, ScatterSeries};

use serde::Serialize;

// ============================================================================
// Dark theme
// ============================================================================

const BACKGROUND_COLOR: &str = "rgb(17,17,17)";
const FONT_COLOR: &str = "#f2f5fa";
const GRID_COLOR: &str = "#283442";

/// Default trace palette for categories without a fixed color.
pub const COLORWAY: &[&str] = &[
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Animation length applied when a figure replaces the previous one.
const TRANSITION_MS: u32 = 500;

// ============================================================================
// Figure model
// ============================================================================

/// A complete chart: traces plus layout, as plotly.js expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(PieTrace),
    Scatter(ScatterTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<PieMarker>,
    /// Keep slices in the order given.
    pub sort: bool,
    pub textinfo: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<u8>,
    pub text: Vec<String>,
    pub marker: ScatterMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterMarker {
    pub size: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Chart titles are rendered bold.
    pub fn bold(text: &str) -> Self {
        Self::new(format!("<b>{}</b>", text))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    pub gridcolor: &'static str,
    pub zeroline: bool,
}

impl Axis {
    pub fn titled(text: &str) -> Self {
        Self {
            title: Title::new(text),
            gridcolor: GRID_COLOR,
            zeroline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub font: Font,
    pub colorway: &'static [&'static str],
    pub transition: Transition,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

impl FigureLayout {
    /// Dark layout with a bold title and no axes.
    pub fn dark(title: &str) -> Self {
        Self {
            title: Title::bold(title),
            paper_bgcolor: BACKGROUND_COLOR,
            plot_bgcolor: BACKGROUND_COLOR,
            font: Font { color: FONT_COLOR },
            colorway: COLORWAY,
            transition: Transition {
                duration: TRANSITION_MS,
            },
            showlegend: true,
            xaxis: None,
            yaxis: None,
            legend: None,
        }
    }
}
