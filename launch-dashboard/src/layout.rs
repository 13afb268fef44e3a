// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Static description of the dashboard controls.
//!
//! The layout is pure configuration: the browser page builds its widgets from
//! this JSON and reports control changes back by id.

use serde::Serialize;

use crate::context::DashboardContext;
use crate::data::{PayloadRange, SiteSelection, ALL_SITES};

pub const DASHBOARD_TITLE: &str = "SpaceX Launch Records Dashboard";

pub const SITE_DROPDOWN_ID: &str = "site-dropdown";
pub const PAYLOAD_SLIDER_ID: &str = "payload-slider";
pub const PIE_CHART_ID: &str = "success-pie-chart";
pub const SCATTER_CHART_ID: &str = "success-payload-scatter-chart";

const SLIDER_STEP: f64 = 1000.0;
const SLIDER_MARK_INTERVAL: f64 = 2500.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub options: Vec<DropdownOption>,
    pub value: SiteSelection,
    pub placeholder: &'static str,
    pub searchable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub id: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
    pub value: PayloadRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub id: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLayout {
    pub title: &'static str,
    pub site_dropdown: Dropdown,
    pub payload_slider: RangeSlider,
    pub graphs: Vec<Graph>,
}

impl DashboardLayout {
    pub fn build(ctx: &DashboardContext) -> Self {
        let options = std::iter::once(DropdownOption {
            label: "All Sites".to_string(),
            value: ALL_SITES.to_string(),
        })
        .chain(ctx.sites().iter().map(|site| DropdownOption {
            label: site.clone(),
            value: site.clone(),
        }))
        .collect();

        let bounds = ctx.payload_bounds();
        let min = (bounds.low / SLIDER_STEP).floor() * SLIDER_STEP;
        let max = (bounds.high / SLIDER_STEP).ceil() * SLIDER_STEP;

        Self {
            title: DASHBOARD_TITLE,
            site_dropdown: Dropdown {
                id: SITE_DROPDOWN_ID,
                options,
                value: SiteSelection::All,
                placeholder: "Select a Launch Site",
                searchable: true,
            },
            payload_slider: RangeSlider {
                id: PAYLOAD_SLIDER_ID,
                label: "Payload Mass Range (Kg):",
                min,
                max,
                step: SLIDER_STEP,
                marks: slider_marks(min, max),
                value: bounds,
            },
            graphs: vec![Graph { id: PIE_CHART_ID }, Graph { id: SCATTER_CHART_ID }],
        }
    }
}

/// Marks every `SLIDER_MARK_INTERVAL` from `min` up to and including `max`.
fn slider_marks(min: f64, max: f64) -> Vec<SliderMark> {
    let mut marks = Vec::new();
    let mut value = min;
    while value <= max {
        marks.push(SliderMark {
            value,
            label: format!("{}", value),
        });
        value += SLIDER_MARK_INTERVAL;
    }
    marks
}
