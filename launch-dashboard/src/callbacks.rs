// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Reactive recomputation layer.
//!
//! A [`Callback`] subscribes to control ids and produces the figure for one
//! output id. When a control changes, the [`CallbackRegistry`] runs exactly the
//! callbacks subscribed to it against the current control values.

use serde::Serialize;

use crate::charts::{outcome_distribution, payload_vs_outcome, Figure};
use crate::context::DashboardContext;
use crate::data::{PayloadRange, SiteSelection};
use crate::layout::{PAYLOAD_SLIDER_ID, PIE_CHART_ID, SCATTER_CHART_ID, SITE_DROPDOWN_ID};

/// Current value of every dashboard control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlValues {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

impl ControlValues {
    /// Initial control state: all sites, full payload range.
    pub fn defaults(ctx: &DashboardContext) -> Self {
        Self {
            site: SiteSelection::All,
            payload: ctx.payload_bounds(),
        }
    }
}

/// Metadata about a callback for API discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallbackInfo {
    pub id: String,
    pub output: String,
    pub inputs: Vec<String>,
    pub description: String,
}

/// A pure function from control values to one output figure.
pub trait Callback: Send + Sync {
    /// Unique identifier for this callback.
    fn id(&self) -> &str;

    /// Output component this callback renders.
    fn output(&self) -> &str;

    /// Controls this callback subscribes to.
    fn inputs(&self) -> &[&str];

    fn description(&self) -> &str;

    /// Compute the figure for the current control values.
    fn render(&self, ctx: &DashboardContext, values: &ControlValues) -> Figure;

    fn info(&self) -> CallbackInfo {
        CallbackInfo {
            id: self.id().to_string(),
            output: self.output().to_string(),
            inputs: self.inputs().iter().map(|s| s.to_string()).collect(),
            description: self.description().to_string(),
        }
    }
}

/// Outcome pie chart, driven by the site selector.
#[derive(Debug, Default)]
pub struct OutcomePieCallback;

impl Callback for OutcomePieCallback {
    fn id(&self) -> &str {
        "outcome-distribution"
    }

    fn output(&self) -> &str {
        PIE_CHART_ID
    }

    fn inputs(&self) -> &[&str] {
        &[SITE_DROPDOWN_ID]
    }

    fn description(&self) -> &str {
        "Successful launches by site, or success vs. failure for one site"
    }

    fn render(&self, ctx: &DashboardContext, values: &ControlValues) -> Figure {
        outcome_distribution(ctx, &values.site).to_figure()
    }
}

/// Payload scatter, driven by the site selector and the payload slider.
#[derive(Debug, Default)]
pub struct PayloadScatterCallback;

impl Callback for PayloadScatterCallback {
    fn id(&self) -> &str {
        "payload-vs-outcome"
    }

    fn output(&self) -> &str {
        SCATTER_CHART_ID
    }

    fn inputs(&self) -> &[&str] {
        &[SITE_DROPDOWN_ID, PAYLOAD_SLIDER_ID]
    }

    fn description(&self) -> &str {
        "Launch outcome against payload mass, colored by booster version category"
    }

    fn render(&self, ctx: &DashboardContext, values: &ControlValues) -> Figure {
        payload_vs_outcome(ctx, &values.site, values.payload).to_figure()
    }
}

/// Registry of dashboard callbacks.
pub struct CallbackRegistry {
    callbacks: Vec<Box<dyn Callback>>,
}

impl CallbackRegistry {
    /// Create a registry with the dashboard's two charts.
    pub fn new() -> Self {
        let mut registry = Self {
            callbacks: Vec::new(),
        };
        registry.register(Box::new(OutcomePieCallback));
        registry.register(Box::new(PayloadScatterCallback));
        registry
    }

    pub fn register(&mut self, callback: Box<dyn Callback>) {
        self.callbacks.push(callback);
    }

    pub fn list(&self) -> Vec<CallbackInfo> {
        self.callbacks.iter().map(|c| c.info()).collect()
    }

    /// Get a callback by the output it renders.
    pub fn get(&self, output: &str) -> Option<&dyn Callback> {
        self.callbacks
            .iter()
            .find(|c| c.output() == output)
            .map(|c| c.as_ref())
    }

    /// Callbacks subscribed to `control`.
    pub fn subscribers(&self, control: &str) -> Vec<&dyn Callback> {
        self.callbacks
            .iter()
            .filter(|c| c.inputs().contains(&control))
            .map(|c| c.as_ref())
            .collect()
    }

    /// Whether any callback listens to `control`.
    pub fn is_known_control(&self, control: &str) -> bool {
        self.callbacks.iter().any(|c| c.inputs().contains(&control))
    }

    /// Re-render every output subscribed to `changed`.
    pub fn dispatch(
        &self,
        ctx: &DashboardContext,
        changed: &str,
        values: &ControlValues,
    ) -> Vec<(String, Figure)> {
        let outputs: Vec<(String, Figure)> = self
            .subscribers(changed)
            .into_iter()
            .map(|c| (c.output().to_string(), c.render(ctx, values)))
            .collect();

        tracing::debug!(
            changed,
            site = %values.site,
            payload = %values.payload,
            outputs = outputs.len(),
            "Dispatched control change"
        );

        outputs
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
