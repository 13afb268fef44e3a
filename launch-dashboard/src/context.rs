// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Immutable dashboard context built once after the table is loaded.

use crate::data::{LaunchRecord, PayloadRange};
use crate::dataset::LaunchTable;

/// Read-only snapshot shared by every chart computation.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    table: LaunchTable,
    payload_bounds: PayloadRange,
    sites: Vec<String>,
}

impl DashboardContext {
    pub fn new(table: LaunchTable) -> Self {
        let (low, high) = table.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(low, high), r| (low.min(r.payload_mass_kg), high.max(r.payload_mass_kg)),
        );

        // Sites in order of first appearance.
        let mut sites: Vec<String> = Vec::new();
        for record in &table {
            if !sites.iter().any(|s| s == &record.launch_site) {
                sites.push(record.launch_site.clone());
            }
        }

        tracing::info!(
            rows = table.len(),
            sites = sites.len(),
            payload_min = low,
            payload_max = high,
            "Built dashboard context"
        );

        Self {
            table,
            payload_bounds: PayloadRange::new(low, high),
            sites,
        }
    }

    pub fn table(&self) -> &LaunchTable {
        &self.table
    }

    pub fn records(&self) -> &[LaunchRecord] {
        self.table.records()
    }

    /// Smallest and largest payload mass present at load time.
    pub fn payload_bounds(&self) -> PayloadRange {
        self.payload_bounds
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn success_count(&self) -> usize {
        self.table.iter().filter(|r| r.outcome.is_success()).count()
    }
}
