// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Interactive launch records dashboard.
//!
//! Loads a CSV of historical rocket launches once at startup and serves a web
//! page with two charts: the launch outcome distribution and payload mass
//! versus outcome, filtered by launch site and payload range.
//!
//! ## Architecture
//!
//! 1. **Dataset loader** (`dataset` module) - Reads the local CSV, downloading
//!    it once from a fallback URL when absent.
//!
//! 2. **Context** (`context` module) - Immutable snapshot of the table plus the
//!    payload bounds and site list derived from it.
//!
//! 3. **Charts and callbacks** (`charts`, `callbacks` modules) - Pure filter
//!    functions producing Plotly figures, dispatched by control id.
//!
//! 4. **Server** (`server`, `layout` modules) - axum HTTP API and the embedded
//!    dashboard page.
//!
//! ## Usage
//!
//! ```bash
//! launch-dashboard --data spacex_launch_dash.csv --port 8050
//! ```

pub mod callbacks;
pub mod charts;
pub mod context;
pub mod data;
pub mod dataset;
pub mod layout;
pub mod server;

pub use context::DashboardContext;
pub use dataset::{load_dataset, LaunchTable};
pub use server::{run_server, ServerConfig};
