// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Payload mass versus outcome (scatter chart), one series per booster category.

use super::{Axis, Figure, FigureLayout, Legend, ScatterMarker, ScatterTrace, Title, Trace};
use crate::context::DashboardContext;
use crate::data::{Outcome, PayloadRange, SiteSelection};
use crate::dataset::{BOOSTER_CATEGORY_COLUMN, CLASS_COLUMN, PAYLOAD_MASS_COLUMN};

const MARKER_SIZE: u32 = 10;
const MARKER_OPACITY: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub launch_site: String,
    pub booster_version: Option<String>,
    pub flight_number: Option<i64>,
}

impl ScatterPoint {
    /// Site, then booster version and flight number when the dataset has them.
    fn hover_text(&self) -> String {
        let mut lines = vec![self.launch_site.clone()];
        lines.extend(self.booster_version.clone());
        lines.extend(self.flight_number.map(|n| format!("Flight {}", n)));
        lines.join("<br>")
    }
}

/// Launches sharing a booster version category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub category: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayloadScatter {
    pub title: String,
    pub selection: SiteSelection,
    pub range: PayloadRange,
    pub series: Vec<ScatterSeries>,
}

impl PayloadScatter {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }

    pub fn to_figure(&self) -> Figure {
        let data = self
            .series
            .iter()
            .map(|series| {
                Trace::Scatter(ScatterTrace {
                    name: series.category.clone(),
                    mode: "markers",
                    x: series.points.iter().map(|p| p.payload_mass_kg).collect(),
                    y: series.points.iter().map(|p| p.outcome.class()).collect(),
                    text: series.points.iter().map(ScatterPoint::hover_text).collect(),
                    marker: ScatterMarker {
                        size: MARKER_SIZE,
                        opacity: MARKER_OPACITY,
                    },
                })
            })
            .collect();

        let mut layout = FigureLayout::dark(&self.title);
        layout.xaxis = Some(Axis::titled(PAYLOAD_MASS_COLUMN));
        layout.yaxis = Some(Axis::titled(CLASS_COLUMN));
        layout.legend = Some(Legend {
            title: Title::new(BOOSTER_CATEGORY_COLUMN),
        });

        Figure { data, layout }
    }
}

/// Plot individual launches whose payload lies in `range` (inclusive),
/// optionally restricted to one site.
///
/// An inverted range selects nothing and yields an empty chart.
pub fn payload_vs_outcome(
    ctx: &DashboardContext,
    site: &SiteSelection,
    range: PayloadRange,
) -> PayloadScatter {
    let mut series: Vec<ScatterSeries> = Vec::new();

    let selected = ctx
        .records()
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg))
        .filter(|r| site.matches(&r.launch_site));

    for record in selected {
        let point = ScatterPoint {
            payload_mass_kg: record.payload_mass_kg,
            outcome: record.outcome,
            launch_site: record.launch_site.clone(),
            booster_version: record.booster_version.clone(),
            flight_number: record.flight_number,
        };

        // Categories keep their first-appearance order.
        match series
            .iter_mut()
            .find(|s| s.category == record.booster_category)
        {
            Some(existing) => existing.points.push(point),
            None => series.push(ScatterSeries {
                category: record.booster_category.clone(),
                points: vec![point],
            }),
        }
    }

    let title = match site {
        SiteSelection::All => "Payload vs. Outcome for All Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload vs. Outcome for {}", name),
    };

    PayloadScatter {
        title,
        selection: site.clone(),
        range,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{context, example_context, record};
    use crate::data::LaunchRecord;
    use proptest::prelude::*;

    #[test]
    fn test_range_filter_all_sites() {
        let scatter = payload_vs_outcome(
            &example_context(),
            &SiteSelection::All,
            PayloadRange::new(0.0, 1000.0),
        );
        assert_eq!(scatter.point_count(), 1);

        let point = scatter.points().next().unwrap();
        assert_eq!(point.launch_site, "SiteA");
        assert_eq!(point.payload_mass_kg, 500.0);
        assert_eq!(point.outcome, Outcome::Success);
        assert_eq!(scatter.series[0].category, "v1");
        assert_eq!(scatter.title, "Payload vs. Outcome for All Sites");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let scatter = payload_vs_outcome(
            &example_context(),
            &SiteSelection::All,
            PayloadRange::new(500.0, 1500.0),
        );
        let payloads: Vec<f64> = scatter.points().map(|p| p.payload_mass_kg).collect();
        assert_eq!(payloads, vec![500.0, 1500.0]);
    }

    #[test]
    fn test_site_filter() {
        let scatter = payload_vs_outcome(
            &example_context(),
            &SiteSelection::Site("SiteB".to_string()),
            PayloadRange::new(0.0, 10_000.0),
        );
        assert_eq!(scatter.point_count(), 1);
        assert_eq!(scatter.series[0].category, "v2");
        assert_eq!(scatter.title, "Payload vs. Outcome for SiteB");
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let scatter = payload_vs_outcome(
            &example_context(),
            &SiteSelection::All,
            PayloadRange::new(2000.0, 500.0),
        );
        assert_eq!(scatter.point_count(), 0);
        assert!(scatter.to_figure().data.is_empty());
    }

    #[test]
    fn test_series_grouped_by_category_in_first_appearance_order() {
        let ctx = context(vec![
            record("SiteA", 100.0, 1, "FT"),
            record("SiteA", 200.0, 0, "v1.1"),
            record("SiteB", 300.0, 1, "FT"),
            record("SiteB", 400.0, 1, "B4"),
        ]);
        let scatter = payload_vs_outcome(&ctx, &SiteSelection::All, PayloadRange::new(0.0, 1000.0));
        let categories: Vec<&str> = scatter.series.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(categories, vec!["FT", "v1.1", "B4"]);
        assert_eq!(scatter.series[0].points.len(), 2);
    }

    #[test]
    fn test_figure_axes_and_traces() {
        let mut records = vec![record("SiteA", 500.0, 1, "v1")];
        records[0].booster_version = Some("F9 v1.1 B1003".to_string());
        records[0].flight_number = Some(6);
        let ctx = context(records);

        let figure =
            payload_vs_outcome(&ctx, &SiteSelection::All, PayloadRange::new(0.0, 1000.0)).to_figure();
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["mode"], "markers");
        assert_eq!(json["data"][0]["name"], "v1");
        assert_eq!(json["data"][0]["x"], serde_json::json!([500.0]));
        assert_eq!(json["data"][0]["y"], serde_json::json!([1]));
        assert_eq!(json["data"][0]["text"][0], "SiteA<br>F9 v1.1 B1003<br>Flight 6");
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "Payload Mass (kg)");
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "class");
        assert_eq!(json["layout"]["legend"]["title"]["text"], "Booster Version Category");
    }

    #[test]
    fn test_hover_text_skips_absent_columns() {
        let mut records = vec![
            record("SiteA", 500.0, 1, "v1"),
            record("SiteA", 600.0, 0, "v1"),
        ];
        records[1].flight_number = Some(12);
        let ctx = context(records);

        let figure =
            payload_vs_outcome(&ctx, &SiteSelection::All, PayloadRange::new(0.0, 1000.0)).to_figure();
        match &figure.data[0] {
            Trace::Scatter(trace) => {
                assert_eq!(trace.text, vec!["SiteA", "SiteA<br>Flight 12"]);
            }
            Trace::Pie(_) => panic!("expected a scatter trace"),
        }
    }

    fn arb_record() -> impl Strategy<Value = LaunchRecord> {
        (0usize..3, 0.0f64..10_000.0, 0i64..2, 0usize..4).prop_map(|(s, payload, class, b)| {
            record(&format!("Site{}", s), payload, class, &format!("B{}", b))
        })
    }

    proptest! {
        #[test]
        fn prop_points_within_range(
            records in prop::collection::vec(arb_record(), 1..60),
            low in 0.0f64..10_000.0,
            high in 0.0f64..10_000.0,
            pick in 0usize..4,
        ) {
            let ctx = context(records.clone());
            let selection = if pick == 3 {
                SiteSelection::All
            } else {
                SiteSelection::Site(format!("Site{}", pick))
            };
            let range = PayloadRange::new(low, high);
            let scatter = payload_vs_outcome(&ctx, &selection, range);

            for point in scatter.points() {
                prop_assert!(point.payload_mass_kg >= low && point.payload_mass_kg <= high);
                prop_assert!(selection.matches(&point.launch_site));
            }

            let expected = records
                .iter()
                .filter(|r| r.payload_mass_kg >= low && r.payload_mass_kg <= high)
                .filter(|r| selection.matches(&r.launch_site))
                .count();
            prop_assert_eq!(scatter.point_count(), expected);

            if low > high {
                prop_assert_eq!(scatter.point_count(), 0);
            }
        }

        #[test]
        fn prop_idempotent(
            records in prop::collection::vec(arb_record(), 1..40),
            low in 0.0f64..10_000.0,
            high in 0.0f64..10_000.0,
        ) {
            let ctx = context(records);
            let range = PayloadRange::new(low, high);
            prop_assert_eq!(
                payload_vs_outcome(&ctx, &SiteSelection::All, range),
                payload_vs_outcome(&ctx, &SiteSelection::All, range)
            );
        }
    }
}
