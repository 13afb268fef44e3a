// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Launch outcome distribution (pie chart).

use std::collections::HashMap;

use super::{Figure, FigureLayout, PieMarker, PieTrace, Trace};
use crate::context::DashboardContext;
use crate::data::{Outcome, SiteSelection};

/// One slice of the proportion breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: usize,
    /// Fixed color, set only for outcome slices.
    pub color: Option<&'static str>,
}

/// Outcome distribution for one site selection.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeBreakdown {
    pub title: String,
    pub selection: SiteSelection,
    pub slices: Vec<Slice>,
}

impl OutcomeBreakdown {
    /// Sum of all slice values.
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn to_figure(&self) -> Figure {
        let colors: Option<Vec<String>> = self
            .slices
            .iter()
            .map(|s| s.color.map(str::to_string))
            .collect();

        let trace = PieTrace {
            labels: self.slices.iter().map(|s| s.label.clone()).collect(),
            values: self.slices.iter().map(|s| s.value).collect(),
            marker: colors
                .filter(|c| !c.is_empty())
                .map(|colors| PieMarker { colors }),
            sort: false,
            textinfo: "percent+label",
        };

        Figure {
            data: vec![Trace::Pie(trace)],
            layout: FigureLayout::dark(&self.title),
        }
    }
}

/// Summarize launch outcomes for the selected site.
///
/// For all sites: one slice per site counting successful launches only.
/// For a single site: success and failure counts for that site, each present
/// only when non-zero, with fixed colors.
pub fn outcome_distribution(ctx: &DashboardContext, site: &SiteSelection) -> OutcomeBreakdown {
    match site {
        SiteSelection::All => {
            let mut successes: HashMap<&str, usize> = HashMap::new();
            for record in ctx.records().iter().filter(|r| r.outcome.is_success()) {
                *successes.entry(record.launch_site.as_str()).or_default() += 1;
            }

            let slices = ctx
                .sites()
                .iter()
                .filter_map(|name| {
                    successes.get(name.as_str()).map(|&value| Slice {
                        label: name.clone(),
                        value,
                        color: None,
                    })
                })
                .collect();

            OutcomeBreakdown {
                title: "Total Successful Launches by Site".to_string(),
                selection: site.clone(),
                slices,
            }
        }
        SiteSelection::Site(name) => {
            let (mut successes, mut failures) = (0usize, 0usize);
            for record in ctx.records().iter().filter(|r| &r.launch_site == name) {
                match record.outcome {
                    Outcome::Success => successes += 1,
                    Outcome::Failure => failures += 1,
                }
            }

            let slices = [(Outcome::Success, successes), (Outcome::Failure, failures)]
                .into_iter()
                .filter(|&(_, count)| count > 0)
                .map(|(outcome, value)| Slice {
                    label: outcome.label().to_string(),
                    value,
                    color: Some(outcome.color()),
                })
                .collect();

            OutcomeBreakdown {
                title: format!("Success vs. Failure for {}", name),
                selection: site.clone(),
                slices,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{context, example_context, record};
    use crate::data::LaunchRecord;
    use proptest::prelude::*;

    fn site(name: &str) -> SiteSelection {
        SiteSelection::Site(name.to_string())
    }

    fn value_of(breakdown: &OutcomeBreakdown, label: &str) -> Option<usize> {
        breakdown
            .slices
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.value)
    }

    #[test]
    fn test_all_sites_counts_successes_per_site() {
        let breakdown = outcome_distribution(&example_context(), &SiteSelection::All);
        assert_eq!(breakdown.slices.len(), 2);
        assert_eq!(value_of(&breakdown, "SiteA"), Some(1));
        assert_eq!(value_of(&breakdown, "SiteB"), Some(1));
        assert_eq!(breakdown.title, "Total Successful Launches by Site");
    }

    #[test]
    fn test_single_site_success_vs_failure() {
        let breakdown = outcome_distribution(&example_context(), &site("SiteA"));
        assert_eq!(value_of(&breakdown, "Success"), Some(1));
        assert_eq!(value_of(&breakdown, "Failure"), Some(1));
        assert_eq!(breakdown.title, "Success vs. Failure for SiteA");
    }

    #[test]
    fn test_site_without_successes_omitted_from_all() {
        let ctx = context(vec![
            record("SiteA", 100.0, 0, "v1"),
            record("SiteB", 200.0, 1, "v2"),
        ]);
        let breakdown = outcome_distribution(&ctx, &SiteSelection::All);
        assert_eq!(breakdown.slices.len(), 1);
        assert_eq!(breakdown.slices[0].label, "SiteB");
    }

    #[test]
    fn test_selector_value_matches_padded_site_name() {
        let ctx = context(vec![
            record("KSC LC-39A ", 100.0, 1, "FT"),
            record("KSC LC-39A ", 200.0, 0, "FT"),
        ]);
        let breakdown = outcome_distribution(&ctx, &SiteSelection::from("KSC LC-39A "));
        assert_eq!(breakdown.total(), 2);
    }

    #[test]
    fn test_colors_stable_when_failures_dominate() {
        let ctx = context(vec![
            record("SiteA", 100.0, 0, "v1"),
            record("SiteA", 200.0, 0, "v1"),
            record("SiteA", 300.0, 0, "v1"),
            record("SiteA", 400.0, 1, "v1"),
        ]);
        let breakdown = outcome_distribution(&ctx, &site("SiteA"));
        let success = breakdown.slices.iter().find(|s| s.label == "Success").unwrap();
        let failure = breakdown.slices.iter().find(|s| s.label == "Failure").unwrap();
        assert_eq!(success.color, Some("#42f56c"));
        assert_eq!(failure.color, Some("#f54242"));
        assert_eq!(failure.value, 3);
    }

    #[test]
    fn test_unknown_site_is_empty() {
        let breakdown = outcome_distribution(&example_context(), &site("Nowhere"));
        assert!(breakdown.slices.is_empty());
        assert_eq!(breakdown.total(), 0);

        let figure = breakdown.to_figure();
        match &figure.data[0] {
            Trace::Pie(pie) => assert!(pie.values.is_empty()),
            other => panic!("expected pie trace, got {:?}", other),
        }
    }

    #[test]
    fn test_figure_colors_only_for_outcome_slices() {
        let ctx = example_context();

        let all = outcome_distribution(&ctx, &SiteSelection::All).to_figure();
        let Trace::Pie(pie) = &all.data[0] else {
            panic!("expected pie trace");
        };
        assert!(pie.marker.is_none());

        let single = outcome_distribution(&ctx, &site("SiteA")).to_figure();
        let Trace::Pie(pie) = &single.data[0] else {
            panic!("expected pie trace");
        };
        assert_eq!(pie.labels, vec!["Success", "Failure"]);
        assert_eq!(
            pie.marker.as_ref().map(|m| m.colors.clone()),
            Some(vec!["#42f56c".to_string(), "#f54242".to_string()])
        );
    }

    fn arb_record() -> impl Strategy<Value = LaunchRecord> {
        (0usize..4, 0.0f64..10_000.0, 0i64..2, 0usize..3).prop_map(|(s, payload, class, b)| {
            record(&format!("Site{}", s), payload, class, &format!("B{}", b))
        })
    }

    proptest! {
        #[test]
        fn prop_slices_sum_to_matching_rows(
            records in prop::collection::vec(arb_record(), 1..60),
            pick in 0usize..5,
        ) {
            let ctx = context(records.clone());
            let selection = if pick == 4 { SiteSelection::All } else { site(&format!("Site{}", pick)) };
            let breakdown = outcome_distribution(&ctx, &selection);

            let expected = match &selection {
                SiteSelection::All => records.iter().filter(|r| r.outcome.is_success()).count(),
                SiteSelection::Site(name) => records.iter().filter(|r| &r.launch_site == name).count(),
            };
            prop_assert_eq!(breakdown.total(), expected);
        }

        #[test]
        fn prop_single_site_at_most_two_fixed_color_slices(
            records in prop::collection::vec(arb_record(), 1..60),
            pick in 0usize..4,
        ) {
            let ctx = context(records);
            let breakdown = outcome_distribution(&ctx, &site(&format!("Site{}", pick)));
            prop_assert!(breakdown.slices.len() <= 2);
            for slice in &breakdown.slices {
                let expected = if slice.label == "Success" { "#42f56c" } else { "#f54242" };
                prop_assert_eq!(slice.color, Some(expected));
                prop_assert!(slice.value > 0);
            }
        }

        #[test]
        fn prop_all_sites_labels_are_sites_with_successes(
            records in prop::collection::vec(arb_record(), 1..60),
        ) {
            let ctx = context(records.clone());
            let breakdown = outcome_distribution(&ctx, &SiteSelection::All);
            for slice in &breakdown.slices {
                prop_assert!(records.iter().any(|r| r.launch_site == slice.label && r.outcome.is_success()));
                prop_assert!(slice.color.is_none());
            }
        }

        #[test]
        fn prop_idempotent(
            records in prop::collection::vec(arb_record(), 1..40),
            pick in 0usize..5,
        ) {
            let ctx = context(records);
            let selection = if pick == 4 { SiteSelection::All } else { site(&format!("Site{}", pick)) };
            prop_assert_eq!(
                outcome_distribution(&ctx, &selection),
                outcome_distribution(&ctx, &selection)
            );
        }
    }
}
