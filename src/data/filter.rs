use std::collections::BTreeMap;

use super::model::{LaunchRecord, OutcomeClass, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Filter parameters: site selector + payload range slider
// ---------------------------------------------------------------------------

/// The two user-controlled filters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

impl FilterParams {
    pub fn new(site: SiteSelection, payload_range: PayloadRange) -> Self {
        FilterParams {
            site,
            payload_range,
        }
    }

    /// Whether a single record passes both filters.
    pub fn matches(&self, rec: &LaunchRecord) -> bool {
        self.site.matches(&rec.launch_site) && self.payload_range.contains(rec.payload_mass_kg)
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Number of matching launches per outcome class. Classes without a match
/// are absent, so an empty selection yields an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    counts: BTreeMap<OutcomeClass, usize>,
}

impl OutcomeCounts {
    pub fn get(&self, class: OutcomeClass) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Fraction of the total in `class`, or 0 when nothing matched.
    pub fn share(&self, class: OutcomeClass) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(class) as f64 / total as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Present classes in ascending order (failure before success).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (OutcomeClass, usize)> + '_ {
        self.counts.iter().map(|(class, n)| (*class, *n))
    }

    fn record(&mut self, class: OutcomeClass) {
        *self.counts.entry(class).or_insert(0) += 1;
    }
}

impl FromIterator<(OutcomeClass, usize)> for OutcomeCounts {
    fn from_iter<T: IntoIterator<Item = (OutcomeClass, usize)>>(iter: T) -> Self {
        OutcomeCounts {
            counts: iter.into_iter().filter(|(_, n)| *n > 0).collect(),
        }
    }
}

/// Matching records, kept as indices into the dataset in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSet {
    pub indices: Vec<usize>,
}

impl PointSet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the indices against the record slice they were computed from.
    /// Panics if given a shorter slice.
    pub fn records<'a>(
        &'a self,
        records: &'a [LaunchRecord],
    ) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Both chart inputs for one filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryViews {
    /// Backs the proportion (pie) chart.
    pub counts: OutcomeCounts,
    /// Backs the payload vs. outcome scatter chart.
    pub points: PointSet,
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Return indices of records passing the site filter, then the payload filter.
pub fn filtered_indices(records: &[LaunchRecord], params: &FilterParams) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| params.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Compute the grouped outcome counts and the scatter point set.
///
/// Malformed parameters (unknown site, inverted or negative range) are not
/// errors; they just match nothing.
pub fn compute_views(records: &[LaunchRecord], params: &FilterParams) -> QueryViews {
    let indices = filtered_indices(records, params);

    let mut counts = OutcomeCounts::default();
    for &i in &indices {
        counts.record(records[i].outcome);
    }

    QueryViews {
        counts,
        points: PointSet { indices },
    }
}

/// Title of the proportion chart for a site selection.
pub fn pie_title(site: &SiteSelection) -> String {
    format!("Total Success Launches for {}", site.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_records() -> Vec<LaunchRecord> {
        vec![
            LaunchRecord::new("siteX", 2000.0, "v1.0", OutcomeClass::Success),
            LaunchRecord::new("siteX", 6000.0, "v1.0", OutcomeClass::Failure),
            LaunchRecord::new("siteY", 3000.0, "v1.1", OutcomeClass::Success),
        ]
    }

    fn params(site: &str, low: f64, high: f64) -> FilterParams {
        FilterParams::new(SiteSelection::from_label(site), PayloadRange::new(low, high))
    }

    fn counts(success: usize, failure: usize) -> OutcomeCounts {
        [
            (OutcomeClass::Success, success),
            (OutcomeClass::Failure, failure),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn all_sites_full_range_keeps_everything() {
        let records = scenario_records();
        let views = compute_views(&records, &params("All Sites", 0.0, 10000.0));
        assert_eq!(views.points.indices, vec![0, 1, 2]);
        assert_eq!(views.counts, counts(2, 1));
    }

    #[test]
    fn concrete_site_keeps_only_that_site() {
        let records = scenario_records();
        let views = compute_views(&records, &params("siteX", 0.0, 10000.0));
        assert_eq!(views.points.indices, vec![0, 1]);
        assert!(views.points.records(&records).all(|r| r.launch_site == "siteX"));
        assert_eq!(views.counts, counts(1, 1));
    }

    #[test]
    fn payload_lower_bound_excludes_light_launch() {
        let records = scenario_records();
        let views = compute_views(&records, &params("All Sites", 2500.0, 10000.0));
        assert_eq!(views.points.indices, vec![1, 2]);
        assert_eq!(views.counts, counts(1, 1));
    }

    #[test]
    fn range_outside_all_payloads_is_empty() {
        let records = scenario_records();
        let views = compute_views(&records, &params("All Sites", 9000.0, 9500.0));
        assert!(views.points.is_empty());
        assert!(views.counts.is_empty());
        assert_eq!(views.counts.total(), 0);
        assert_eq!(views.counts.share(OutcomeClass::Success), 0.0);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let records = scenario_records();
        let views = compute_views(&records, &params("All Sites", 2000.0, 3000.0));
        assert_eq!(views.points.indices, vec![0, 2]);
    }

    #[test]
    fn full_observed_range_matches_global_counts() {
        let records = scenario_records();
        let ds = crate::data::model::LaunchDataset::from_records(records.clone());
        let p = FilterParams::new(SiteSelection::AllSites, ds.full_payload_range());
        let views = compute_views(&records, &p);
        assert_eq!(views.points.len(), records.len());
        assert_eq!(views.counts.get(OutcomeClass::Success), 2);
        assert_eq!(views.counts.get(OutcomeClass::Failure), 1);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let records = scenario_records();
        let p = params("siteX", 1500.0, 7000.0);
        let first = compute_views(&records, &p);
        let _ = compute_views(&records, &params("siteY", 0.0, 1.0));
        let second = compute_views(&records, &p);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_params_yield_empty_views() {
        let records = scenario_records();
        assert!(compute_views(&records, &params("nowhere", 0.0, 10000.0))
            .points
            .is_empty());
        assert!(compute_views(&records, &params("All Sites", 8000.0, 1000.0))
            .points
            .is_empty());
        assert!(compute_views(&records, &params("All Sites", -500.0, -1.0))
            .points
            .is_empty());
    }

    #[test]
    fn share_is_relative_to_filtered_total() {
        let records = scenario_records();
        let views = compute_views(&records, &params("All Sites", 0.0, 10000.0));
        let success = views.counts.share(OutcomeClass::Success);
        assert!((success - 2.0 / 3.0).abs() < 1e-12);
        let classes: Vec<_> = views.counts.iter().map(|(c, _)| c).collect();
        assert_eq!(classes, vec![OutcomeClass::Failure, OutcomeClass::Success]);
    }

    #[test]
    fn pie_title_names_the_selection() {
        assert_eq!(
            pie_title(&SiteSelection::AllSites),
            "Total Success Launches for All Sites"
        );
        assert_eq!(
            pie_title(&SiteSelection::Site("KSC LC-39A".into())),
            "Total Success Launches for KSC LC-39A"
        );
    }

    #[test]
    #[should_panic]
    fn resolving_against_wrong_slice_panics() {
        let records = scenario_records();
        let views = compute_views(&records, &params("All Sites", 0.0, 10000.0));
        let _ = views.points.records(&records[..1]).count();
    }

    mod properties {
        use proptest::prelude::*;
        use proptest::sample::Index;

        use crate::data::filter::{FilterParams, compute_views};
        use crate::data::model::{
            LaunchDataset, LaunchRecord, OutcomeClass, PayloadRange, SiteSelection,
        };

        const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];
        const BOOSTERS: [&str; 4] = ["v1.0", "v1.1", "FT", "B5"];

        fn launch() -> impl Strategy<Value = LaunchRecord> {
            (0..SITES.len(), 0u32..=10_000, 0..BOOSTERS.len(), any::<bool>()).prop_map(
                |(site, mass, booster, success)| {
                    let outcome = if success {
                        OutcomeClass::Success
                    } else {
                        OutcomeClass::Failure
                    };
                    LaunchRecord::new(SITES[site], f64::from(mass), BOOSTERS[booster], outcome)
                },
            )
        }

        /// Sentinel or an observed site, with bounds that may be inverted or negative.
        fn query(records: &[LaunchRecord], site: Index, low: i32, high: i32) -> FilterParams {
            let options = LaunchDataset::from_records(records.to_vec()).site_options();
            FilterParams::new(
                options[site.index(options.len())].clone(),
                PayloadRange::new(f64::from(low), f64::from(high)),
            )
        }

        fn brute_force(records: &[LaunchRecord], p: &FilterParams) -> Vec<usize> {
            let mut out = Vec::new();
            for (i, rec) in records.iter().enumerate() {
                let site_ok = match &p.site {
                    SiteSelection::AllSites => true,
                    SiteSelection::Site(s) => *s == rec.launch_site,
                };
                let mass = rec.payload_mass_kg;
                if site_ok && p.payload_range.low <= mass && mass <= p.payload_range.high {
                    out.push(i);
                }
            }
            out
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn prop_views_match_reference_filter(
                records in prop::collection::vec(launch(), 0..80),
                site in any::<Index>(),
                low in -2_000i32..=12_000,
                high in -2_000i32..=12_000,
            ) {
                let p = query(&records, site, low, high);
                let views = compute_views(&records, &p);

                prop_assert_eq!(&views.points.indices, &brute_force(&records, &p));
                prop_assert_eq!(views.counts.total(), views.points.len());
                for rec in views.points.records(&records) {
                    prop_assert!(p.site.matches(&rec.launch_site));
                    if let SiteSelection::Site(s) = &p.site {
                        prop_assert_eq!(&rec.launch_site, s);
                    }
                    prop_assert!(p.payload_range.low <= rec.payload_mass_kg);
                    prop_assert!(rec.payload_mass_kg <= p.payload_range.high);
                }
                for class in OutcomeClass::ALL {
                    let expected = views
                        .points
                        .records(&records)
                        .filter(|r| r.outcome == class)
                        .count();
                    prop_assert_eq!(views.counts.get(class), expected);
                }

                prop_assert_eq!(compute_views(&records, &p), views);
            }

            #[test]
            fn prop_full_range_all_sites_is_whole_dataset(
                records in prop::collection::vec(launch(), 0..80),
            ) {
                let ds = LaunchDataset::from_records(records.clone());
                let p = FilterParams::new(SiteSelection::AllSites, ds.full_payload_range());
                let views = compute_views(&records, &p);

                prop_assert_eq!(views.points.indices, (0..records.len()).collect::<Vec<_>>());
                let successes = records.iter().filter(|r| r.outcome == OutcomeClass::Success).count();
                prop_assert_eq!(views.counts.get(OutcomeClass::Success), successes);
                prop_assert_eq!(views.counts.get(OutcomeClass::Failure), records.len() - successes);
            }
        }
    }
}
