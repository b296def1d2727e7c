use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// OutcomeClass – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome as encoded in the `class` column: 1 = success, 0 = failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeClass {
    Failure,
    Success,
}

impl OutcomeClass {
    #[cfg(test)]
    pub const ALL: [OutcomeClass; 2] = [OutcomeClass::Failure, OutcomeClass::Success];

    /// Interpret an integer class code. Only 0 and 1 are valid.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(OutcomeClass::Failure),
            1 => Some(OutcomeClass::Success),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            OutcomeClass::Failure => 0,
            OutcomeClass::Success => 1,
        }
    }

    /// Human-readable name for legends and summaries.
    pub fn label(self) -> &'static str {
        match self {
            OutcomeClass::Failure => "Failure",
            OutcomeClass::Success => "Success",
        }
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the launch table
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub booster_version_category: String,
    pub outcome: OutcomeClass,
}

impl LaunchRecord {
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        booster_version_category: impl Into<String>,
        outcome: OutcomeClass,
    ) -> Self {
        LaunchRecord {
            launch_site: launch_site.into(),
            payload_mass_kg,
            booster_version_category: booster_version_category.into(),
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter inputs
// ---------------------------------------------------------------------------

/// Label of the "no site restriction" entry in the site selector.
pub const ALL_SITES_LABEL: &str = "All Sites";

/// Which launch site(s) the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    AllSites,
    Site(String),
}

impl SiteSelection {
    /// Parse a selector value; the "All Sites" label maps to the sentinel.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_SITES_LABEL {
            SiteSelection::AllSites
        } else {
            SiteSelection::Site(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SiteSelection::AllSites => ALL_SITES_LABEL,
            SiteSelection::Site(site) => site,
        }
    }

    /// Whether a record launched from `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::AllSites => true,
            SiteSelection::Site(selected) => selected == site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive payload mass interval in kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    /// Inclusive on both ends. An inverted range contains nothing.
    pub fn contains(&self, mass_kg: f64) -> bool {
        self.low <= mass_kg && mass_kg <= self.high
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All loaded launch records with values derived once at load time.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    pub records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    pub sites: Vec<String>,
    /// Sorted distinct booster version categories.
    pub booster_categories: BTreeSet<String>,
    /// Observed (min, max) payload mass; `None` for an empty dataset.
    pub payload_bounds: Option<PayloadRange>,
}

impl LaunchDataset {
    /// Build the derived indices from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();
        let mut payload_bounds: Option<PayloadRange> = None;

        for rec in &records {
            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_version_category.clone());

            let mass = rec.payload_mass_kg;
            payload_bounds = Some(match payload_bounds {
                None => PayloadRange::new(mass, mass),
                Some(b) => PayloadRange::new(b.low.min(mass), b.high.max(mass)),
            });
        }

        LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    /// Site selector entries: the sentinel first, then every observed site.
    pub fn site_options(&self) -> Vec<SiteSelection> {
        std::iter::once(SiteSelection::AllSites)
            .chain(self.sites.iter().cloned().map(SiteSelection::Site))
            .collect()
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// Payload range covering every record (`0..=0` when empty).
    pub fn full_payload_range(&self) -> PayloadRange {
        self.payload_bounds.unwrap_or(PayloadRange::new(0.0, 0.0))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
