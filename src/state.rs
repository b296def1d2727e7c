use std::path::{Path, PathBuf};

use crate::color::CategoryColors;
use crate::data::filter::{FilterParams, QueryViews, compute_views};
use crate::data::loader::load_file;
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Application context
// ---------------------------------------------------------------------------

/// The loaded dataset and where it came from. Built once at startup (or on
/// File → Open) and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub dataset: LaunchDataset,
    /// `None` for datasets that were not read from disk.
    pub source: Option<PathBuf>,
}

impl DashboardContext {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(DashboardContext {
            dataset: load_file(path)?,
            source: Some(path.to_path_buf()),
        })
    }

    #[cfg(test)]
    pub fn from_dataset(dataset: LaunchDataset) -> Self {
        DashboardContext {
            dataset,
            source: None,
        }
    }

    /// All sites over the full observed payload range.
    pub fn default_params(&self) -> FilterParams {
        FilterParams::new(SiteSelection::AllSites, self.dataset.full_payload_range())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded data (None until a file loads successfully).
    pub context: Option<DashboardContext>,

    /// Current site selection and payload range.
    pub params: FilterParams,

    /// Chart inputs for `params` (cached, recomputed on every change).
    pub views: QueryViews,

    /// Booster category colours for the scatter chart.
    pub colors: CategoryColors,

    /// Payload slider step in kg.
    pub payload_step_kg: f64,

    /// Labelled payload marks shown under the sliders, in kg.
    pub payload_marks_kg: Vec<f64>,

    /// Text typed into the site selector's search box.
    pub site_search: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            context: None,
            params: FilterParams::new(SiteSelection::AllSites, PayloadRange::new(0.0, 0.0)),
            views: QueryViews::default(),
            colors: CategoryColors::default(),
            payload_step_kg: 1000.0,
            payload_marks_kg: vec![2500.0, 5000.0, 7500.0],
            site_search: String::new(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(payload_step_kg: f64, payload_marks_kg: Vec<f64>) -> Self {
        Self {
            payload_step_kg,
            payload_marks_kg,
            ..Self::default()
        }
    }

    pub fn dataset(&self) -> Option<&LaunchDataset> {
        self.context.as_ref().map(|ctx| &ctx.dataset)
    }

    /// Install a freshly loaded context and reset filters to their defaults.
    pub fn set_context(&mut self, context: DashboardContext) {
        self.params = context.default_params();
        self.colors = CategoryColors::new(&context.dataset.booster_categories);
        self.context = Some(context);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the chart inputs from the current filters.
    pub fn refresh(&mut self) {
        let Some(ctx) = &self.context else {
            self.views = QueryViews::default();
            return;
        };
        self.views = compute_views(&ctx.dataset.records, &self.params);
        log::debug!(
            "Filter {} {:.0}..={:.0} kg matched {} launches",
            self.params.site,
            self.params.payload_range.low,
            self.params.payload_range.high,
            self.views.points.len()
        );
    }

    pub fn set_site(&mut self, site: SiteSelection) {
        if self.params.site != site {
            self.params.site = site;
            self.refresh();
        }
    }

    /// Select a site by its selector label. Labels that name no loaded site
    /// are ignored and `false` is returned.
    pub fn select_site_label(&mut self, label: &str) -> bool {
        let site = SiteSelection::from_label(label);
        let known = match &site {
            SiteSelection::AllSites => true,
            SiteSelection::Site(name) => self.dataset().is_some_and(|ds| ds.has_site(name)),
        };
        if known {
            self.set_site(site);
        } else {
            log::warn!("Unknown launch site '{label}'");
        }
        known
    }

    /// Move whichever payload bound is closer to `mark_kg` onto it.
    pub fn snap_payload_to_mark(&mut self, mark_kg: f64) {
        let PayloadRange { low, high } = self.params.payload_range;
        let range = if (mark_kg - low).abs() <= (high - mark_kg).abs() {
            PayloadRange::new(mark_kg, high)
        } else {
            PayloadRange::new(low, mark_kg)
        };
        self.set_payload_range(range);
    }

    /// Update the payload range, keeping `low <= high` and both ends within
    /// the observed payload bounds.
    pub fn set_payload_range(&mut self, range: PayloadRange) {
        let (mut low, mut high) = (range.low, range.high);
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        if let Some(bounds) = self.dataset().and_then(|ds| ds.payload_bounds) {
            low = low.clamp(bounds.low, bounds.high);
            high = high.clamp(bounds.low, bounds.high);
        }

        let range = PayloadRange::new(low, high);
        if self.params.payload_range != range {
            self.params.payload_range = range;
            self.refresh();
        }
    }

    pub fn reset_filters(&mut self) {
        if let Some(ctx) = &self.context {
            self.params = ctx.default_params();
            self.refresh();
        }
    }

    /// Load a new dataset from `path`, replacing the current one on success.
    pub fn open_path(&mut self, path: &Path) {
        match DashboardContext::load(path) {
            Ok(context) => self.set_context(context),
            Err(e) => self.fail(e),
        }
    }

    /// Re-read the current dataset from its source file. The selected site
    /// survives the reload if it is still present.
    pub fn reload(&mut self) {
        let Some(source) = self.context.as_ref().and_then(|ctx| ctx.source.clone()) else {
            return;
        };
        let site = self.params.site.clone();
        match DashboardContext::load(&source) {
            Ok(context) => {
                self.set_context(context);
                if let SiteSelection::Site(name) = &site {
                    if self.dataset().is_some_and(|ds| ds.has_site(name)) {
                        self.set_site(site.clone());
                    }
                }
            }
            Err(e) => self.fail(e),
        }
    }

    /// Log a load failure and surface it in the top bar.
    pub fn fail(&mut self, e: anyhow::Error) {
        log::error!("Failed to load dataset: {e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }
}
