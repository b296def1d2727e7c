use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::outcome_color;
use crate::data::model::{PayloadRange, SiteSelection};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("SpaceX Launch Records Dashboard");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Copy out what the widgets need so state can be mutated below.
    let site_options = dataset.site_options();
    let bounds = dataset.full_payload_range();

    // ---- Site selector ----
    ui.strong("Launch site");
    let mut selected = state.params.site.clone();
    let search = &mut state.site_search;
    egui::ComboBox::from_id_salt("site_selector")
        .selected_text(selected.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(egui::TextEdit::singleline(search).hint_text("Select a Launch Site here"));
            for option in search_sites(&site_options, search.as_str()) {
                ui.selectable_value(&mut selected, option.clone(), option.label());
            }
        });
    state.set_site(selected);
    ui.separator();

    // ---- Payload range ----
    ui.strong("Payload range (kg)");
    let PayloadRange { mut low, mut high } = state.params.payload_range;
    let step = state.payload_step_kg;
    let low_changed = ui
        .add(
            egui::Slider::new(&mut low, bounds.low..=bounds.high)
                .text("From")
                .suffix(" kg")
                .step_by(step),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut high, bounds.low..=bounds.high)
                .text("To")
                .suffix(" kg")
                .step_by(step),
        )
        .changed();
    if low_changed && low > high {
        high = low;
    }
    if high_changed && high < low {
        low = high;
    }
    if low_changed || high_changed {
        state.set_payload_range(PayloadRange::new(low, high));
    }

    let marks: Vec<f64> = state
        .payload_marks_kg
        .iter()
        .copied()
        .filter(|m| bounds.low <= *m && *m <= bounds.high)
        .collect();
    if !marks.is_empty() {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for mark in marks {
                if ui
                    .small_button(format!("{mark:.0} (Kg)"))
                    .on_hover_text("Move the nearer bound here")
                    .clicked()
                {
                    state.snap_payload_to_mark(mark);
                }
            }
        });
    }

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }
    ui.separator();

    // ---- Outcome summary ----
    ui.strong("Outcomes");
    let counts = &state.views.counts;
    if counts.is_empty() {
        ui.weak("No matching launches");
    }
    for (class, n) in counts.iter().rev() {
        ui.label(
            RichText::new(format!(
                "{}: {n}  ({:.1}%)",
                class.label(),
                counts.share(class) * 100.0
            ))
            .color(outcome_color(class)),
        );
    }

    ui.separator();
    ui.strong("Booster version");
    for (category, color) in state.colors.legend_entries() {
        ui.label(RichText::new(format!("● {category}")).color(color));
    }
}

/// Site selector entries whose label contains `query` (case-insensitive).
/// The "All Sites" entry is always offered.
pub fn search_sites<'a>(options: &'a [SiteSelection], query: &str) -> Vec<&'a SiteSelection> {
    let query = query.trim().to_lowercase();
    options
        .iter()
        .filter(|option| {
            *option == &SiteSelection::AllSites
                || query.is_empty()
                || option.label().to_lowercase().contains(&query)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_reload = state
                .context
                .as_ref()
                .is_some_and(|ctx| ctx.source.is_some());
            if ui
                .add_enabled(can_reload, egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dataset() {
            ui.label(format!(
                "{} launches loaded, {} matching",
                ds.len(),
                state.views.points.len()
            ));
        }

        if state.params.site != SiteSelection::AllSites {
            ui.separator();
            ui.label(format!("Site: {}", state.params.site));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
