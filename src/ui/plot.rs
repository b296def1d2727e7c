use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, FontId, Mesh, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Legend, MarkerShape, Plot, Points};

use crate::color::outcome_color;
use crate::data::filter::{OutcomeCounts, pie_title};
use crate::data::model::OutcomeClass;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: pie on top, scatter below
// ---------------------------------------------------------------------------

/// Render both charts in the central panel.
pub fn charts(ui: &mut Ui, state: &AppState) {
    if state.context.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a launch table to start  (File → Open…)");
        });
        return;
    }
    if state.dataset().is_some_and(|ds| ds.is_empty()) {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("The loaded launch table has no rows.");
        });
        return;
    }

    let half = (ui.available_height() * 0.5).max(200.0);

    ui.allocate_ui(Vec2::new(ui.available_width(), half), |ui: &mut Ui| {
        ui.heading(pie_title(&state.params.site));
        outcome_pie(ui, &state.views.counts);
    });
    ui.separator();
    ui.heading("Correlation between Payload and Success");
    payload_scatter(ui, state);
}

// ---------------------------------------------------------------------------
// Proportion chart
// ---------------------------------------------------------------------------

/// One pie slice. Angles are in radians, clockwise from twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub class: OutcomeClass,
    pub count: usize,
    pub share: f64,
    pub start: f32,
    pub sweep: f32,
}

/// Lay out one wedge per present outcome class, success first.
pub fn pie_wedges(counts: &OutcomeCounts) -> Vec<Wedge> {
    let mut start = 0.0_f32;
    let mut wedges = Vec::new();
    for (class, count) in counts.iter().rev() {
        let share = counts.share(class);
        let sweep = share as f32 * TAU;
        wedges.push(Wedge {
            class,
            count,
            share,
            start,
            sweep,
        });
        start += sweep;
    }
    wedges
}

fn point_on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    // angle 0 points up, increasing clockwise in screen space
    let a = angle - FRAC_PI_2;
    center + Vec2::new(a.cos(), a.sin()) * radius
}

/// Triangle fan for one wedge; a mesh copes with wedges wider than 180°.
fn wedge_mesh(center: Pos2, radius: f32, wedge: &Wedge, color: Color32) -> Mesh {
    let segments = ((wedge.sweep / (TAU / 128.0)).ceil() as u32).max(2);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for i in 0..=segments {
        let angle = wedge.start + wedge.sweep * i as f32 / segments as f32;
        mesh.colored_vertex(point_on_circle(center, radius, angle), color);
    }
    for i in 1..=segments {
        mesh.add_triangle(0, i, i + 1);
    }
    mesh
}

fn outcome_pie(ui: &mut Ui, counts: &OutcomeCounts) {
    if counts.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No launches match the current filters.");
        });
        return;
    }

    let wedges = pie_wedges(counts);

    ui.horizontal(|ui: &mut Ui| {
        let side = ui.available_height().min(ui.available_width() * 0.6).max(120.0);
        let (rect, _response) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = side * 0.45;

        for wedge in &wedges {
            let color = outcome_color(wedge.class);
            painter.add(Shape::mesh(wedge_mesh(center, radius, wedge, color)));
        }
        if wedges.len() > 1 {
            for wedge in &wedges {
                painter.line_segment(
                    [center, point_on_circle(center, radius, wedge.start)],
                    Stroke::new(1.5, ui.visuals().panel_fill),
                );
            }
        }
        for wedge in &wedges {
            let mid = wedge.start + wedge.sweep * 0.5;
            let anchor = if wedges.len() == 1 {
                center
            } else {
                point_on_circle(center, radius * 0.6, mid)
            };
            painter.text(
                anchor,
                Align2::CENTER_CENTER,
                format!("{:.1}%", wedge.share * 100.0),
                FontId::proportional(14.0),
                Color32::WHITE,
            );
        }

        ui.vertical(|ui: &mut Ui| {
            ui.strong("class");
            for wedge in &wedges {
                ui.label(
                    RichText::new(format!(
                        "■ {} ({}): {}",
                        wedge.class,
                        wedge.class.label(),
                        wedge.count
                    ))
                    .color(outcome_color(wedge.class)),
                );
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

/// Payload mass against outcome class, one series per booster category.
fn payload_scatter(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset() else {
        return;
    };
    if state.views.points.is_empty() {
        ui.weak("No launches in the selected site and payload range.");
    }

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for category in &dataset.booster_categories {
                let points: Vec<[f64; 2]> = state
                    .views
                    .points
                    .records(&dataset.records)
                    .filter(|rec| &rec.booster_version_category == category)
                    .map(|rec| [rec.payload_mass_kg, f64::from(rec.outcome.code())])
                    .collect();
                if points.is_empty() {
                    continue;
                }

                plot_ui.points(
                    Points::new(points)
                        .name(category)
                        .color(state.colors.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}
