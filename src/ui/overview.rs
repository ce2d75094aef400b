use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use agreement_board::data::FilteredView;
use agreement_board::state::AppState;

use super::plot;
use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Overview tab ("generalidades")
// ---------------------------------------------------------------------------

pub fn overview_tab(ui: &mut Ui, state: &AppState, colors: &ColorMap) {
    ui.heading("📌 Generalidades de los acuerdos");

    if let Some(err) = &state.view_error {
        ui.label(RichText::new(format!("{} ({err})", err.user_message())).color(Color32::RED));
        return;
    }
    let Some(view) = state.view() else {
        ui.label("No data loaded.");
        return;
    };

    let summary = match state.summary() {
        Some(Ok(summary)) => summary,
        Some(Err(err)) => {
            ui.label(RichText::new(format!("{} ({err})", err.user_message())).color(Color32::RED));
            return;
        }
        None => return,
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.add_space(6.0);
            ui.strong("📊 Resumen");
            ui.columns(3, |cols| {
                metric(&mut cols[0], "Total entidades", summary.total);
                metric(&mut cols[1], "Entidades privadas", summary.private);
                metric(&mut cols[2], "Entidades públicas", summary.public);
            });

            ui.separator();
            ui.strong("📈 Distribución por tipo de acuerdo");
            plot::pie_chart(ui, "agreement_type_pie", &summary.by_agreement_type, colors);

            ui.separator();
            ui.strong("📄 Matriz filtrada");
            table(ui, &view, &state.layout.table);
        });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value.to_string()).size(30.0).strong());
    });
}

/// The filtered rows restricted to the configured table columns.
fn table(ui: &mut Ui, view: &FilteredView<'_>, wanted: &[String]) {
    let dataset = view.dataset();
    let (present, missing): (Vec<&String>, Vec<&String>) =
        wanted.iter().partition(|c| dataset.has_column(c));
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
        ui.label(
            RichText::new(format!("Columnas ausentes: {}", names.join(", ")))
                .color(Color32::YELLOW),
        );
    }
    let indices: Vec<usize> = present
        .iter()
        .filter_map(|c| dataset.column_index(c).ok())
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .columns(Column::auto().at_least(80.0).clip(true), indices.len())
        .header(22.0, |mut header| {
            for name in &present {
                header.col(|ui| {
                    ui.strong(name.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(20.0, view.len(), |mut row| {
                let Some(record) = view.row(row.index()) else {
                    return;
                };
                for &idx in &indices {
                    row.col(|ui| {
                        ui.label(record.value_at(idx).unwrap_or_default());
                    });
                }
            });
        });
}
