use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use agreement_board::state::{AppState, Tab};

use super::{BRAND_TEAL, BRAND_TEAL_DARK};
use crate::color::ColorMap;

/// Something the panels ask the app to do with the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch the sheet again, bypassing the cache.
    Reload,
    /// Switch to a local CSV export.
    OpenCsv(PathBuf),
}

// ---------------------------------------------------------------------------
// Header band
// ---------------------------------------------------------------------------

/// Render the logo / title band.
pub fn header(ui: &mut Ui, title: &str, logo_url: Option<&str>) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui: &mut Ui| {
        if let Some(url) = logo_url {
            ui.add(egui::Image::from_uri(url).max_height(90.0));
        }
        ui.label(RichText::new(title).color(Color32::WHITE).size(22.0).strong());
    });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu bar and status line.
pub fn top_bar(ui: &mut Ui, state: &AppState) -> Option<Action> {
    let mut action = None;
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload").clicked() {
                action = Some(Action::Reload);
                ui.close_menu();
            }
            if ui.button("Open CSV export…").clicked() {
                action = open_file_dialog().map(Action::OpenCsv);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} agreements loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }
        if let Some(label) = &state.source_label {
            ui.separator();
            ui.label(RichText::new(label).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
            if state.can_retry && ui.small_button("Retry").clicked() {
                action = Some(Action::Reload);
            }
        }
    });
    action
}

// ---------------------------------------------------------------------------
// Tab bar
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let tab_width = 160.0;
        let spare = ui.available_width() - tab_width * Tab::ALL.len() as f32;
        ui.add_space((spare / 2.0).max(0.0));
        for tab in Tab::ALL {
            let selected = state.tab == tab;
            let text = RichText::new(tab.label())
                .color(Color32::WHITE)
                .size(18.0)
                .strong();
            let fill = if selected { BRAND_TEAL_DARK } else { BRAND_TEAL };
            let button = egui::Button::new(text)
                .fill(fill)
                .min_size(egui::vec2(tab_width, 28.0));
            if ui.add(button).clicked() {
                state.tab = tab;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the overview filters (entity type, agreement type).
pub fn side_panel(ui: &mut Ui, state: &mut AppState, colors: &ColorMap) {
    ui.heading("Filtros");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No data loaded.");
        return;
    }

    let agreement_column = state.layout.agreement_type.clone();
    let columns: Vec<String> = state
        .layout
        .filter_columns()
        .iter()
        .map(|c| c.to_string())
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let options = match state.filter_options(col) {
                    Ok(options) => options,
                    Err(err) => {
                        ui.label(RichText::new(err.to_string()).color(Color32::RED));
                        continue;
                    }
                };

                // Show count of selected / total in the header
                let n_selected = state.filters.accepted(col).map_or(0, |s| s.len());
                let header_text = if n_selected == 0 {
                    format!("{col}  (todos)")
                } else {
                    format!("{col}  ({n_selected}/{})", options.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("Limpiar").clicked() {
                            state.clear_filter(col);
                        }

                        for value in &options {
                            let label = if value.is_empty() {
                                "(vacío)".to_string()
                            } else {
                                value.clone()
                            };
                            let mut text = RichText::new(label);
                            if *col == agreement_column {
                                text = text.color(colors.color_for(value));
                            }

                            let mut checked = state.filters.is_selected(col, value);
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(col, value);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open agreements CSV export")
        .add_filter("CSV", &["csv"])
        .pick_file()
}
