use eframe::egui::{self, Color32, RichText, Ui};

use agreement_board::data::Row;
use agreement_board::state::AppState;

const INFO_FILL: Color32 = Color32::from_rgb(0x1C, 0x3D, 0x5A);
const WARNING_FILL: Color32 = Color32::from_rgb(0x5C, 0x4A, 0x12);

// ---------------------------------------------------------------------------
// Details tab ("detalles")
// ---------------------------------------------------------------------------

pub fn details_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📑 Detalles de la gestión por entidad");

    let entities = match state.entity_options() {
        Ok(entities) => entities,
        Err(err) => {
            ui.label(RichText::new(format!("{} ({err})", err.user_message())).color(Color32::RED));
            return;
        }
    };
    if entities.is_empty() {
        ui.label("No data loaded.");
        return;
    }

    let current = state.selected_entity.clone().unwrap_or_default();
    egui::ComboBox::from_label("Selecciona una entidad")
        .selected_text(&current)
        .width(360.0)
        .show_ui(ui, |ui: &mut Ui| {
            for entity in &entities {
                if ui.selectable_label(current == *entity, entity).clicked() {
                    state.select_entity(entity.clone());
                }
            }
        });
    ui.add_space(8.0);

    let row = match state.selected_row() {
        Some(Ok(row)) => row,
        Some(Err(err)) => {
            ui.label(RichText::new(err.user_message()).color(Color32::YELLOW));
            return;
        }
        None => return,
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            entity_card(ui, state, row);
            ui.separator();

            let sections = &state.layout.detail_sections;
            let (pairs, highlighted): (Vec<_>, Vec<_>) =
                sections.iter().partition(|s| !s.highlight);

            for chunk in pairs.chunks(2) {
                ui.columns(chunk.len(), |cols| {
                    for (col_ui, section) in cols.iter_mut().zip(chunk) {
                        callout(col_ui, &section.title, row.get(&section.column), INFO_FILL);
                    }
                });
            }
            for section in highlighted {
                callout(ui, &section.title, row.get(&section.column), WARNING_FILL);
            }
        });
}

/// Logo on the left, name and summary bullets on the right.
fn entity_card(ui: &mut Ui, state: &AppState, row: &Row) {
    let layout = &state.layout;
    ui.horizontal(|ui: &mut Ui| {
        match row.get(&layout.logo).filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                ui.add(egui::Image::from_uri(url.trim()).max_width(140.0));
            }
            None => {
                ui.add_sized([140.0, 140.0], egui::Label::new("(sin logo)"));
            }
        }

        ui.vertical(|ui: &mut Ui| {
            let name = row.get(&layout.entity).unwrap_or_default();
            ui.label(RichText::new(name).size(24.0).strong());
            for field in &layout.detail_fields {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("• {field}:")).strong());
                    ui.label(row.get(field).unwrap_or("—"));
                });
            }
        });
    });
}

fn callout(ui: &mut Ui, title: &str, body: Option<&str>, fill: Color32) {
    ui.add_space(6.0);
    ui.strong(title);
    egui::Frame::group(ui.style()).fill(fill).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        match body {
            Some(text) if !text.trim().is_empty() => {
                ui.label(RichText::new(text).color(Color32::WHITE));
            }
            Some(_) => {
                ui.label(RichText::new("Sin información.").italics());
            }
            None => {
                ui.label(RichText::new("Columna no encontrada en la hoja.").italics());
            }
        }
    });
}
