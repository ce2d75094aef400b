use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::ColorMap;

/// Inner radius of the donut, as a fraction of the outer radius.
const HOLE: f64 = 0.3;

/// Largest arc (radians) drawn as one quad; keeps every piece convex.
const MAX_STEP: f64 = TAU / 120.0;

// ---------------------------------------------------------------------------
// Distribution pie chart
// ---------------------------------------------------------------------------

/// Render `(label, count)` slices as a donut chart, clockwise from 12 o'clock.
pub fn pie_chart(ui: &mut Ui, id: &str, slices: &[(String, usize)], colors: &ColorMap) {
    let total: usize = slices.iter().map(|(_, n)| n).sum();
    if total == 0 {
        ui.label("No hay datos para graficar con los filtros seleccionados.");
        return;
    }

    Plot::new(id)
        .legend(Legend::default())
        .data_aspect(1.0)
        .height(340.0)
        .show_axes(false)
        .show_grid(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.2)
        .include_y(1.2)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (label, n) in slices {
                let share = *n as f64 / total as f64;
                let end = start + share * TAU;
                let name = if label.is_empty() { "(vacío)" } else { label.as_str() };
                let color = colors.color_for(label);

                for (a, b) in arc_steps(start, end) {
                    let quad: PlotPoints = [
                        point_at(a, 1.0),
                        point_at(b, 1.0),
                        point_at(b, HOLE),
                        point_at(a, HOLE),
                    ]
                    .into_iter()
                    .collect();
                    plot_ui.polygon(
                        Polygon::new(quad)
                            .name(name)
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, color)),
                    );
                }

                let mid = point_at((start + end) / 2.0, (1.0 + HOLE) / 2.0);
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(mid[0], mid[1]),
                        RichText::new(format!("{:.1}%", share * 100.0))
                            .color(Color32::WHITE)
                            .strong(),
                    )
                    .name(name),
                );

                start = end;
            }
        });
}

/// Split `[start, end)` into consecutive sub-arcs of at most `MAX_STEP`.
fn arc_steps(start: f64, end: f64) -> Vec<(f64, f64)> {
    let steps = ((end - start) / MAX_STEP).ceil().max(1.0) as usize;
    let width = (end - start) / steps as f64;
    (0..steps)
        .map(|i| (start + i as f64 * width, start + (i + 1) as f64 * width))
        .collect()
}

/// Point at `angle` (clockwise from 12 o'clock) and `radius`.
fn point_at(angle: f64, radius: f64) -> [f64; 2] {
    [radius * angle.sin(), radius * angle.cos()]
}
