use eframe::egui;

use agreement_board::config::{AppConfig, UiConfig};
use agreement_board::source::{self, CsvFileSource, SheetSource};
use agreement_board::state::{AppState, Tab};

use crate::color::ColorMap;
use crate::ui::panels::{self, Action};
use crate::ui::{details, overview, BRAND_PURPLE, BRAND_TEAL};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AgreementBoardApp {
    pub state: AppState,
    source: Box<dyn SheetSource>,
    range: String,
    ui_config: UiConfig,
    /// Agreement type → colour, shared by the pie chart and the filter list.
    colors: ColorMap,
}

impl AgreementBoardApp {
    pub fn new(config: AppConfig, source: Box<dyn SheetSource>) -> Self {
        let mut app = Self {
            state: AppState::new(config.columns),
            source,
            range: config.sheet.range,
            ui_config: config.ui,
            colors: ColorMap::default(),
        };
        app.load();
        app
    }

    /// Fetch the sheet and replace the dataset; failures keep the old one.
    fn load(&mut self) {
        match source::load_dataset(self.source.as_ref(), &self.range) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} agreements with columns {:?}",
                    dataset.len(),
                    dataset.columns()
                );
                self.state.set_dataset(dataset, self.source.describe());
                let agreement_types = self
                    .state
                    .filter_options(&self.state.layout.agreement_type)
                    .unwrap_or_default();
                self.colors = ColorMap::new(&agreement_types);
            }
            Err(err) => self.state.set_load_error(&err),
        }
    }

    fn handle(&mut self, action: Action) {
        match action {
            Action::Reload => {
                self.source.invalidate();
                self.load();
            }
            Action::OpenCsv(path) => {
                self.source = Box::new(CsvFileSource::new(path));
                self.load();
            }
        }
    }
}

impl eframe::App for AgreementBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Header band ----
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::default().fill(BRAND_PURPLE))
            .show(ctx, |ui| {
                panels::header(ui, &self.ui_config.title, self.ui_config.logo_url.as_deref());
            });

        // ---- Menu bar ----
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &self.state))
            .inner;

        // ---- Tab bar ----
        egui::TopBottomPanel::top("tab_bar")
            .frame(egui::Frame::default().fill(BRAND_TEAL))
            .show(ctx, |ui| {
                panels::tab_bar(ui, &mut self.state);
            });

        // ---- Left side panel: filters (overview only) ----
        if self.state.tab == Tab::Overview {
            egui::SidePanel::left("filter_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state, &self.colors);
                });
        }

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Overview => overview::overview_tab(ui, &self.state, &self.colors),
            Tab::Details => details::details_tab(ui, &mut self.state),
        });

        if let Some(action) = action {
            self.handle(action);
        }
    }
}
