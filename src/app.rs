use eframe::egui;

use crate::state::AppState;
use crate::ui::{pages, panels};
use marriage_explorer::Config;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MarriageExplorerApp {
    pub state: AppState,
}

impl MarriageExplorerApp {
    /// Load the configured dataset once; every frame after that reads the
    /// cached copy.
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        state.load_configured();
        Self { state }
    }
}

impl eframe::App for MarriageExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation ----
        egui::SidePanel::left("navigation_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::navigation_panel(ui, &mut self.state);
            });

        // ---- Central panel: selected page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            pages::show(ui, &mut self.state);
        });
    }
}
