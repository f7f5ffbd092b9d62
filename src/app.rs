use eframe::egui;
use frame_bench::BenchConfig;

use crate::state::AppState;
use crate::ui::{pages, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FrameBenchApp {
    pub state: AppState,
}

impl FrameBenchApp {
    pub fn new(config: BenchConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for FrameBenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: page selector ----
        egui::SidePanel::left("page_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            pages::show(ui, &mut self.state);
        });
    }
}
