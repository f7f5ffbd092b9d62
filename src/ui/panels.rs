use eframe::egui::{self, Color32, RichText, Ui};
use frame_bench::showcase::content::APP_TITLE;

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – page navigation
// ---------------------------------------------------------------------------

/// Render the page selector and the data settings.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(APP_TITLE).strong());
    });
    ui.add_space(4.0);
    ui.separator();

    for page in Page::ALL {
        ui.selectable_value(&mut state.page, page, page.title());
    }

    ui.add_space(8.0);
    ui.separator();

    ui.strong("Data");
    ui.label(format!("Folder: {}", state.config.data_dir.display()));
    ui.label(format!("Pattern: {}", state.config.pattern));
    let budgets: Vec<String> = state.config.budgets().iter().map(|b| b.label()).collect();
    ui.label(format!("Checkpoints: {}", budgets.join(", ")));

    ui.add_enabled_ui(!state.running, |ui: &mut Ui| {
        if ui.button("Choose folder…").clicked() {
            open_folder_dialog(state);
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let choose = ui.add_enabled(!state.running, egui::Button::new("Choose data folder…"));
            if choose.clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.page.title());

        if state.running {
            ui.separator();
            ui.spinner();
            ui.label("Benchmark running");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Choose the folder with the stock CSV files")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(path) = folder {
        state.set_data_dir(path);
    }
}
