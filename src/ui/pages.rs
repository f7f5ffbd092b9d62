use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::syntax_highlighting::{code_view_ui, CodeTheme};
use frame_bench::data::model::{
    ResultsTable, AGGREGATION_HEADER, BUDGET_HEADER, FILTER_HEADER, LOAD_HEADER, MEMORY_HEADER,
    SORT_HEADER,
};
use frame_bench::showcase::content::{self, Snippet};
use frame_bench::showcase::lazy_demo::DemoOutcome;
use frame_bench::showcase::TableView;

use crate::state::{AppState, Page, StrategyView};
use crate::ui::plot;

/// Render the selected page into the central panel.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.page {
            Page::Intro => intro(ui),
            Page::Syntax => syntax(ui),
            Page::Debugging => debugging(ui, state),
            Page::Speed => speed(ui, state),
            Page::Lazy => lazy(ui, state),
        });
}

// ---------------------------------------------------------------------------
// Static pages
// ---------------------------------------------------------------------------

fn intro(ui: &mut Ui) {
    ui.heading(content::INTRO_TITLE);
    ui.add_space(8.0);
    for paragraph in content::INTRO_TEXT {
        ui.label(*paragraph);
        ui.add_space(4.0);
    }
}

fn code(ui: &mut Ui, code: &str) {
    let theme = CodeTheme::from_memory(ui.ctx(), ui.style());
    code_view_ui(ui, &theme, code, "rs");
}

fn snippet_column(ui: &mut Ui, intro: &str, snippets: &[Snippet]) {
    ui.label(intro);
    for snippet in snippets {
        ui.add_space(8.0);
        ui.strong(snippet.heading);
        code(ui, snippet.code);
        ui.label(RichText::new(snippet.note).italics());
    }
}

fn syntax(ui: &mut Ui) {
    ui.heading("Intuitive Syntax");
    ui.add_space(8.0);
    ui.columns(2, |columns| {
        snippet_column(
            &mut columns[0],
            content::SYNTAX_INTRO_ARROW,
            content::ARROW_SNIPPETS,
        );
        snippet_column(
            &mut columns[1],
            content::SYNTAX_INTRO_POLARS,
            content::POLARS_SNIPPETS,
        );
    });
}

fn debugging(ui: &mut Ui, state: &mut AppState) {
    ui.heading(content::DEBUGGING_TITLE);
    ui.label(content::DEBUGGING_INTRO);

    let examples = match state.diagnostics() {
        Ok(examples) => examples,
        Err(e) => {
            ui.label(RichText::new(e.as_str()).color(Color32::RED));
            return;
        }
    };

    for example in examples {
        ui.add_space(12.0);
        ui.separator();
        ui.strong(example.title);
        ui.columns(2, |columns| {
            columns[0].label("Arrow");
            code(&mut columns[0], example.arrow_code);
            error_text(&mut columns[0], &example.arrow_error);
            columns[1].label("Polars");
            code(&mut columns[1], example.polars_code);
            error_text(&mut columns[1], &example.polars_error);
        });
    }
}

fn error_text(ui: &mut Ui, message: &str) {
    ui.label(
        RichText::new(message)
            .monospace()
            .color(Color32::from_rgb(220, 80, 80)),
    );
}

// ---------------------------------------------------------------------------
// Speed & Memory
// ---------------------------------------------------------------------------

fn speed(ui: &mut Ui, state: &mut AppState) {
    ui.heading(content::SPEED_TITLE);
    ui.label(content::SPEED_INTRO);
    for operation in content::SPEED_OPERATIONS {
        ui.label(format!("  • {operation}"));
    }
    ui.add_space(8.0);

    if !state.started {
        if ui.button("Execute the computations").clicked() {
            let ctx = ui.ctx().clone();
            state.start_benchmark(&ctx);
        }
        return;
    }

    for view in &state.views {
        strategy_view(ui, view);
        ui.add_space(12.0);
    }

    ui.label(RichText::new(content::MEMORY_CAVEAT).italics().weak());

    if state.views.iter().any(|v| !v.table.is_empty()) {
        ui.add_space(8.0);
        plot::timing_plot(ui, state);
    }
}

fn strategy_view(ui: &mut Ui, view: &StrategyView) {
    let strategy = &view.table.strategy;
    ui.strong(format!("Performance Metrics for Dataset Sizes For {strategy}:"));
    ui.add(
        egui::ProgressBar::new(f32::from(view.progress) / 100.0)
            .show_percentage()
            .animate(!view.finished),
    );
    results_grid(ui, &view.table);
    for note in &view.memory_notes {
        ui.label(note.as_str());
    }
    for notice in &view.notices {
        ui.label(RichText::new(notice.as_str()).color(Color32::from_rgb(230, 160, 40)));
    }
}

fn results_grid(ui: &mut Ui, table: &ResultsTable) {
    if table.is_empty() {
        return;
    }
    egui::Grid::new(("results", table.strategy.as_str()))
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for header in [
                BUDGET_HEADER,
                LOAD_HEADER,
                AGGREGATION_HEADER,
                FILTER_HEADER,
                SORT_HEADER,
                MEMORY_HEADER,
            ] {
                ui.strong(header);
            }
            ui.end_row();

            for row in table.rows() {
                ui.label(row.budget.as_str());
                ui.label(format!("{:.4}", row.load_secs));
                ui.label(row.aggregation_secs.to_string());
                ui.label(row.filter_secs.to_string());
                ui.label(row.sort_secs.to_string());
                ui.label(row.memory_gb.to_string());
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Lazy execution
// ---------------------------------------------------------------------------

fn lazy(ui: &mut Ui, state: &mut AppState) {
    ui.heading(content::LAZY_TITLE);
    for paragraph in content::LAZY_TEXT {
        ui.label(*paragraph);
        ui.add_space(4.0);
    }
    ui.label(format!("File: {}", state.config.lazy_demo.file.display()));
    ui.add_space(8.0);

    if state.demo_running {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label("Running both pipelines…");
        });
    } else if ui.button("Run the pipeline").clicked() {
        let ctx = ui.ctx().clone();
        state.start_demo(&ctx);
    }

    let Some(report) = &state.demo else {
        return;
    };
    ui.add_space(8.0);
    ui.columns(2, |columns| {
        demo_side(&mut columns[0], "Polars", &report.lazy);
        demo_side(&mut columns[1], "Arrow", &report.eager);
    });
}

fn demo_side(ui: &mut Ui, library: &str, outcome: &Result<DemoOutcome, String>) {
    ui.strong(library);
    match outcome {
        Ok(outcome) => {
            ui.label(format!(
                "{library} DataFrame size: {:.2} GB",
                outcome.size_gb
            ));
            table_grid(ui, library, &outcome.table);
        }
        Err(message) => error_text(ui, message),
    }
}

fn table_grid(ui: &mut Ui, id: &str, table: &TableView) {
    egui::Grid::new(("demo", id))
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for header in &table.headers {
                ui.strong(header.as_str());
            }
            ui.end_row();
            for row in &table.rows {
                for cell in row {
                    ui.label(cell.as_str());
                }
                ui.end_row();
            }
        });
}
