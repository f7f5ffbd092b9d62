use std::time::Duration;

use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use frame_bench::data::model::MetricRecord;

use crate::color::{series_name, CHART_OPERATIONS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Timing chart (Speed page)
// ---------------------------------------------------------------------------

fn seconds(record: &MetricRecord, operation: &str) -> f64 {
    let elapsed: Duration = match operation {
        "Reading" => record.load,
        "Group By" => record.times.aggregation,
        "Search" => record.times.filter,
        _ => record.times.sort,
    };
    elapsed.as_secs_f64()
}

/// One line per strategy and operation. X is the checkpoint position, so
/// budgets that admitted no file do not leave a gap.
pub fn timing_plot(ui: &mut Ui, state: &AppState) {
    Plot::new("timing_plot")
        .legend(Legend::default())
        .x_axis_label("Data size checkpoint")
        .y_axis_label("Seconds")
        .height(320.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for view in &state.views {
                let strategy = view.table.strategy.as_str();
                for operation in CHART_OPERATIONS {
                    let points: PlotPoints = view
                        .table
                        .records
                        .iter()
                        .enumerate()
                        .map(|(i, record)| [(i + 1) as f64, seconds(record, operation)])
                        .collect();

                    let name = series_name(strategy, operation);
                    let line = Line::new(points)
                        .name(&name)
                        .color(state.colors.color_for(&name))
                        .width(1.5);

                    plot_ui.line(line);
                }
            }
        });
}
