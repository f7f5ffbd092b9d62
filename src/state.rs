use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use eframe::egui;
use frame_bench::bench::report::memory_note;
use frame_bench::bench::{self, BenchEvent, ReportSink};
use frame_bench::data::model::ResultsTable;
use frame_bench::showcase::diagnostics::{self, ErrorExample};
use frame_bench::showcase::lazy_demo::{self, DemoReport};
use frame_bench::BenchConfig;

use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Intro,
    Syntax,
    Debugging,
    Speed,
    Lazy,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Intro,
        Page::Syntax,
        Page::Debugging,
        Page::Speed,
        Page::Lazy,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Intro => "Intro",
            Page::Syntax => "Intuitive Syntax",
            Page::Debugging => "Better Debugging",
            Page::Speed => "Speed & Memory",
            Page::Lazy => "Lazy Execution",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-strategy benchmark view
// ---------------------------------------------------------------------------

/// What the Speed page shows for one execution path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyView {
    pub table: ResultsTable,
    pub memory_notes: Vec<String>,
    pub notices: Vec<String>,
    pub progress: u8,
    pub finished: bool,
}

// ---------------------------------------------------------------------------
// Worker-side sink
// ---------------------------------------------------------------------------

/// Forwards events to the UI thread and wakes it up.
struct RepaintingSender {
    tx: Sender<BenchEvent>,
    ctx: egui::Context,
}

impl ReportSink for RepaintingSender {
    fn report(&mut self, event: BenchEvent) {
        self.tx.report(event);
        self.ctx.request_repaint();
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub page: Page,
    pub config: BenchConfig,

    /// One entry per strategy, in the order their runs started.
    pub views: Vec<StrategyView>,

    /// Set once "Execute" is clicked; the button stays hidden afterwards.
    pub started: bool,

    /// Whether the benchmark worker is still sending events.
    pub running: bool,

    events: Option<Receiver<BenchEvent>>,

    pub demo: Option<DemoReport>,
    pub demo_running: bool,
    demo_rx: Option<Receiver<DemoReport>>,

    diagnostics: Option<Result<Vec<ErrorExample>, String>>,

    pub colors: SeriesColors,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: BenchConfig) -> Self {
        Self {
            page: Page::Intro,
            config,
            views: Vec::new(),
            started: false,
            running: false,
            events: None,
            demo: None,
            demo_running: false,
            demo_rx: None,
            diagnostics: None,
            colors: SeriesColors::default(),
            status_message: None,
        }
    }

    pub fn view(&self, strategy: &str) -> Option<&StrategyView> {
        self.views.iter().find(|v| v.table.strategy == strategy)
    }

    fn view_mut(&mut self, strategy: &str) -> &mut StrategyView {
        let index = match self.views.iter().position(|v| v.table.strategy == strategy) {
            Some(index) => index,
            None => {
                self.views.push(StrategyView {
                    table: ResultsTable::new(strategy),
                    ..Default::default()
                });
                self.views.len() - 1
            }
        };
        &mut self.views[index]
    }

    /// Fold one benchmark event into the view.
    pub fn apply(&mut self, event: BenchEvent) {
        match event {
            BenchEvent::Started { strategy } => {
                *self.view_mut(&strategy) = StrategyView {
                    table: ResultsTable::new(strategy.as_str()),
                    ..Default::default()
                };
            }
            BenchEvent::Table(table) => {
                let strategy = table.strategy.clone();
                self.view_mut(&strategy).table = table;
            }
            BenchEvent::Memory {
                strategy,
                budget,
                gb,
            } => {
                let note = memory_note(&strategy, &budget, gb);
                self.view_mut(&strategy).memory_notes.push(note);
            }
            BenchEvent::Progress { strategy, percent } => {
                self.view_mut(&strategy).progress = percent;
            }
            BenchEvent::Notice { strategy, message } => {
                self.view_mut(&strategy).notices.push(message);
            }
            BenchEvent::Finished { strategy } => {
                self.view_mut(&strategy).finished = true;
            }
            BenchEvent::Failed { strategy, message } => {
                let view = self.view_mut(&strategy);
                view.notices.push(format!("Run failed: {message}"));
                view.finished = true;
                self.status_message = Some(message);
            }
        }
    }

    /// Drain pending worker messages. Called once per frame.
    pub fn poll(&mut self) {
        if let Some(rx) = self.events.take() {
            let mut disconnected = false;
            loop {
                match rx.try_recv() {
                    Ok(event) => self.apply(event),
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
            if disconnected {
                self.running = false;
            } else {
                self.events = Some(rx);
            }
        }

        if let Some(rx) = self.demo_rx.take() {
            match rx.try_recv() {
                Ok(report) => {
                    self.demo = Some(report);
                    self.demo_running = false;
                }
                Err(mpsc::TryRecvError::Empty) => self.demo_rx = Some(rx),
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.demo_running = false;
                    self.status_message = Some("Lazy execution demo stopped unexpectedly".into());
                }
            }
        }
    }

    /// Run the comparison on a worker thread.
    pub fn start_benchmark(&mut self, ctx: &egui::Context) {
        if self.running {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        let mut sink = RepaintingSender {
            tx,
            ctx: ctx.clone(),
        };

        let spawned = thread::Builder::new()
            .name("benchmark".into())
            .spawn(move || {
                if let Err(e) = bench::run_comparison(&config, &mut sink) {
                    log::error!("Benchmark failed: {e}");
                    sink.report(BenchEvent::Failed {
                        strategy: "Comparison".into(),
                        message: e.to_string(),
                    });
                }
            });

        match spawned {
            Ok(_) => {
                self.views.clear();
                self.started = true;
                self.running = true;
                self.events = Some(rx);
            }
            Err(e) => {
                log::error!("Failed to start benchmark thread: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Run the lazy-execution pipeline on a worker thread.
    pub fn start_demo(&mut self, ctx: &egui::Context) {
        if self.demo_running {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        let ctx = ctx.clone();

        let spawned = thread::Builder::new()
            .name("lazy-demo".into())
            .spawn(move || {
                let report = lazy_demo::run_demo(&config);
                if tx.send(report).is_err() {
                    log::debug!("Demo result dropped, window closed");
                }
                ctx.request_repaint();
            });

        match spawned {
            Ok(_) => {
                self.demo = None;
                self.demo_running = true;
                self.demo_rx = Some(rx);
            }
            Err(e) => {
                log::error!("Failed to start demo thread: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Error examples, computed on first use.
    pub fn diagnostics(&mut self) -> &Result<Vec<ErrorExample>, String> {
        self.diagnostics.get_or_insert_with(|| {
            diagnostics::collect_examples().map_err(|e| {
                log::error!("Could not build error examples: {e}");
                e.to_string()
            })
        })
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("Data directory set to {}", dir.display());
        self.config.data_dir = dir;
        self.started = false;
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use frame_bench::data::model::{MetricRecord, OperationTimes};

    use super::*;

    fn table(strategy: &str, rows: usize) -> ResultsTable {
        let mut table = ResultsTable::new(strategy);
        for i in 0..rows {
            table.push(MetricRecord {
                budget: format!("{} GB", i + 1),
                load: Duration::from_millis(10),
                times: OperationTimes::default(),
                memory_gb: 0.1,
            });
        }
        table
    }

    #[test]
    fn events_build_one_view_per_strategy() {
        let mut state = AppState::new(BenchConfig::default());
        for event in [
            BenchEvent::Started {
                strategy: "Polars".into(),
            },
            BenchEvent::Table(table("Polars", 1)),
            BenchEvent::Memory {
                strategy: "Polars".into(),
                budget: "1 GB".into(),
                gb: 0.1,
            },
            BenchEvent::Progress {
                strategy: "Polars".into(),
                percent: 50,
            },
            BenchEvent::Table(table("Polars", 2)),
            BenchEvent::Finished {
                strategy: "Polars".into(),
            },
            BenchEvent::Started {
                strategy: "Arrow".into(),
            },
            BenchEvent::Notice {
                strategy: "Arrow".into(),
                message: "Arrow workflow failed due to memory error".into(),
            },
        ] {
            state.apply(event);
        }

        assert_eq!(state.views.len(), 2);
        let polars = state.view("Polars").unwrap();
        assert_eq!(polars.table.len(), 2);
        assert_eq!(polars.progress, 50);
        assert!(polars.finished);
        assert_eq!(
            polars.memory_notes,
            ["The estimated memory used for 1 GB Polars DataFrame is 0.1 GB"]
        );

        let arrow = state.view("Arrow").unwrap();
        assert!(arrow.table.is_empty());
        assert_eq!(arrow.notices.len(), 1);
        assert!(!arrow.finished);
    }

    #[test]
    fn failure_is_surfaced_in_the_status_bar() {
        let mut state = AppState::new(BenchConfig::default());
        state.apply(BenchEvent::Failed {
            strategy: "Comparison".into(),
            message: "column not found: volume".into(),
        });
        assert_eq!(state.status_message.as_deref(), Some("column not found: volume"));
        assert!(state.view("Comparison").unwrap().finished);
    }

    #[test]
    fn changing_the_data_dir_allows_a_new_run() {
        let mut state = AppState::new(BenchConfig::default());
        state.started = true;
        state.set_data_dir(PathBuf::from("/tmp/stocks"));
        assert!(!state.started);
        assert_eq!(state.config.data_dir, PathBuf::from("/tmp/stocks"));
    }
}
