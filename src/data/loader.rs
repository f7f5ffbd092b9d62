use std::time::{Duration, Instant};

use super::model::{FileDescriptor, SizeBudget};
use crate::engine::ExecutionStrategy;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

/// Longest prefix of `files` whose cumulative size fits in `budget`.
///
/// Admission stops at the first file that would overflow the budget; files
/// after it are never considered, even if one of them alone would fit.
pub fn admit(files: &[FileDescriptor], budget: SizeBudget) -> &[FileDescriptor] {
    let mut total_gb = 0.0;
    for (i, file) in files.iter().enumerate() {
        let size_gb = file.size_gb();
        if total_gb + size_gb > budget.gb {
            return &files[..i];
        }
        total_gb += size_gb;
        log::info!(
            "Admitting {}, size: {size_gb:.2} GB, total: {total_gb:.2} GB",
            file.path.display()
        );
    }
    files
}

// ---------------------------------------------------------------------------
// Timed load
// ---------------------------------------------------------------------------

/// Admit files for `budget` and read them with `strategy`.
///
/// The elapsed time covers admission and reading together. Nothing is cached:
/// a larger budget re-reads the files a smaller one already read.
pub fn load<S: ExecutionStrategy>(
    strategy: &S,
    files: &[FileDescriptor],
    budget: SizeBudget,
) -> Result<(Option<S::Frame>, Duration)> {
    let start = Instant::now();
    let admitted = admit(files, budget);
    let frame = strategy.read(admitted)?;
    let elapsed = start.elapsed();

    log::debug!(
        "{} read {} file(s) for {budget} in {elapsed:.2?}",
        strategy.name(),
        admitted.len()
    );
    Ok((frame, elapsed))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::BYTES_PER_GB;
    use crate::engine::ArrowEager;

    fn fake(label: &str, gb: f64) -> FileDescriptor {
        FileDescriptor {
            path: PathBuf::from(format!("{label}.csv")),
            size_bytes: (gb * BYTES_PER_GB) as u64,
            label: label.to_string(),
        }
    }

    fn labels(files: &[FileDescriptor]) -> Vec<&str> {
        files.iter().map(|f| f.label.as_str()).collect()
    }

    #[test]
    fn overflowing_second_file_stops_admission() {
        let files = [fake("A", 0.6), fake("B", 0.6), fake("C", 0.6)];
        assert_eq!(labels(admit(&files, SizeBudget::new(1.0))), ["A"]);
        assert_eq!(labels(admit(&files, SizeBudget::new(2.0))), ["A", "B", "C"]);
    }

    #[test]
    fn later_small_file_is_not_admitted_after_a_miss() {
        let files = [fake("A", 0.5), fake("B", 0.9), fake("C", 0.1)];
        assert_eq!(labels(admit(&files, SizeBudget::new(1.0))), ["A"]);
    }

    #[test]
    fn budget_below_first_file_admits_nothing() {
        let files = [fake("A", 1.5), fake("B", 0.1)];
        assert!(admit(&files, SizeBudget::new(1.0)).is_empty());
    }

    #[test]
    fn exact_fit_is_admitted() {
        let files = [fake("A", 0.5), fake("B", 0.5)];
        assert_eq!(labels(admit(&files, SizeBudget::new(1.0))), ["A", "B"]);
    }

    #[test]
    fn admission_is_a_prefix_within_budget() {
        let sizes = [0.3, 0.05, 0.7, 0.2, 0.9, 0.01, 0.4];
        let files: Vec<FileDescriptor> = sizes
            .iter()
            .enumerate()
            .map(|(i, gb)| fake(&format!("F{i}"), *gb))
            .collect();

        for budget in [0.0, 0.2, 0.35, 1.0, 1.5, 2.0, 3.0] {
            let admitted = admit(&files, SizeBudget::new(budget));
            let total: f64 = admitted.iter().map(FileDescriptor::size_gb).sum();
            assert!(total <= budget, "budget {budget}: admitted {total} GB");
            assert_eq!(admitted, &files[..admitted.len()]);
            if let Some(next) = files.get(admitted.len()) {
                assert!(total + next.size_gb() > budget);
            }
        }
    }

    #[test]
    fn load_returns_none_when_nothing_fits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.csv");
        std::fs::write(&path, "date,open,volume\nD1,1,10\n").unwrap();
        let files = vec![FileDescriptor::from_path(&path).unwrap()];

        let (frame, _) = load(&ArrowEager::default(), &files, SizeBudget::new(0.0)).unwrap();
        assert!(frame.is_none());

        let (frame, _) = load(&ArrowEager::default(), &files, SizeBudget::new(1.0)).unwrap();
        assert_eq!(frame.unwrap().num_rows(), 1);
    }
}
