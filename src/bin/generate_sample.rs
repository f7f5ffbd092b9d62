//! Writes a synthetic stock-exchange dataset so the dashboard can run
//! without the real archive.
//!
//! ```text
//! generate_sample [out_dir] [days_per_stock]
//! ```
//!
//! Produces `<out_dir>/<NAME>.csv` per stock and `combined_data3gb.csv` in the
//! working directory with an extra `company` column.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

const STOCKS: [(&str, f64); 6] = [
    ("RELIANCE", 900.0),
    ("TCS", 2400.0),
    ("INFY", 1100.0),
    ("HDFCBANK", 1000.0),
    ("ITC", 45.0),
    ("ACC", 30.0),
];

const COMBINED_FILE: &str = "combined_data3gb.csv";

#[derive(Debug, Serialize)]
struct Quote {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Row of the combined file. The csv crate cannot serialize flattened
/// structs, so the quote fields are repeated.
#[derive(Debug, Serialize)]
struct CompanyQuote<'a> {
    company: &'a str,
    date: &'a str,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl<'a> CompanyQuote<'a> {
    fn new(company: &'a str, quote: &'a Quote) -> Self {
        CompanyQuote {
            company,
            date: &quote.date,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
        }
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Trading calendar
// ---------------------------------------------------------------------------

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 31,
    }
}

/// Weekdays from 2015-01-01 onwards, formatted `YYYY-MM-DD`.
fn trading_days(count: usize) -> Vec<String> {
    let (mut year, mut month, mut day) = (2015u32, 1u32, 1u32);
    // 2015-01-01 was a Thursday; 0 = Monday.
    let mut weekday = 3u32;
    let mut days = Vec::with_capacity(count);
    while days.len() < count {
        if weekday < 5 {
            days.push(format!("{year:04}-{month:02}-{day:02}"));
        }
        weekday = (weekday + 1) % 7;
        day += 1;
        if day > days_in_month(year, month) {
            day = 1;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }
    days
}

// ---------------------------------------------------------------------------
// Price series
// ---------------------------------------------------------------------------

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Geometric random walk starting at `start`.
fn quotes(dates: &[String], start: f64, rng: &mut SimpleRng) -> Vec<Quote> {
    let mut close = start;
    dates
        .iter()
        .map(|date| {
            let open = close * (1.0 + rng.gauss(0.0, 0.005));
            close = (open * (1.0 + rng.gauss(0.0003, 0.015))).max(1.0);
            let high = open.max(close) * (1.0 + rng.next_f64() * 0.01);
            let low = open.min(close) * (1.0 - rng.next_f64() * 0.01);
            let volume = rng.gauss(250_000.0, 120_000.0).max(0.0) as u64;
            Quote {
                date: date.clone(),
                open: round2(open),
                high: round2(high),
                low: round2(low),
                close: round2(close),
                volume,
            }
        })
        .collect()
}

fn write_stock(dir: &Path, name: &str, quotes: &[Quote]) -> Result<()> {
    let path = dir.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    for quote in quotes {
        writer.serialize(quote)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "archive".into()));
    let days: usize = match args.next() {
        Some(n) => n.parse().context("days_per_stock must be a number")?,
        None => 2_000,
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let dates = trading_days(days);

    let mut combined = csv::Writer::from_path(COMBINED_FILE)
        .with_context(|| format!("creating {COMBINED_FILE}"))?;

    for (name, start) in STOCKS {
        let series = quotes(&dates, start, &mut rng);
        write_stock(&out_dir, name, &series)?;
        for quote in &series {
            combined.serialize(CompanyQuote::new(name, quote))?;
        }
        log::info!("Wrote {} rows for {name}", series.len());
    }
    combined.flush()?;

    println!(
        "Wrote {} stocks ({days} trading days each) to {} and {COMBINED_FILE}",
        STOCKS.len(),
        out_dir.display()
    );
    Ok(())
}
