use std::{io::Write, time::Instant};

use ::log::LevelFilter;
use env_logger::{Builder, Target};

/// Installs a stderr logger that prefixes each message with the seconds elapsed since
/// its installation. `RUST_LOG` overrides `level`. Repeated calls are ignored, so tests
/// may call this freely.
pub fn build_logger_for_level(level: LevelFilter) {
    let start = Instant::now();

    let _ = Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{:>8.3}s {:<5} {}] {}",
                start.elapsed().as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}

/// Maps the number of `-v` flags onto a level above `base`
pub fn build_logger_for_verbosity(base: LevelFilter, verbosity: usize) {
    let levels = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base_idx = levels.iter().position(|&l| l == base).unwrap_or(2);
    let level = levels[(base_idx + verbosity).min(levels.len() - 1)];
    build_logger_for_level(level);
}
