use std::time::Duration;

use anyhow::Context;

/// Parses a number of seconds, e.g. `2.5`, as given on the command line. Negative, infinite
/// and NaN values are rejected.
pub fn parse_seconds(s: &str) -> anyhow::Result<Duration> {
    let secs: f64 = s
        .trim()
        .parse()
        .with_context(|| format!("{s:?} is not a number of seconds"))?;
    Ok(Duration::try_from_secs_f64(secs)?)
}
