//! Responsible for behaviour related to logging statistics with a specific
//! prefix and closing lines.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::io::stdout;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// The options for statistic logging: the prefix every statistic line starts
/// with, the (optional) line which is printed after the statistics, the
/// (optional) casing applied to statistic names, and the writer the lines go
/// to.
pub struct StatisticOptions {
    // Statistics are printed in the form `{PREFIX} {NAME}={VALUE}`
    statistic_prefix: &'static str,
    // A closing line which is printed after all of the statistics
    after_statistics: Option<&'static str>,
    // The casing of the name of the statistic
    statistics_casing: Option<Case>,
    // The writer to which the statistics are written
    statistics_writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("statistic_prefix", &self.statistic_prefix)
            .field("after_statistics", &self.after_statistics)
            .field("statistics_casing", &self.statistics_casing)
            .field("statistics_writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Configures the logging of the statistics.
///
/// Statistics are only written when this function has been called. In case no
/// writer is specified, stdout is used.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        Mutex::from(StatisticOptions {
            statistic_prefix: prefix,
            after_statistics: after,
            statistics_casing: casing,
            statistics_writer: writer.unwrap_or(Box::new(stdout())),
        })
    });
}

/// Logs the provided statistic with name `name` and value `value` in the
/// format `{PREFIX} {NAME}={VALUE}`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    if let Some(lock) = STATISTIC_OPTIONS.get() {
        if let Ok(mut options) = lock.lock() {
            let name = if let Some(casing) = &options.statistics_casing {
                name.to_string().to_case(*casing)
            } else {
                name.to_string()
            };
            let prefix = options.statistic_prefix;
            let _ = writeln!(options.statistics_writer, "{prefix} {name}={value}");
        }
    }
}

/// Logs the closing line **if** it has been configured. Certain output
/// formats require a block of statistics to be followed by such a line.
pub fn log_statistic_postfix() {
    if let Some(lock) = STATISTIC_OPTIONS.get() {
        if let Ok(mut options) = lock.lock() {
            if let Some(post_fix) = options.after_statistics {
                let _ = writeln!(options.statistics_writer, "{post_fix}");
            }
        }
    }
}

/// Returns whether statistics will be logged, i.e. whether the
/// [`StatisticOptions`] have been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
