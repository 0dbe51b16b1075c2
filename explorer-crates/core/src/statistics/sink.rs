//! The global destination of logged statistics.

use std::fmt::Display;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;
use log::debug;

static SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

/// How statistics are written once [`configure_statistic_logging`] has been called.
///
/// Every statistic becomes one line `{prefix} {name}={value}`.
pub struct StatisticOptions {
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

impl StatisticOptions {
    /// Statistics written to stdout with the given line prefix, names left as they are.
    pub fn new(prefix: &'static str) -> Self {
        StatisticOptions {
            prefix,
            postfix: None,
            casing: None,
            writer: Box::new(std::io::stdout()),
        }
    }

    /// A line written by [`log_statistic_postfix`] after the last statistic.
    pub fn with_postfix(mut self, postfix: &'static str) -> Self {
        self.postfix = Some(postfix);
        self
    }

    /// Convert statistic names to `casing` before they are written.
    pub fn with_casing(mut self, casing: Case) -> Self {
        self.casing = Some(casing);
        self
    }

    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }
}

impl std::fmt::Debug for StatisticOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

struct StatisticSink {
    options: StatisticOptions,
}

impl StatisticSink {
    fn write_statistic(&mut self, name: impl Display, value: impl Display) {
        let name = match self.options.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let prefix = self.options.prefix;
        if let Err(e) = writeln!(self.options.writer, "{prefix} {name}={value}") {
            debug!("failed to write statistic {name}: {e}");
        }
    }

    fn write_postfix(&mut self) {
        let Some(postfix) = self.options.postfix else {
            return;
        };
        if let Err(e) = writeln!(self.options.writer, "{postfix}") {
            debug!("failed to write the statistics postfix: {e}");
        }
    }
}

fn with_sink(action: impl FnOnce(&mut StatisticSink)) {
    let Some(sink) = SINK.get() else {
        return;
    };
    match sink.lock() {
        Ok(mut sink) => action(&mut sink),
        Err(_) => debug!("statistic sink poisoned, statistic dropped"),
    }
}

/// Enable statistic logging. Only the first call has an effect; before it, every logged statistic
/// is dropped.
pub fn configure_statistic_logging(options: StatisticOptions) {
    let _ = SINK.get_or_init(|| Mutex::new(StatisticSink { options }));
}

pub fn should_log_statistics() -> bool {
    SINK.get().is_some()
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| sink.write_statistic(name, value));
}

/// Write the configured closing line, if any.
pub fn log_statistic_postfix() {
    with_sink(StatisticSink::write_postfix);
}
