pub use log::{debug, error, info};
use log::{Level, LevelFilter, Log, Metadata, Record};
use yansi::Paint;

static LOGGER: Logger = Logger;

struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = record.level();
        let header = match level {
            Level::Trace => Paint::fixed(244, "trace"),
            Level::Debug => Paint::cyan("debug"),
            Level::Info => Paint::green("info"),
            Level::Warn => Paint::yellow("warn"),
            Level::Error => Paint::red("error"),
        }
        .bold();
        let colon = Paint::default(":").bold();
        match level {
            // Include where chatty messages come from, the computer and the
            // front end both log at these levels.
            Level::Debug | Level::Trace => eprintln!(
                "{}{} {} {}",
                header,
                colon,
                Paint::fixed(244, record.target()),
                record.args()
            ),
            _ => eprintln!("{}{} {}", header, colon, record.args()),
        }
    }

    fn flush(&self) {}
}

/// Install the logger, each level of `verbosity` shows one more level of
/// detail than `info`.
pub fn init(verbosity: u64) {
    if !atty::is(atty::Stream::Stderr) {
        Paint::disable();
    }
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(level))
        .unwrap()
}
