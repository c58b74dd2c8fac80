use colored::Colorize;
use env_logger::{Builder, Target, fmt::Formatter};
use log::{LevelFilter, Record};
use std::io::Write;

pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    Builder::new()
        .filter_level(level)
        .format(format)
        .target(Target::Stderr)
        .try_init()
}

fn format(buf: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    match record.level() {
        log::Level::Error => writeln!(buf, "{}: {}", "error".red().bold(), record.args()),
        log::Level::Warn => writeln!(buf, "{}: {}", "warning".yellow().bold(), record.args()),
        log::Level::Debug | log::Level::Trace => {
            writeln!(buf, "{} {}", "debug".dimmed(), record.args())
        }
        log::Level::Info => writeln!(buf, "{}", record.args()),
    }
}

pub fn level(verbose: bool, quiet: bool) -> LevelFilter {
    match (verbose, quiet) {
        (true, _) => LevelFilter::Debug,
        (false, true) => LevelFilter::Error,
        (false, false) => LevelFilter::Info,
    }
}
