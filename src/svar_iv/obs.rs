//! svar_iv::obs — terminal logger for verbose pipeline runs.
//!
//! Only compiled with the `obs_slog` feature. Records are formatted by
//! `slog-term` and written from a background thread by `slog-async`, so
//! logging never blocks the numerical work. Numerical modules do not log;
//! only [`svar_iv`](crate::svar_iv::pipeline::svar_iv) does.
use slog::{Drain, Logger, o};

/// Build a non-blocking terminal logger tagged with the crate name.
pub fn term_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!("crate" => "rust_svariv"))
}
