use chrono::{DateTime, Local};
use tracing::info;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

pub fn now_local() -> DateTime<Local> {
    Local::now()
}

pub fn format_local(now: &DateTime<Local>, pattern: &str) -> String {
    now.format(pattern).to_string()
}

/// Log timestamps in the host's local time zone.
pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", format_local(&now_local(), LOG_TIME_FORMAT))
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_timer(LocalTimer)
        .init();

    info!("tracing initialized");
}
