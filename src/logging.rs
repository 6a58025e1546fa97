use std::fmt::Display;
use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (tests, offline mode after a failed connect) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[inline]
pub fn clean(s: &str) -> String {
    s.replace('\x02', "").replace('\x1d', "").replace('\x01', "")
}

pub trait Logged {
    fn log(self, label: &str);
}

impl<T, E: Display> Logged for Result<T, E> {
    fn log(self, label: &str) {
        if let Err(e) = self {
            tracing::error!("{}: {}", label, clean(&e.to_string()));
        }
    }
}

macro_rules! location {
    () => {
        &format!("{}:{}:{}", file!(), line!(), column!())
    }
}
