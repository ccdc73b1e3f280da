//! Log setup. The terminal belongs to the display, so logs only go to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TERMWORKS_LOG";

/// Explicit directives win over `TERMWORKS_LOG`, which wins over `info`.
fn filter(directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Appends logs to `path`, keeping events that pass `directives`. Without a
/// path nothing is installed and every event is dropped.
pub fn init(path: Option<&Path>, directives: Option<&str>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // a subscriber may already be installed (tests, embedding hosts)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directives))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_is_a_no_op() {
        assert!(init(None, None).is_ok());
        assert!(init(None, Some("debug")).is_ok());
    }

    #[test]
    fn explicit_directives_override_the_environment() {
        let filter = filter(Some("termworks=debug"));
        assert_eq!(filter.to_string(), "termworks=debug");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let err = init(Some(Path::new("/definitely/not/here/termworks.log")), None).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
