//! Test utilities shared across the workspace.
//!
//! Enabled with the `testing` feature so that integration tests in other
//! crates can reuse the same fixtures.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        // Another harness may already own the global subscriber
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory that is removed on drop.
#[cfg(any(test, feature = "tempfile"))]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `content` to `dir/name` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Translation payloads used by the integration suites.
pub mod translation_fixtures {
    use super::*;

    /// Nested English messages.
    pub fn english() -> Value {
        json!({
            "greeting": "Hello",
            "farewell": "Bye",
            "welcome": "Welcome, { $name }!",
            "inbox": {
                "count": "You have { $count ->\n    [one] one message\n   *[other] { $count } messages\n}",
                "empty": ""
            }
        })
    }

    /// French messages with a deliberately missing `farewell`.
    pub fn french() -> Value {
        json!({
            "greeting": "Bonjour",
            "welcome": "Bienvenue, { $name } !"
        })
    }

    /// German messages with a deliberately missing `farewell`.
    pub fn german() -> Value {
        json!({
            "greeting": "Hallo",
            "inbox": {
                "empty": "Keine Nachrichten"
            }
        })
    }
}
