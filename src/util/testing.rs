use std::env;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{FileSystem, RealFileSystem};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "msakit=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["config::"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Real filesystem that counts mutating calls.
///
/// Lets tests assert that a re-run performed zero writes.
#[derive(Debug, Default)]
pub struct CountingFileSystem {
    inner: RealFileSystem,
    writes: AtomicUsize,
}

impl CountingFileSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of mutating calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.writes.store(0, Ordering::SeqCst);
    }

    fn count(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl FileSystem for CountingFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.inner.read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.count();
        self.inner.write(path, content)
    }

    fn append(&self, path: &Path, content: &str) -> io::Result<()> {
        self.count();
        self.inner.append(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> io::Result<()> {
        self.count();
        self.inner.create_new(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.count();
        self.inner.create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.count();
        self.inner.remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_counting_fs_when_creating_dir_then_counts_one_write() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = CountingFileSystem::new();
        fs.create_dir_all(&tmp.path().join("a")).unwrap();
        assert!(fs.is_dir(&tmp.path().join("a")));
        assert_eq!(fs.writes(), 1);
    }
}
