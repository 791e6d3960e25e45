//! Error page body used for rejected requests.

use std::io;
use std::path::PathBuf;

/// Supplies the body of the rejection response.
pub trait ErrorPageSource: Send + Sync {
    fn load_error_page(&self) -> io::Result<String>;
}

/// Error page read from disk on each rejection.
#[derive(Debug, Clone)]
pub struct FileErrorPage {
    path: PathBuf,
}

impl FileErrorPage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ErrorPageSource for FileErrorPage {
    fn load_error_page(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// Fixed error page text.
#[derive(Debug, Clone, Default)]
pub struct StaticErrorPage(pub String);

impl ErrorPageSource for StaticErrorPage {
    fn load_error_page(&self) -> io::Result<String> {
        Ok(self.0.clone())
    }
}
