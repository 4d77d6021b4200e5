use std::path::PathBuf;

use common::{QuoteError, Result};

/// Supplier of raw chart responses, one instrument at a time
pub trait QuoteSource: Send + Sync {
    fn fetch(&self, symbol: &str) -> Result<Vec<u8>>;
}

/// Reads saved chart responses from `<dir>/<SYMBOL>.json`
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol))
    }
}

impl QuoteSource for FileSource {
    fn fetch(&self, symbol: &str) -> Result<Vec<u8>> {
        let path = self.path_for(symbol);
        std::fs::read(&path)
            .map_err(|e| QuoteError::DataLoadError(format!("{}: {}", path.display(), e)))
    }
}
