use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;

/// A review listing: where it lives and the name it is cached under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub url: String,
    pub name: String,
}

impl Source {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Source {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// `<data_dir>/<name>.html`
pub fn storage_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.html", name))
}

/// Anything that can turn a URL into page text.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        Ok(body)
    }
}

/// Return the page for `source`, reading `path` if it exists and otherwise
/// fetching it once and writing it to `path`. An existing cache file is
/// never rewritten.
pub fn fetch_or_load(source: &Source, path: &Path, fetcher: &dyn Fetch) -> Result<String> {
    if path.exists() {
        debug!("Cache hit for {}: {:?}", source.name, path);
        return Ok(fs::read_to_string(path)?);
    }

    info!("Fetching {} from {}", source.name, source.url);
    let html = fetcher.fetch(&source.url)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(html.as_bytes())?;
    info!("Cached {} bytes to {:?}", html.len(), path);

    Ok(html)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::error::CleanerError;

    /// Serves a fixed page and counts how often it was asked.
    pub(crate) struct CountingFetcher {
        pub page: String,
        pub calls: Cell<usize>,
    }

    impl CountingFetcher {
        pub(crate) fn new(page: &str) -> Self {
            CountingFetcher {
                page: page.to_string(),
                calls: Cell::new(0),
            }
        }
    }

    impl Fetch for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.page.clone())
        }
    }

    struct FailingFetcher;

    impl Fetch for FailingFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            Err(CleanerError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("refused: {}", url),
            )))
        }
    }

    #[test]
    fn storage_path_uses_name() {
        assert_eq!(
            storage_path(Path::new("data"), "pitchfork"),
            PathBuf::from("data/pitchfork.html")
        );
    }

    #[test]
    fn second_load_reads_cache_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source::new("https://example.com/best-albums", "example");
        let path = storage_path(dir.path(), &source.name);
        let fetcher = CountingFetcher::new("<html><body><h2>Low</h2></body></html>");

        let first = fetch_or_load(&source, &path, &fetcher).unwrap();
        let second = fetch_or_load(&source, &path, &fetcher).unwrap();

        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = storage_path(&dir.path().join("nested").join("data"), "rym");
        let fetcher = CountingFetcher::new("<p>x</p>");
        fetch_or_load(&Source::new("https://example.com", "rym"), &path, &fetcher).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn fetch_failure_leaves_no_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = storage_path(dir.path(), "down");
        let err = fetch_or_load(&Source::new("https://example.invalid", "down"), &path, &FailingFetcher);
        assert!(err.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn existing_cache_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = storage_path(dir.path(), "kept");
        fs::write(&path, "<p>original</p>").unwrap();
        let fetcher = CountingFetcher::new("<p>fresh</p>");
        let html = fetch_or_load(&Source::new("https://example.com", "kept"), &path, &fetcher).unwrap();
        assert_eq!(html, "<p>original</p>");
        assert_eq!(fetcher.calls.get(), 0);
    }
}
