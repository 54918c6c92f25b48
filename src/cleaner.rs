use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scraper::Html;
use tracing::{debug, info, warn};

use crate::cache::{self, Fetch, HttpFetcher, Source};
use crate::error::{CleanerError, Result};
use crate::extract::{self, TagSelector};
use crate::fields::{Field, Fields};
use crate::settings::Settings;
use crate::table::{Columns, ReviewTable};
use crate::transform;

/// Text pulled from the page, before it is spread into fields.
#[derive(Debug, Clone)]
enum Extracted {
    Strings(Vec<String>),
    Pairs(Vec<Vec<String>>),
}

/// Step-by-step cleaner for a single review listing.
///
/// Construction loads the page (cache first, network otherwise). Callers
/// then extract tag text, split or reorganize it into artist/album fields,
/// tidy the fields and finally assemble a [`ReviewTable`].
pub struct DataCleaner {
    source: Source,
    path: PathBuf,
    html: String,
    document: Html,
    extracted: Option<Extracted>,
    fields: Fields,
    table: Option<ReviewTable>,
}

impl DataCleaner {
    /// Load `url` cached as `./data/<name>.html` with the default settings.
    pub fn new(url: &str, name: &str) -> Result<Self> {
        Self::open(Source::new(url, name), &Settings::default())
    }

    pub fn open(source: Source, settings: &Settings) -> Result<Self> {
        let fetcher = HttpFetcher::new(&settings.user_agent)?;
        Self::with_fetcher(source, &settings.data_dir, &fetcher)
    }

    pub fn with_fetcher(source: Source, data_dir: &Path, fetcher: &dyn Fetch) -> Result<Self> {
        let path = cache::storage_path(data_dir, &source.name);
        let html = cache::fetch_or_load(&source, &path, fetcher)?;
        let document = Html::parse_document(&html);
        info!("Loaded {} ({} bytes)", source.name, html.len());

        Ok(DataCleaner {
            source,
            path,
            html,
            document,
            extracted: None,
            fields: Fields::default(),
            table: None,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw page text exactly as cached.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Replace the extracted strings with the text of every element matching `selector`.
    pub fn create_tags(&mut self, selector: &TagSelector) -> Result<usize> {
        self.ensure_open()?;
        let texts = extract::select_texts(&self.document, selector)?;
        let n = texts.len();
        self.extracted = Some(Extracted::Strings(texts));
        Ok(n)
    }

    /// Cut every extracted string at the first `sep`.
    pub fn split(&mut self, sep: &str) -> Result<()> {
        self.ensure_open()?;
        if sep.is_empty() {
            return Err(CleanerError::EmptySeparator);
        }
        let strings = self.flat_strings()?;
        let pairs = transform::split_each(strings, sep);
        debug!("Split {} strings on {:?}", pairs.len(), sep);
        self.extracted = Some(Extracted::Pairs(pairs));
        Ok(())
    }

    /// For pages that list artist and album as alternating elements.
    pub fn reorganize(&mut self) -> Result<()> {
        self.ensure_open()?;
        let (artists, albums) = transform::deinterleave(self.flat_strings()?);
        if artists.len() != albums.len() {
            warn!(
                "Odd number of extracted strings: {} artists vs {} albums",
                artists.len(),
                albums.len()
            );
        }
        self.fields.set(Field::Artists, artists);
        self.fields.set(Field::Albums, albums);
        Ok(())
    }

    /// Spread split pairs into the artist and album fields.
    pub fn transpose(&mut self) -> Result<()> {
        self.ensure_open()?;
        let pairs = match &self.extracted {
            Some(Extracted::Pairs(p)) => p,
            Some(Extracted::Strings(_)) => return Err(CleanerError::NotSplit),
            None => return Err(CleanerError::NoStrings),
        };
        let (artists, albums) = transform::transpose_pairs(pairs).inspect_err(|_| {
            for pair in pairs {
                warn!("pair: {:?}", pair);
            }
        })?;
        self.fields.set(Field::Artists, artists);
        self.fields.set(Field::Albums, albums);
        Ok(())
    }

    /// Map `func` over every entry of `field`.
    pub fn apply<F>(&mut self, field: Field, func: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        self.ensure_open()?;
        let values = self.fields.require_mut(field).map_err(CleanerError::MissingField)?;
        for v in values.iter_mut() {
            *v = func(v.as_str());
        }
        Ok(())
    }

    /// Fill `years` from the text between the last open/close delimiter of
    /// each entry of `field`. `field` itself is left as is.
    pub fn extract_year_from_paren(&mut self, field: Field, delim: &str) -> Result<()> {
        self.ensure_open()?;
        let (open, close) = transform::delimiter_pair(delim)?;
        let values = self.fields.require(field).map_err(CleanerError::MissingField)?;

        let years: Vec<String> = values
            .iter()
            .map(|s| {
                transform::between_last(s, open, close).unwrap_or_else(|| {
                    warn!("No {}{} year in {:?}", open, close, s);
                    String::new()
                })
            })
            .collect();
        self.fields.set(Field::Years, years);
        Ok(())
    }

    /// Strip `chars` (whitespace when `None`) from the chosen sides of every entry.
    pub fn trim(&mut self, field: Field, chars: Option<&str>, left: bool, right: bool) -> Result<()> {
        self.apply(field, |s| transform::trim_chars(s, chars, left, right))
    }

    /// Build the final table; `ranks` needs one entry per artist.
    pub fn create_table(&mut self, ranks: &[u32]) -> Result<&ReviewTable> {
        self.ensure_open()?;
        let artists = self.fields.require(Field::Artists).map_err(CleanerError::MissingField)?;
        let albums = self.fields.require(Field::Albums).map_err(CleanerError::MissingField)?;

        let table = ReviewTable::assemble(Columns {
            artists,
            albums,
            ranks,
            years: self.fields.get(Field::Years),
            reviewer: &self.source.name,
            reviewer_url: &self.source.url,
        })?;
        info!("Built table for {} with {} rows", self.source.name, table.len());
        let table = self.table.insert(table);
        Ok(&*table)
    }

    pub fn field(&self, field: Field) -> Option<&[String]> {
        self.fields.get(field)
    }

    /// Extracted strings, if they have not been split yet.
    pub fn strings(&self) -> Option<&[String]> {
        match &self.extracted {
            Some(Extracted::Strings(s)) => Some(s),
            _ => None,
        }
    }

    pub fn pairs(&self) -> Option<&[Vec<String>]> {
        match &self.extracted {
            Some(Extracted::Pairs(p)) => Some(p),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&ReviewTable> {
        self.table.as_ref()
    }

    /// Number of records: artists once populated, else extracted entries.
    /// `None` before anything has been extracted.
    pub fn len(&self) -> Option<usize> {
        if let Some(artists) = self.fields.get(Field::Artists) {
            return Some(artists.len());
        }
        match &self.extracted {
            Some(Extracted::Strings(s)) => Some(s.len()),
            Some(Extracted::Pairs(p)) => Some(p.len()),
            None => None,
        }
    }

    /// Dump the current state for eyeballing.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        match (self.fields.get(Field::Artists), self.fields.get(Field::Albums)) {
            (Some(artists), Some(albums)) => {
                for (artist, album) in artists.iter().zip(albums) {
                    writeln!(out, "[{:?}, {:?}]", artist, album)?;
                }
            }
            _ => match &self.extracted {
                Some(Extracted::Strings(strings)) => {
                    for s in strings {
                        writeln!(out, "{:?}", s)?;
                    }
                }
                Some(Extracted::Pairs(pairs)) => {
                    for p in pairs {
                        writeln!(out, "{:?}", p)?;
                    }
                }
                None => {}
            },
        }
        if let Some(years) = self.fields.get(Field::Years) {
            for year in years {
                writeln!(out, "{}", year)?;
            }
        }
        if let Some(table) = &self.table {
            write!(out, "{}", table)?;
        }
        Ok(())
    }

    pub fn print_data(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.render(&mut lock)
    }

    /// Open the cached page in the default browser.
    pub fn view_page(&self) -> Result<()> {
        open_in_browser(&self.path)
    }

    /// The table is final once built.
    fn ensure_open(&self) -> Result<()> {
        match self.table {
            Some(_) => Err(CleanerError::TableBuilt),
            None => Ok(()),
        }
    }

    fn flat_strings(&self) -> Result<&[String]> {
        match &self.extracted {
            Some(Extracted::Strings(s)) => Ok(s),
            Some(Extracted::Pairs(_)) => Err(CleanerError::AlreadySplit),
            None => Err(CleanerError::NoStrings),
        }
    }
}

pub fn open_in_browser(path: &Path) -> Result<()> {
    let abs = std::fs::canonicalize(path)?;
    let url = format!("file://{}", abs.display());
    info!("Opening {}", url);
    webbrowser::open(&url)?;
    Ok(())
}
