use std::collections::BTreeMap;

use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{CleanerError, Result};

/// Element name plus attribute filters, e.g. `div` with `class = "artist"`.
///
/// A `class` filter matches any element carrying that class among others;
/// every other attribute must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagSelector {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl TagSelector {
    pub fn new(tag: impl Into<String>) -> Self {
        TagSelector {
            tag: tag.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// CSS form of this selector.
    pub fn to_css(&self) -> String {
        let mut css = self.tag.clone();
        for (name, value) in &self.attrs {
            let op = if name == "class" { "~=" } else { "=" };
            css.push_str(&format!("[{}{}\"{}\"]", name, op, escape_css_string(value)));
        }
        css
    }

    fn compile(&self) -> Result<Selector> {
        let css = self.to_css();
        Selector::parse(&css).map_err(|e| CleanerError::Selector {
            reason: format!("{:?}", e),
            selector: css.clone(),
        })
    }
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Text content of every element matching `selector`, in document order.
pub fn select_texts(document: &Html, selector: &TagSelector) -> Result<Vec<String>> {
    let compiled = selector.compile()?;
    let texts: Vec<String> = document
        .select(&compiled)
        .map(|el| el.text().collect::<String>())
        .collect();

    if texts.is_empty() {
        warn!("No elements matched {}", selector.to_css());
    } else {
        debug!("Matched {} elements for {}", texts.len(), selector.to_css());
    }
    Ok(texts)
}
