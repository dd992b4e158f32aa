//! Parse the Chrome for Testing dashboard into a [`Catalog`].
//!
//! The dashboard markup is an implementation contract with the upstream
//! publisher, pinned down by fixture tests rather than a schema:
//!
//! ```html
//! <section id="stable">
//!   <h2>Stable</h2>
//!   <p>Version: <code>131.0.6778.85</code> (r1368529)</p>
//!   <table>
//!     <tr><th>Binary<th>Platform<th>URL<th>HTTP status
//!     <tr class="status-ok">
//!       <th><code>chromedriver</code>
//!       <th><code>win64</code>
//!       <td><code>https://storage.googleapis.com/.../chromedriver-win64.zip</code>
//!       <td><code>200</code>
//!   </table>
//! </section>
//! ```
//!
//! Missing sections, versions, or malformed rows degrade to omissions; only
//! input that is not markup at all is an error.

use super::{Catalog, Channel, ChannelInfo};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, trace};

/// Minimum number of cells in a download row: kind, platform, url, status.
const MIN_ROW_CELLS: usize = 4;

/// Class marking a download row whose artifact is available.
const AVAILABLE_ROW_SELECTOR: &str = "tr.status-ok";

/// Errors raised when the catalog document cannot be treated as markup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document is empty or whitespace only.
    #[error("Catalog document is empty")]
    Empty,

    /// The document does not look like markup at all.
    #[error("Catalog document is not markup: {reason}")]
    NotMarkup {
        /// What disqualified the input.
        reason: String,
    },

    /// A built-in selector failed to compile.
    #[error("Invalid selector '{selector}': {reason}")]
    Selector {
        /// The selector source text.
        selector: String,
        /// Parser diagnostics.
        reason: String,
    },
}

struct Selectors {
    paragraph: Selector,
    code: Selector,
    table: Selector,
    available_row: Selector,
    cell: Selector,
}

impl Selectors {
    fn new() -> Result<Self, ParseError> {
        Ok(Self {
            paragraph: selector("p")?,
            code: selector("code")?,
            table: selector("table")?,
            available_row: selector(AVAILABLE_ROW_SELECTOR)?,
            cell: selector("th, td")?,
        })
    }
}

fn selector(source: &str) -> Result<Selector, ParseError> {
    Selector::parse(source).map_err(|e| ParseError::Selector {
        selector: source.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Parse the raw catalog page.
///
/// Channels whose section is absent, or whose version cannot be extracted,
/// are omitted. Download rows that are not marked available, have too few
/// cells, or lack a `<code>` value in the kind/platform/URL columns are
/// skipped individually.
///
/// # Errors
///
/// Returns [`ParseError`] only when `raw` is empty, contains NUL bytes, or
/// has no markup tag at all.
///
/// # Examples
///
/// ```rust
/// use chromedriver_sync::catalog::{Channel, parse};
///
/// let html = r#"<section id="stable"><p>Version: <code>131.0.6778.85</code></p></section>"#;
/// let catalog = parse(html).unwrap();
/// assert_eq!(catalog.channel(Channel::Stable).unwrap().version(), "131.0.6778.85");
/// assert!(catalog.channel(Channel::Beta).is_none());
/// ```
pub fn parse(raw: &str) -> Result<Catalog, ParseError> {
    check_markup(raw)?;

    let document = Html::parse_document(raw);
    let selectors = Selectors::new()?;
    let mut catalog = Catalog::default();

    for channel in Channel::ALL {
        let section_selector = selector(&format!("section#{}", channel.as_str()))?;
        let Some(section) = document.select(&section_selector).next() else {
            debug!("Channel {} not published", channel);
            continue;
        };

        match parse_section(section, &selectors) {
            Some(info) => {
                debug!(
                    "Parsed channel {} version {} ({} artifact kinds)",
                    channel,
                    info.version(),
                    info.downloads().len()
                );
                catalog.insert(channel, info);
            }
            None => debug!("Channel {} has no readable version, skipping", channel),
        }
    }

    Ok(catalog)
}

fn check_markup(raw: &str) -> Result<(), ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    if raw.contains('\0') {
        return Err(ParseError::NotMarkup {
            reason: "document contains NUL bytes".to_string(),
        });
    }
    let has_tag = raw
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0] == b'<' && (pair[1].is_ascii_alphabetic() || pair[1] == b'!'));
    if !has_tag {
        return Err(ParseError::NotMarkup {
            reason: "no markup tags found".to_string(),
        });
    }
    Ok(())
}

fn parse_section(section: ElementRef<'_>, selectors: &Selectors) -> Option<ChannelInfo> {
    let lead = section.select(&selectors.paragraph).next()?;
    let version = code_text(lead, selectors)?;
    let mut info = ChannelInfo::new(version)?;

    if let Some(table) = section.select(&selectors.table).next() {
        for row in table.select(&selectors.available_row) {
            match parse_row(row, selectors) {
                Some((kind, platform, url)) => info.add_download(kind, platform, url),
                None => trace!("Skipping malformed download row"),
            }
        }
    }

    Some(info)
}

fn parse_row(row: ElementRef<'_>, selectors: &Selectors) -> Option<(String, String, String)> {
    let cells: Vec<ElementRef<'_>> = row.select(&selectors.cell).collect();
    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let kind = code_text(cells[0], selectors)?;
    let platform = code_text(cells[1], selectors)?;
    let url = code_text(cells[2], selectors)?;
    Some((kind, platform, url))
}

/// Trimmed text of the first `<code>` under `element`, if non-empty.
fn code_text(element: ElementRef<'_>, selectors: &Selectors) -> Option<String> {
    let code = element.select(&selectors.code).next()?;
    let text = code.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}
