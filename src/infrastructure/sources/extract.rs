//! # Page Extraction Helpers
//!
//! Text-level helpers shared by the HTML-scraping adapters: reducing a page
//! to its visible text, pulling cells out of the first table row, and
//! parsing rates written with either decimal separator.

use crate::infrastructure::sources::error::{SourceError, SourceResult};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// A regex compiled on first use.
pub(crate) type LazyRegex = LazyLock<Result<Regex, regex::Error>>;

static SCRIPT_BLOCKS: LazyRegex = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
});
static TAGS: LazyRegex = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>"));
static WHITESPACE: LazyRegex = LazyLock::new(|| Regex::new(r"\s+"));
static TBODY: LazyRegex = LazyLock::new(|| Regex::new(r"(?is)<tbody\b[^>]*>(.*?)</tbody>"));
static ROW: LazyRegex = LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>"));
static CELL: LazyRegex = LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>"));

/// Returns the compiled pattern.
///
/// # Errors
///
/// Returns `SourceError::Internal` if the pattern does not compile.
pub(crate) fn compiled(regex: &'static LazyRegex) -> SourceResult<&'static Regex> {
    regex
        .as_ref()
        .map_err(|e| SourceError::internal(format!("invalid built-in pattern: {e}")))
}

/// Reduces an HTML document to whitespace-normalized visible text.
///
/// Script and style blocks are removed, tags become spaces and the common
/// character entities are decoded.
///
/// # Errors
///
/// Returns `SourceError::Internal` if a built-in pattern fails to compile.
pub fn visible_text(html: &str) -> SourceResult<String> {
    let blocks = compiled(&SCRIPT_BLOCKS)?;
    let tags = compiled(&TAGS)?;
    let spaces = compiled(&WHITESPACE)?;

    let without_blocks = blocks.replace_all(html, " ");
    let without_tags = tags.replace_all(&without_blocks, " ");
    let decoded = decode_entities(&without_tags);
    Ok(spaces.replace_all(&decoded, " ").trim().to_string())
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Returns the visible text of each `<td>` in the first body row of the
/// first table, or `None` if the page has no such row.
///
/// # Errors
///
/// Returns `SourceError::Internal` if a built-in pattern fails to compile.
pub fn first_table_row_cells(html: &str) -> SourceResult<Option<Vec<String>>> {
    let tbody = compiled(&TBODY)?;
    let row = compiled(&ROW)?;
    let cell = compiled(&CELL)?;

    let Some(body) = tbody.captures(html).and_then(|c| c.get(1)) else {
        return Ok(None);
    };
    let Some(first_row) = row.captures(body.as_str()).and_then(|c| c.get(1)) else {
        return Ok(None);
    };

    let mut cells = Vec::new();
    for capture in cell.captures_iter(first_row.as_str()) {
        if let Some(content) = capture.get(1) {
            cells.push(visible_text(content.as_str())?);
        }
    }

    if cells.is_empty() {
        return Ok(None);
    }
    Ok(Some(cells))
}

/// Parses a rate written as `5.385`, `5,385` or `1.234,56`.
///
/// When both separators appear, the last one is the decimal separator.
/// A lone comma is treated as the decimal separator.
#[must_use]
pub fn parse_localized_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => trimmed.replace(',', ""),
        (Some(_), None) if trimmed.matches(',').count() == 1 => trimmed.replace(',', "."),
        (Some(_), None) => return None,
        (None, _) => trimmed.to_string(),
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn visible_text_strips_markup() {
        let html = r#"<html><head><style>.a{color:red}</style>
            <script>var x = "1 USD = 9 BRL";</script></head>
            <body><span dir="ltr">1&nbsp;USD = <b>5,385</b> BRL</span></body></html>"#;
        let text = visible_text(html).unwrap();
        assert_eq!(text, "1 USD = 5,385 BRL");
    }

    #[test]
    fn first_row_cells_are_extracted() {
        let html = r#"
            <table>
              <thead><tr><th>Data</th><th>Taxa</th></tr></thead>
              <tbody>
                <tr><td> 10/01/2025 </td><td class="rate">5.4321</td></tr>
                <tr><td>09/01/2025</td><td>5.5000</td></tr>
              </tbody>
            </table>"#;
        let cells = first_table_row_cells(html).unwrap().unwrap();
        assert_eq!(cells, vec!["10/01/2025".to_string(), "5.4321".to_string()]);
    }

    #[test]
    fn missing_table_yields_none() {
        assert!(first_table_row_cells("<p>no table</p>").unwrap().is_none());
        assert!(first_table_row_cells("<table><tbody></tbody></table>").unwrap().is_none());
    }

    #[test]
    fn parses_both_separators() {
        assert_eq!(parse_localized_decimal("5.385"), Some(Decimal::new(5385, 3)));
        assert_eq!(parse_localized_decimal("5,385"), Some(Decimal::new(5385, 3)));
        assert_eq!(parse_localized_decimal("1.234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_localized_decimal("1,234.56"), Some(Decimal::new(123456, 2)));
    }

    #[test]
    fn built_in_patterns_compile() {
        for regex in [&SCRIPT_BLOCKS, &TAGS, &WHITESPACE, &TBODY, &ROW, &CELL] {
            assert!(compiled(regex).is_ok());
        }
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_localized_decimal(""), None);
        assert_eq!(parse_localized_decimal("abc"), None);
        assert_eq!(parse_localized_decimal("1,2,3"), None);
    }
}
