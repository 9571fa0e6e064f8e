//! Row and cell helpers for the registry's position-dependent tables.
//!
//! The registry's grids carry a fixed number of header rows (column
//! titles) and, when paginated, a trailing pager row. [`row_window`] is
//! the single primitive that strips those, parameterized per call site
//! with named constants instead of re-derived magic offsets.

use scraper::{ElementRef, Node};

/// Returns the data-row slice `[header_rows, len - footer_rows)`.
///
/// Empty when the window is inverted (fewer rows than the header and
/// footer together), which happens on structurally empty grids.
#[must_use]
pub fn row_window<T>(rows: &[T], header_rows: usize, footer_rows: usize) -> &[T] {
    let end = rows.len().saturating_sub(footer_rows);
    if header_rows >= end {
        return &[];
    }
    &rows[header_rows..end]
}

/// Collects the `<tr>` elements of a table in document order, looking
/// through `<thead>` / `<tbody>` / `<tfoot>` wrappers the HTML parser may
/// have inserted. Rows of nested tables are not included.
#[must_use]
pub fn rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut out = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => out.push(child),
            "thead" | "tbody" | "tfoot" => out.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    out
}

/// Collects the direct `<td>` / `<th>` cells of a row.
#[must_use]
pub fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// Returns the first child element of a node, skipping text nodes.
#[must_use]
pub fn first_child_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.children().find_map(ElementRef::wrap)
}

/// Trimmed text content of an element, `None` when empty.
///
/// The registry renders absent values as empty cells; collapsing those to
/// `None` keeps "missing element" and "empty element" equivalent for
/// callers.
#[must_use]
pub fn text_of(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Trimmed text of the cell at `index` within a row, `None` when the cell
/// is missing or empty. Structural mismatches degrade to `None` instead of
/// erroring.
#[must_use]
pub fn cell_text(row: ElementRef<'_>, index: usize) -> Option<String> {
    cells(row).get(index).copied().and_then(text_of)
}

/// The genuine text lines of an element: direct text-node children only,
/// trimmed, blank lines dropped, document order preserved. Markup children
/// (`<br>`, label spans) contribute nothing.
#[must_use]
pub fn text_lines(el: ElementRef<'_>) -> Vec<String> {
    el.children()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_owned())
                }
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    fn with_table<F: FnOnce(ElementRef<'_>)>(html: &str, f: F) {
        let document = Html::parse_document(html);
        let selector = Selector::parse("table").unwrap();
        f(document.select(&selector).next().unwrap());
    }

    #[test]
    fn window_strips_header_and_footer() {
        let rows = [0, 1, 2, 3, 4];
        assert_eq!(row_window(&rows, 1, 1), &[1, 2, 3]);
        assert_eq!(row_window(&rows, 1, 0), &[1, 2, 3, 4]);
    }

    #[test]
    fn inverted_window_is_empty() {
        let rows = [0];
        assert!(row_window(&rows, 1, 1).is_empty());
        assert!(row_window::<u8>(&[], 1, 0).is_empty());
    }

    #[test]
    fn rows_see_through_tbody() {
        // The parser inserts <tbody> around bare <tr> elements.
        with_table(
            "<table><tr><td>a</td></tr><tr><td>b</td></tr></table>",
            |table| {
                let rows = rows(table);
                assert_eq!(rows.len(), 2);
                assert_eq!(cell_text(rows[0], 0).as_deref(), Some("a"));
            },
        );
    }

    #[test]
    fn nested_table_rows_are_excluded() {
        with_table(
            "<table><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>",
            |table| {
                assert_eq!(rows(table).len(), 1);
            },
        );
    }

    #[test]
    fn missing_cell_degrades_to_none() {
        with_table("<table><tr><td>only</td></tr></table>", |table| {
            let row = rows(table)[0];
            assert_eq!(cell_text(row, 0).as_deref(), Some("only"));
            assert_eq!(cell_text(row, 3), None);
        });
    }

    #[test]
    fn empty_cell_is_none() {
        with_table("<table><tr><td>  </td></tr></table>", |table| {
            assert_eq!(cell_text(rows(table)[0], 0), None);
        });
    }

    #[test]
    fn text_lines_skip_markup_and_blanks() {
        let document = Html::parse_document(
            "<span id=\"addr\">Line one<br/>\n  <br/>Line three<br/><b>ignored</b></span>",
        );
        let selector = Selector::parse("#addr").unwrap();
        let el = document.select(&selector).next().unwrap();
        assert_eq!(text_lines(el), vec!["Line one", "Line three"]);
    }
}
