//! Contact officer panels.
//!
//! Each panel on the details page holds one role's contact information in
//! one of two layouts, detected by probing for a nested grid table:
//!
//! - **Grid**: a tabular sub-table with one officer per data row. Every
//!   officer shares the panel's role ("International Student Contact"
//!   panels routinely list several named contacts); the layout has no
//!   title column.
//! - **Flat**: five labelled rows (name, title, phone, fax, email) with
//!   the value in the second cell. The email row is optional on the real
//!   pages.
//!
//! Structural mismatches (missing rows or cells) degrade to `None` fields
//! rather than failing the extraction.

use cricos_models::ContactOfficer;
use scraper::{ElementRef, Html, Selector};

use crate::table;

/// Id prefix shared by every contact panel `<div>`.
const PANEL_ID_PREFIX: &str = "contactDetails_pnl";

/// Id prefix of the nested grid table that marks the tabular layout.
const GRID_ID_PREFIX: &str = "contactDetails_grid";

/// The grid renders one column-header row above the officer rows.
const GRID_HEADER_ROWS: usize = 1;

/// Nothing follows the grid's officer rows.
const GRID_FOOTER_ROWS: usize = 0;

/// Grid columns, in rendering order.
const GRID_NAME_CELL: usize = 0;
const GRID_PHONE_CELL: usize = 1;
const GRID_FAX_CELL: usize = 2;
const GRID_EMAIL_CELL: usize = 3;

/// Flat layout row positions within the panel's table.
const FLAT_NAME_ROW: usize = 0;
const FLAT_TITLE_ROW: usize = 1;
const FLAT_PHONE_ROW: usize = 2;
const FLAT_FAX_ROW: usize = 3;
const FLAT_EMAIL_ROW: usize = 4;

/// The value sits in the second cell of each flat row, after the label.
const FLAT_VALUE_CELL: usize = 1;

/// Panel layout, decided once per panel before any field is read.
enum PanelLayout<'a> {
    Grid(ElementRef<'a>),
    Flat(ElementRef<'a>),
}

/// Extracts every contact officer on the page, preserving panel order and
/// within-grid row order.
#[must_use]
pub fn contact_officers(document: &Html) -> Vec<ContactOfficer> {
    let Ok(panel_selector) = Selector::parse(&format!("div[id^=\"{PANEL_ID_PREFIX}\"]")) else {
        return Vec::new();
    };
    let Ok(grid_selector) = Selector::parse(&format!("table[id^=\"{GRID_ID_PREFIX}\"]")) else {
        return Vec::new();
    };
    let Ok(table_selector) = Selector::parse("table") else {
        return Vec::new();
    };

    let mut officers = Vec::new();
    for panel in document.select(&panel_selector) {
        let role = panel_role(panel);
        let layout = panel.select(&grid_selector).next().map_or_else(
            || panel.select(&table_selector).next().map(PanelLayout::Flat),
            |grid| Some(PanelLayout::Grid(grid)),
        );

        match layout {
            Some(PanelLayout::Grid(grid)) => officers.extend(grid_officers(grid, role.as_deref())),
            Some(PanelLayout::Flat(table)) => officers.push(flat_officer(table, role)),
            None => log::warn!(
                "contact panel {:?} has no table, skipping",
                panel.value().attr("id").unwrap_or("?")
            ),
        }
    }
    officers
}

/// The panel's role caption is its first child element, rendered with a
/// trailing colon.
fn panel_role(panel: ElementRef<'_>) -> Option<String> {
    let text = table::first_child_element(panel).and_then(table::text_of)?;
    Some(text.strip_suffix(':').unwrap_or(&text).trim_end().to_owned())
}

fn grid_officers(grid: ElementRef<'_>, role: Option<&str>) -> Vec<ContactOfficer> {
    let rows = table::rows(grid);
    table::row_window(&rows, GRID_HEADER_ROWS, GRID_FOOTER_ROWS)
        .iter()
        .map(|row| ContactOfficer {
            role: role.map(ToOwned::to_owned),
            name: table::cell_text(*row, GRID_NAME_CELL),
            // The grid layout has no title column.
            title: None,
            phone: table::cell_text(*row, GRID_PHONE_CELL),
            fax: table::cell_text(*row, GRID_FAX_CELL),
            email: table::cell_text(*row, GRID_EMAIL_CELL),
        })
        .collect()
}

fn flat_officer(table_el: ElementRef<'_>, role: Option<String>) -> ContactOfficer {
    let rows = table::rows(table_el);
    let value_of = |row_index: usize| {
        rows.get(row_index)
            .copied()
            .and_then(|row| table::cell_text(row, FLAT_VALUE_CELL))
    };

    ContactOfficer {
        role,
        name: value_of(FLAT_NAME_ROW),
        title: value_of(FLAT_TITLE_ROW),
        phone: value_of(FLAT_PHONE_ROW),
        fax: value_of(FLAT_FAX_ROW),
        // The email row is absent on some pages; that is not an error.
        email: value_of(FLAT_EMAIL_ROW),
    }
}
