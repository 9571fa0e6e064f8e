//! Location listing pagination and identifier resolution.
//!
//! The listing is a server-side paginated grid. Page navigation is a
//! postback with argument `Page$N`; a location's opaque identifier is only
//! obtainable by a second, row-selecting postback (`click-N`) whose
//! response navigates to a URL carrying a `LocationID` query parameter.
//! Both postbacks mutate server state, so everything here runs strictly in
//! order against the owned page cursor.

use cricos_models::Location;
use cricos_session::{Page, PostbackClient};
use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use crate::postback::postback;
use crate::{ExtractError, selector, table};

/// Element id of the location listing grid.
const LISTING_ID: &str = "locationList_gridSearchResults";

/// Postback event target for the listing grid (pager clicks and row
/// selection alike).
const LISTING_EVENT_TARGET: &str = "locationList$gridSearchResults";

/// The listing renders one column-header row above the data rows.
const LISTING_HEADER_ROWS: usize = 1;

/// An unpaginated listing has nothing after the data rows.
const LISTING_FOOTER_ROWS: usize = 0;

/// A paginated listing appends the pager as its final row.
const PAGINATED_FOOTER_ROWS: usize = 1;

/// Query parameter carrying the opaque location identifier on the page a
/// row-selection postback navigates to.
const LOCATION_ID_PARAM: &str = "LocationID";

/// Pager state parsed from the grid's pager element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pager {
    current: u32,
    total: u32,
}

/// Reads "Page {current} of {total}" from the listing's pager element.
/// `None` means the listing is single-page.
fn pager_of(document: &Html) -> Option<Pager> {
    let css = format!("#{LISTING_ID} .gridPager");
    let sel = selector(&css).ok()?;
    let text = document.select(&sel).next()?.text().collect::<String>();

    let pattern = Regex::new(r"Page ([0-9]+) of ([0-9]+)").ok()?;
    let captures = pattern.captures(text.trim())?;
    Some(Pager {
        current: captures[1].parse().ok()?,
        total: captures[2].parse().ok()?,
    })
}

/// The visible cells of one listing row, extracted before any further
/// postback invalidates the parsed document.
#[derive(Debug)]
struct ListingRow {
    name: Option<String>,
    state: Option<String>,
    number_of_courses: Option<String>,
}

impl ListingRow {
    fn from_row(row: ElementRef<'_>) -> Self {
        Self {
            name: table::cell_text(row, 0),
            state: table::cell_text(row, 1),
            number_of_courses: table::cell_text(row, 2),
        }
    }
}

/// Extracts the data rows of the currently loaded listing page. A missing
/// listing table yields zero rows, which is distinct from the no-locations
/// sentinel handled upstream.
fn listing_rows(page: &Page, paginated: bool) -> Result<Vec<ListingRow>, ExtractError> {
    let document = Html::parse_document(&page.body);
    let sel = selector(&format!("#{LISTING_ID}"))?;
    let Some(listing) = document.select(&sel).next() else {
        return Ok(Vec::new());
    };

    let footer_rows = if paginated {
        PAGINATED_FOOTER_ROWS
    } else {
        LISTING_FOOTER_ROWS
    };
    let rows = table::rows(listing);
    Ok(table::row_window(&rows, LISTING_HEADER_ROWS, footer_rows)
        .iter()
        .map(|row| ListingRow::from_row(*row))
        .collect())
}

/// Resolves the opaque identifier for the zero-based data row `row_index`
/// on the currently loaded page. The selection postback navigates to a
/// page whose URL carries the identifier; the listing page itself stays
/// valid for further submissions.
async fn resolve_location_id<C: PostbackClient>(
    client: &C,
    page: &Page,
    row_index: usize,
) -> Result<Option<String>, ExtractError> {
    let result = postback(
        client,
        page,
        LISTING_EVENT_TARGET,
        &format!("click-{row_index}"),
    )
    .await?;

    let id = location_id_from_url(&result.url);
    if id.is_none() {
        log::warn!(
            "row {row_index}: selection postback landed on {} without a {LOCATION_ID_PARAM} parameter",
            result.url
        );
    }
    Ok(id)
}

fn location_id_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == LOCATION_ID_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Builds the [`Location`] records for the rows currently on the page,
/// resolving each row's identifier immediately.
async fn locations_of_page<C: PostbackClient>(
    client: &C,
    page: &Page,
    paginated: bool,
) -> Result<Vec<Location>, ExtractError> {
    let rows = listing_rows(page, paginated)?;
    let mut locations = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.into_iter().enumerate() {
        let location_id = resolve_location_id(client, page, row_index).await?;
        locations.push(Location {
            location_id,
            name: row.name,
            state: row.state,
            number_of_courses: row.number_of_courses,
        });
    }
    Ok(locations)
}

/// Walks every listing page in order and concatenates the extracted
/// locations. The postback to a target page is skipped when the cursor is
/// already positioned on it, which in practice only happens for page 1.
pub async fn collect_locations<C: PostbackClient>(
    client: &C,
    page: &mut Page,
) -> Result<Vec<Location>, ExtractError> {
    let pager = {
        let document = Html::parse_document(&page.body);
        pager_of(&document)
    };

    let Some(pager) = pager else {
        return locations_of_page(client, page, false).await;
    };

    log::debug!("location listing spans {} pages", pager.total);

    let mut locations = Vec::new();
    let mut current = pager.current;
    for target in 1..=pager.total {
        if target != current {
            let next = postback(
                client,
                page,
                LISTING_EVENT_TARGET,
                &format!("Page${target}"),
            )
            .await?;
            *page = next;
            current = target;
        }
        locations.extend(locations_of_page(client, page, true).await?);
    }
    Ok(locations)
}
