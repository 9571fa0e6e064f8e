//! Scalar field extraction from the institution details section.
//!
//! Every reader is tolerant: a missing element yields `None` without
//! aborting the rest of the extraction. The element ids are the ASP.NET
//! control ids the registry renders.

use scraper::{ElementRef, Html, Selector};

use crate::table;

const PROVIDER_CODE_ID: &str = "#institutionDetails_lblProviderCode";
const TRADING_NAME_ID: &str = "#institutionDetails_lblInstitutionTradingName";
const NAME_ID: &str = "#institutionDetails_lblInstitutionName";
const TYPE_ID: &str = "#institutionDetails_lblInstitutionType";
const CAPACITY_ID: &str = "#institutionDetails_lblLocationCapacity";
const WEBSITE_ID: &str = "#institutionDetails_hplInstitutionWebAddress";
const POSTAL_ADDRESS_ID: &str = "#institutionDetails_lblInstitutionPostalAddress";

fn element<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn field_text(document: &Html, css: &str) -> Option<String> {
    element(document, css).and_then(table::text_of)
}

#[must_use]
pub fn provider_code(document: &Html) -> Option<String> {
    field_text(document, PROVIDER_CODE_ID)
}

#[must_use]
pub fn trading_name(document: &Html) -> Option<String> {
    field_text(document, TRADING_NAME_ID)
}

#[must_use]
pub fn name(document: &Html) -> Option<String> {
    field_text(document, NAME_ID)
}

#[must_use]
pub fn institution_type(document: &Html) -> Option<String> {
    field_text(document, TYPE_ID)
}

#[must_use]
pub fn website(document: &Html) -> Option<String> {
    field_text(document, WEBSITE_ID)
}

/// Approved capacity. The registry decorates the number freely
/// ("50 (approx)"), so this reads the leading run of digits and ignores
/// the rest; a field without a leading digit yields `None`.
#[must_use]
pub fn total_capacity(document: &Html) -> Option<u32> {
    parse_capacity(&field_text(document, CAPACITY_ID)?)
}

fn parse_capacity(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Multi-line postal address: the genuine text lines of the address span
/// (blank lines dropped), joined with `\n` in document order. `None` when
/// the span is missing or holds no text.
#[must_use]
pub fn postal_address(document: &Html) -> Option<String> {
    let lines = table::text_lines(element(document, POSTAL_ADDRESS_ID)?);
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
