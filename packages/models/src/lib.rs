#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types for records imported from the CRICOS registry.
//!
//! These are plain data holders with public fields and no behavior. Every
//! scraped field is optional: the registry renders institutions with wildly
//! varying completeness, and a missing element never aborts an import.

use serde::{Deserialize, Serialize};

/// A registered education institution, as rendered on the institution
/// details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    /// Caller-supplied provider id used to fetch the page.
    pub provider_id: u32,
    /// CRICOS provider code (e.g. `"00873F"`).
    pub provider_code: Option<String>,
    pub trading_name: Option<String>,
    pub name: Option<String>,
    /// Institution type (e.g. `"Government"`).
    pub institution_type: Option<String>,
    /// Approved student capacity. `None` when the field is absent or carries
    /// no digits.
    pub total_capacity: Option<u32>,
    pub website: Option<String>,
    /// Multi-line postal address, lines joined with `\n` in document order.
    pub postal_address: Option<String>,
    /// `None` when the page announced that no locations exist for the
    /// institution. `Some(vec![])` is the distinct case of a listing that
    /// structurally yielded zero rows.
    pub locations: Option<Vec<Location>>,
    /// Contact officers across every panel on the page, in panel order.
    pub contact_officers: Vec<ContactOfficer>,
}

/// A campus location row from the institution's location listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Opaque identifier resolved through a row-selection postback. Not
    /// derivable from the listing row itself.
    pub location_id: Option<String>,
    pub name: Option<String>,
    /// State or territory abbreviation as rendered (e.g. `"NSW"`).
    pub state: Option<String>,
    /// Course count, kept as the string the page renders.
    pub number_of_courses: Option<String>,
}

/// A contact officer extracted from one of the contact panels on the
/// institution details page.
///
/// `title` is only present for the flat panel layout; the tabular grid
/// layout never renders one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactOfficer {
    /// Panel role (e.g. `"Principal Executive Officer"`), trailing colon
    /// stripped. Shared by every officer in a grid panel.
    pub role: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
}

/// A course-sector contact from the per-state contact directory pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Course sector the contact is responsible for (e.g. school,
    /// vocational, higher education).
    pub course_type: Option<String>,
    pub name: Option<String>,
    pub organisation: Option<String>,
    pub address: Option<Address>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
}

/// A structured postal address for a directory [`Contact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
}
