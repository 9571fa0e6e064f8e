//! Scripted [`PostbackClient`] fake and page fixture builders shared by the
//! extraction tests. No network I/O anywhere in the test suite.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Mutex;

use async_trait::async_trait;
use cricos_session::{Form, Page, PostbackClient, SessionError};
use url::Url;

/// A `PostbackClient` that replays staged responses and records every
/// submission's (`__EVENTTARGET`, `__EVENTARGUMENT`) pair.
pub(crate) struct FakeClient {
    fetches: Mutex<HashMap<String, Page>>,
    postbacks: Mutex<HashMap<(String, String), Page>>,
    submissions: Mutex<Vec<(String, String)>>,
    last_form: Mutex<Option<Form>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            fetches: Mutex::new(HashMap::new()),
            postbacks: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            last_form: Mutex::new(None),
        }
    }

    pub fn stage_fetch(&self, url: &str, body: &str) {
        self.fetches
            .lock()
            .unwrap()
            .insert(url.to_owned(), page(url, body));
    }

    pub fn stage_postback(&self, target: &str, argument: &str, result_url: &str, body: &str) {
        self.postbacks
            .lock()
            .unwrap()
            .insert((target.to_owned(), argument.to_owned()), page(result_url, body));
    }

    /// Every submission seen so far, in order.
    pub fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn last_form_had_field(&self, name: &str) -> bool {
        self.last_form
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|form| form.get(name).is_some())
    }
}

#[async_trait]
impl PostbackClient for FakeClient {
    async fn fetch(&self, url: &Url) -> Result<Page, SessionError> {
        self.fetches
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .map_or_else(|| panic!("unstaged fetch: {url}"), Ok)
    }

    async fn submit(&self, form: &Form) -> Result<Page, SessionError> {
        let target = form.get("__EVENTTARGET").unwrap_or_default().to_owned();
        let argument = form.get("__EVENTARGUMENT").unwrap_or_default().to_owned();
        self.submissions
            .lock()
            .unwrap()
            .push((target.clone(), argument.clone()));
        *self.last_form.lock().unwrap() = Some(form.clone());

        self.postbacks
            .lock()
            .unwrap()
            .get(&(target.clone(), argument.clone()))
            .cloned()
            .map_or_else(|| panic!("unstaged postback: {target} / {argument}"), Ok)
    }
}

pub(crate) fn page(url: &str, body: &str) -> Page {
    Page {
        url: Url::parse(url).unwrap(),
        body: body.to_owned(),
    }
}

/// Wraps page content in the registry's single postback form.
pub(crate) fn registry_page(content: &str) -> String {
    format!(
        "<html><body>\n\
         <form id=\"Form1\" action=\"InstitutionDetailsOnePage.aspx?ProviderID=1\">\n\
         <input type=\"hidden\" name=\"__VIEWSTATE\" value=\"dDwtMTIz\" />\n\
         {content}\n\
         </form>\n</body></html>"
    )
}

pub(crate) fn page_with_form(url: &str) -> Page {
    page(url, &registry_page(""))
}

/// Builds the location listing grid: one column-header row, the given data
/// rows (name, state, course count), and optionally a trailing pager row
/// announcing "Page {current} of {total}".
pub(crate) fn location_table(
    pager: Option<(u32, u32)>,
    rows: &[(&str, &str, &str)],
) -> String {
    let mut html = String::from(
        "<table id=\"locationList_gridSearchResults\">\n\
         <tr><th>Name</th><th>State</th><th>Number of Courses</th></tr>\n",
    );
    for (name, state, courses) in rows {
        let _ = writeln!(
            html,
            "<tr><td>{name}</td><td>{state}</td><td>{courses}</td></tr>"
        );
    }
    if let Some((current, total)) = pager {
        let _ = writeln!(
            html,
            "<tr class=\"gridPager\"><td colspan=\"3\">Page {current} of {total}</td></tr>"
        );
    }
    html.push_str("</table>");
    html
}

/// Builds a grid-variant contact panel: role caption plus a nested grid
/// table with one header row and one data row per officer
/// (name, phone, fax, email).
pub(crate) fn grid_panel(
    suffix: &str,
    role: &str,
    officers: &[(&str, &str, &str, &str)],
) -> String {
    let mut html = format!(
        "<div id=\"contactDetails_pnl{suffix}\">\n<span>{role}:</span>\n<div>\n\
         <table id=\"contactDetails_grid{suffix}\">\n\
         <tr><th>Name</th><th>Phone</th><th>Fax</th><th>Email</th></tr>\n"
    );
    for (name, phone, fax, email) in officers {
        let _ = writeln!(
            html,
            "<tr><td>{name}</td><td>{phone}</td><td>{fax}</td><td>{email}</td></tr>"
        );
    }
    html.push_str("</table>\n</div>\n</div>");
    html
}

/// Builds a flat-variant contact panel: role caption plus five labelled
/// rows. Pass `None` for `email` to omit the final row entirely.
pub(crate) fn flat_panel(
    suffix: &str,
    role: &str,
    name: &str,
    title: &str,
    phone: &str,
    fax: &str,
    email: Option<&str>,
) -> String {
    let mut html = format!(
        "<div id=\"contactDetails_pnl{suffix}\">\n<span>{role}:</span>\n<table>\n\
         <tr><td>Name:</td><td>{name}</td></tr>\n\
         <tr><td>Title:</td><td>{title}</td></tr>\n\
         <tr><td>Phone:</td><td>{phone}</td></tr>\n\
         <tr><td>Fax:</td><td>{fax}</td></tr>\n"
    );
    if let Some(email) = email {
        let _ = writeln!(html, "<tr><td>Email:</td><td>{email}</td></tr>");
    }
    html.push_str("</table>\n</div>");
    html
}
