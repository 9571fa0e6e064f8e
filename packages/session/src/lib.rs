#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postback-capable HTTP session for the CRICOS registry.
//!
//! The registry is a stateful ASP.NET application: a single logical page
//! mutates in place through hidden form submissions (`__EVENTTARGET` /
//! `__EVENTARGUMENT`), so every interaction after the initial fetch is a
//! form re-submission against the page the server handed back last. This
//! crate models that as an owned [`Page`] snapshot threaded through one
//! extraction at a time, a [`Form`] extracted from it, and a
//! [`PostbackClient`] that turns a submission into the next `Page`.
//!
//! One [`HttpSession`] serves exactly one extraction. Sessions for
//! different provider ids are independent and may run concurrently, but a
//! single session must never be shared: the server's view state is bound
//! to the request order.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

/// Errors produced by the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server kept returning transient failures until the retry budget
    /// ran out.
    #[error("gave up on {url} after {attempts} attempts (last status {status})")]
    RetriesExhausted {
        /// URL of the request that kept failing.
        url: String,
        /// Total attempts made, including the first.
        attempts: u32,
        /// The last HTTP status observed.
        status: u16,
    },

    /// The server returned a permanent client error (4xx other than 429).
    #[error("HTTP {status} from {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// URL of the failed request.
        url: String,
    },
}

/// An owned snapshot of one server-side page state.
///
/// `url` is the final URL after redirects — postbacks that navigate away
/// (row selection) surface their result through it.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL the response came from.
    pub url: Url,
    /// Raw response body.
    pub body: String,
}

impl Page {
    /// Locates a form by element id and collects its named inputs in
    /// document order. Returns `None` when no such form exists or its
    /// action cannot be resolved against the page URL.
    #[must_use]
    pub fn form(&self, id: &str) -> Option<Form> {
        let document = Html::parse_document(&self.body);
        let form_selector = Selector::parse(&format!("form[id=\"{id}\"]")).ok()?;
        let input_selector = Selector::parse("input[name]").ok()?;

        let form = document.select(&form_selector).next()?;
        let action = match form.value().attr("action") {
            Some(action) if !action.is_empty() => self.url.join(action).ok()?,
            // ASP.NET pages routinely post back to themselves.
            _ => self.url.clone(),
        };

        let mut fields = Vec::new();
        for input in form.select(&input_selector) {
            let kind = input.value().attr("type").unwrap_or("text");
            if matches!(kind, "submit" | "button" | "image" | "reset") {
                continue;
            }
            let name = input.value().attr("name").unwrap_or_default();
            let value = input.value().attr("value").unwrap_or_default();
            fields.push((name.to_owned(), value.to_owned()));
        }

        Some(Form { action, fields })
    }
}

/// A form lifted out of a [`Page`], ready to be mutated and re-submitted.
#[derive(Debug, Clone)]
pub struct Form {
    /// Submission target, resolved against the page URL.
    pub action: Url,
    /// Named input fields in document order.
    pub fields: Vec<(String, String)>,
}

impl Form {
    /// Sets a field value, replacing an existing field of the same name or
    /// appending a new one.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|(n, _)| n == name) {
            field.1 = value.to_owned();
        } else {
            self.fields.push((name.to_owned(), value.to_owned()));
        }
    }

    /// Returns the current value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Fetches pages and turns form submissions into the next page state.
///
/// Implemented by [`HttpSession`] for real traffic and by scripted fakes in
/// tests.
#[async_trait]
pub trait PostbackClient: Send + Sync {
    /// Fetches a page by URL.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the request fails permanently or the
    /// retry budget is exhausted.
    async fn fetch(&self, url: &Url) -> Result<Page, SessionError>;

    /// Submits a form, returning the page the server responds with.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the request fails permanently or the
    /// retry budget is exhausted.
    async fn submit(&self, form: &Form) -> Result<Page, SessionError>;
}

/// Maximum retry attempts for transient failures (connect errors, timeouts,
/// HTTP 429, HTTP 5xx).
///
/// With exponential backoff (2s, 4s, 8s, 16s, 32s) the total wait before
/// giving up is 62 seconds. The registry's worst habit is intermittent 500s
/// under load, which clear well within that window.
const MAX_RETRIES: u32 = 5;

/// A cookie-holding `reqwest` session bound to one extraction.
#[derive(Debug)]
pub struct HttpSession {
    client: reqwest::Client,
}

impl HttpSession {
    /// Builds a session with a cookie store enabled. The registry issues a
    /// session cookie on the first response and expects it on every
    /// postback.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the underlying client cannot be built.
    pub fn new() -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a request with bounded retry on transient failures.
    ///
    /// The `build_request` closure is called on each attempt because
    /// builders are consumed by `.send()`. Retries connection errors,
    /// timeouts, HTTP 429 and HTTP 5xx with exponential backoff; other 4xx
    /// are permanent.
    async fn send_with_retry<F>(
        &self,
        url: &Url,
        build_request: F,
    ) -> Result<reqwest::Response, SessionError>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut last_status: u16 = 0;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_secs(1u64 << attempt); // 2s, 4s, 8s
                log::warn!("  retry {attempt}/{MAX_RETRIES} for {url} in {delay:?}...");
                tokio::time::sleep(delay).await;
            }

            match build_request().send().await {
                Err(e) => {
                    if is_transient(&e) && attempt < MAX_RETRIES {
                        log::warn!("  transient error: {e}");
                        continue;
                    }
                    return Err(SessionError::Http(e));
                }
                Ok(response) => {
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error()
                    {
                        last_status = status.as_u16();
                        if attempt < MAX_RETRIES {
                            log::warn!("  HTTP {status} from {url}");
                            continue;
                        }
                        break;
                    }

                    if status.is_client_error() {
                        return Err(SessionError::Status {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }

                    return Ok(response);
                }
            }
        }

        Err(SessionError::RetriesExhausted {
            url: url.to_string(),
            attempts: MAX_RETRIES + 1,
            status: last_status,
        })
    }
}

#[async_trait]
impl PostbackClient for HttpSession {
    async fn fetch(&self, url: &Url) -> Result<Page, SessionError> {
        log::debug!("GET {url}");
        let response = self
            .send_with_retry(url, || self.client.get(url.clone()))
            .await?;
        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok(Page {
            url: final_url,
            body,
        })
    }

    async fn submit(&self, form: &Form) -> Result<Page, SessionError> {
        log::debug!("POST {}", form.action);
        let response = self
            .send_with_retry(&form.action, || {
                self.client.post(form.action.clone()).form(&form.fields)
            })
            .await?;
        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok(Page {
            url: final_url,
            body,
        })
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Page {
        Page {
            url: Url::parse("http://registry.example/Institution/Details.aspx?ProviderID=1")
                .unwrap(),
            body: body.to_owned(),
        }
    }

    #[test]
    fn collects_named_inputs_in_document_order() {
        let page = page(
            r#"<html><body>
            <form id="Form1" action="Details.aspx">
              <input type="hidden" name="__VIEWSTATE" value="abc123" />
              <input type="hidden" name="__EVENTTARGET" value="" />
              <input type="hidden" name="__EVENTARGUMENT" value="" />
              <input type="submit" name="btnSearch" value="Search" />
            </form>
            </body></html>"#,
        );

        let form = page.form("Form1").unwrap();
        assert_eq!(
            form.fields,
            vec![
                ("__VIEWSTATE".to_owned(), "abc123".to_owned()),
                ("__EVENTTARGET".to_owned(), String::new()),
                ("__EVENTARGUMENT".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn resolves_action_against_page_url() {
        let page = page(r#"<form id="Form1" action="Details.aspx?x=1"></form>"#);
        let form = page.form("Form1").unwrap();
        assert_eq!(
            form.action.as_str(),
            "http://registry.example/Institution/Details.aspx?x=1"
        );
    }

    #[test]
    fn falls_back_to_page_url_when_action_missing() {
        let page = page(r#"<form id="Form1"></form>"#);
        let form = page.form("Form1").unwrap();
        assert_eq!(form.action, page.url);
    }

    #[test]
    fn missing_form_yields_none() {
        assert!(page("<html><body></body></html>").form("Form1").is_none());
    }

    #[test]
    fn set_replaces_existing_field() {
        let page = page(
            r#"<form id="Form1">
              <input type="hidden" name="__EVENTTARGET" value="" />
            </form>"#,
        );
        let mut form = page.form("Form1").unwrap();
        form.set("__EVENTTARGET", "locationList$gridSearchResults");
        form.set("__EVENTARGUMENT", "Page$2");

        assert_eq!(
            form.get("__EVENTTARGET"),
            Some("locationList$gridSearchResults")
        );
        assert_eq!(form.get("__EVENTARGUMENT"), Some("Page$2"));
        assert_eq!(form.fields.len(), 2);
    }
}
