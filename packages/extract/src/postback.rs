//! Hidden-field form submission.
//!
//! Every UI action on the registry page (pager clicks, row selection) is a
//! re-submission of the page's single form with `__EVENTTARGET` naming the
//! control and `__EVENTARGUMENT` carrying the action argument.

use cricos_session::{Page, PostbackClient};

use crate::ExtractError;

/// Id of the single form every registry page carries.
pub const FORM_ID: &str = "Form1";

/// Hidden field naming the control the postback targets.
pub const EVENT_TARGET_FIELD: &str = "__EVENTTARGET";

/// Hidden field carrying the action argument (`Page$N`, `click-N`).
pub const EVENT_ARGUMENT_FIELD: &str = "__EVENTARGUMENT";

/// Sets the two hidden fields on the page's form and submits it, yielding
/// the next page state.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] when the page has no form, or a session
/// error when the submission fails permanently.
pub async fn postback<C: PostbackClient>(
    client: &C,
    page: &Page,
    event_target: &str,
    event_argument: &str,
) -> Result<Page, ExtractError> {
    let mut form = page.form(FORM_ID).ok_or_else(|| ExtractError::Parse {
        message: format!("page {} has no form '{FORM_ID}'", page.url),
    })?;
    form.set(EVENT_TARGET_FIELD, event_target);
    form.set(EVENT_ARGUMENT_FIELD, event_argument);

    log::debug!("postback {event_target} / {event_argument}");
    Ok(client.submit(&form).await?)
}
