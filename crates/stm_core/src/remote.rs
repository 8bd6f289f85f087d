//! Completion handling for forwarded remote intents.
//!
//! A failed remote call is terminal where it was requested: it is logged and
//! turned into exactly one error notification. Nothing is retried and no
//! local state is touched, since none was changed speculatively.

use crate::ports::{Completion, Notifier, TransportResult};
use log::{info, warn};
use std::rc::Rc;

/// Builds the completion for one remote intent.
///
/// `action` and `subject` only feed the log line; `error_message` is what the
/// user sees on failure.
pub(crate) fn report_failure(
    notifier: &Rc<dyn Notifier>,
    action: &'static str,
    subject: String,
    error_message: String,
) -> Completion {
    let notifier = Rc::clone(notifier);
    Box::new(move |result: TransportResult| match result {
        Ok(()) => {
            info!("event={action} module=remote status=ok subject={subject}");
        }
        Err(err) => {
            warn!("event={action} module=remote status=error subject={subject} error={err}");
            notifier.add_error(&error_message);
        }
    })
}
