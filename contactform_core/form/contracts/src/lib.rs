use std::{future::Future, sync::Arc};

use contactform_models::submission::{FormSubmission, SubmissionModel};
use contactform_validation_contracts::RuleViolation;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFormService: Send + Sync + 'static {
    /// Handles one form submission: spam check, validation, callback and
    /// notification mail dispatch.
    fn submit(
        &self,
        submission: FormSubmission,
    ) -> impl Future<Output = Result<(), FormSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum FormSubmitError {
    #[error("The form was submitted faster than a human can fill it.")]
    Spam,
    #[error("The submitted data did not pass validation.")]
    Invalid(Vec<RuleViolation>),
    #[error("Failed to send the notification mail.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Hook invoked with the populated model after validation succeeds and
/// before the notification mail is dispatched, e.g. to persist submissions.
pub type SubmitCallback = Arc<dyn Fn(&SubmissionModel) -> anyhow::Result<()> + Send + Sync>;
