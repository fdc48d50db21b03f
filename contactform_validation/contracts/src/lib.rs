use contactform_models::{form::RuleDescriptor, submission::SubmissionModel, AttributeName};
use thiserror::Error;

/// Rule evaluation engine of the hosting framework. The module only supplies
/// the rule descriptors and the populated model; what a rule kind means is
/// decided here.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ValidationService: Send + Sync + 'static {
    fn validate(
        &self,
        model: &SubmissionModel,
        rules: &[RuleDescriptor],
    ) -> Result<(), ValidateError>;
}

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("The submitted data did not pass validation.")]
    Invalid(Vec<RuleViolation>),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single failed rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub attribute: AttributeName,
    pub message: String,
}

#[cfg(feature = "mock")]
impl MockValidationService {
    pub fn with_validate(
        mut self,
        model: SubmissionModel,
        rules: Vec<RuleDescriptor>,
        result: Result<(), ValidateError>,
    ) -> Self {
        self.expect_validate()
            .once()
            .withf(move |m, r| *m == model && r == rules.as_slice())
            .return_once(move |_, _| result);
        self
    }
}
