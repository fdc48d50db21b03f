use std::sync::Arc;

use anyhow::Context;
use chrono::TimeDelta;
use contactform_core_form_contracts::{ContactFormService, FormSubmitError};
use contactform_email_contracts::{ContentType, Email, EmailService};
use contactform_models::submission::{FormSubmission, SubmissionModel};
use contactform_shared_contracts::{app::AppContextService, time::TimeService};
use contactform_validation_contracts::{ValidateError, ValidationService};
use email_address::EmailAddress;
use tracing::warn;

pub mod module;

pub use module::ContactFormModule;

#[derive(Debug, Clone)]
pub struct ContactFormServiceImpl<Time, Validator, Email, App> {
    time: Time,
    validator: Validator,
    email: Email,
    app: App,
    module: Arc<ContactFormModule>,
}

impl<Time, Validator, Email, App> ContactFormServiceImpl<Time, Validator, Email, App> {
    pub fn new(
        time: Time,
        validator: Validator,
        email: Email,
        app: App,
        module: Arc<ContactFormModule>,
    ) -> Self {
        Self {
            time,
            validator,
            email,
            app,
            module,
        }
    }
}

impl<TimeS, ValidatorS, EmailS, AppS> ContactFormService
    for ContactFormServiceImpl<TimeS, ValidatorS, EmailS, AppS>
where
    TimeS: TimeService,
    ValidatorS: ValidationService,
    EmailS: EmailService,
    AppS: AppContextService,
{
    #[tracing::instrument(skip(self, submission))]
    async fn submit(&self, submission: FormSubmission) -> Result<(), FormSubmitError> {
        let elapsed = self
            .time
            .now()
            .signed_duration_since(submission.rendered_at);
        let delay =
            TimeDelta::from_std(self.module.spam_detection_delay()).unwrap_or(TimeDelta::MAX);
        if elapsed < delay {
            return Err(FormSubmitError::Spam);
        }

        let model = SubmissionModel::from_request(self.module.attributes(), &submission.fields);

        self.validator
            .validate(&model, self.module.rules())
            .map_err(|err| match err {
                ValidateError::Invalid(violations) => FormSubmitError::Invalid(violations),
                ValidateError::Other(err) => FormSubmitError::Other(err),
            })?;

        if let Some(callback) = self.module.callback() {
            callback(&model).context("Submit callback failed")?;
        }

        let submitter = self.submitter_address(&model);
        let subject = self.module.mail_title(&self.app);
        let body = self.compose_body(&model);

        for recipient in self.module.recipients() {
            let email = Email {
                recipient: recipient.clone(),
                subject: subject.clone(),
                body: body.clone(),
                content_type: ContentType::Text,
                reply_to: submitter.clone(),
            };
            if !self.email.send(email).await? {
                return Err(FormSubmitError::Send);
            }
        }

        if let Some(recipient) = submitter {
            let copy = Email {
                recipient,
                subject,
                body,
                content_type: ContentType::Text,
                reply_to: None,
            };
            if !self.email.send(copy).await? {
                return Err(FormSubmitError::Send);
            }
        }

        Ok(())
    }
}

impl<TimeS, ValidatorS, EmailS, AppS> ContactFormServiceImpl<TimeS, ValidatorS, EmailS, AppS> {
    /// Resolves the submitter's address from the attribute named by
    /// `send_to_user_email`. The configuration contract requires that
    /// attribute to exist and to hold a mail address; when it does not, the
    /// copy is skipped rather than failing the whole submission.
    fn submitter_address(&self, model: &SubmissionModel) -> Option<EmailAddress> {
        let attribute = self.module.send_to_user_email().attribute()?;
        let Some(value) = model.get(attribute) else {
            warn!("`send_to_user_email` names `{attribute}`, which is not a form attribute");
            return None;
        };
        match value.parse::<EmailAddress>() {
            Ok(address) => Some(address),
            Err(err) => {
                warn!(
                    "Submitted `{attribute}` is not a mail address, \
                     skipping the submitter copy: {err}"
                );
                None
            }
        }
    }

    /// Plain-text mail body: the configured intro text followed by one
    /// label/value row per attribute, or per detail view entry when
    /// configured.
    fn compose_body(&self, model: &SubmissionModel) -> String {
        let mut body = String::new();
        if let Some(text) = self.module.mail_text() {
            body.push_str(text);
            body.push_str("\n\n");
        }

        match self.module.detail_view_attributes() {
            Some(displays) => {
                for display in displays {
                    let label = display
                        .label
                        .clone()
                        .unwrap_or_else(|| self.module.attribute_label(&display.attribute));
                    let value = model
                        .get(&display.attribute)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    body.push_str(&format!("{label}: {value}\n"));
                }
            }
            None => {
                for (attribute, value) in model.iter() {
                    let label = self.module.attribute_label(attribute);
                    body.push_str(&format!("{label}: {value}\n"));
                }
            }
        }

        body
    }
}
