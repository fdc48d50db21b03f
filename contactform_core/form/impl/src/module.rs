use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
    time::Duration,
};

use contactform_config::{ConfigurationError, ContactFormConfig, SendToUserEmail};
use contactform_core_form_contracts::SubmitCallback;
use contactform_models::{
    form::{FieldDisplay, RuleDescriptor},
    AttributeName,
};
use contactform_shared_contracts::app::AppContextService;
use email_address::EmailAddress;

/// Runtime contact-form module: the validated configuration plus the
/// optional submit hook.
///
/// Construction runs the initialization guard, so a module value only exists
/// for a complete configuration. The cached mail title is the only mutable
/// state; recomputing the default is harmless, so the first access stores
/// whatever it computed and explicit overrides simply overwrite the cache.
pub struct ContactFormModule {
    attributes: Vec<AttributeName>,
    detail_view_attributes: Option<Vec<FieldDisplay>>,
    attribute_labels: HashMap<AttributeName, String>,
    rules: Vec<RuleDescriptor>,
    recipients: Vec<EmailAddress>,
    spam_detection_delay: Duration,
    send_to_user_email: SendToUserEmail,
    mail_text: Option<String>,
    callback: Option<SubmitCallback>,
    mail_title: RwLock<Option<String>>,
}

impl ContactFormModule {
    /// Initialization guard: fails fast when a required key is missing. An
    /// explicitly configured but empty list counts as missing.
    pub fn new(config: ContactFormConfig) -> Result<Self, ConfigurationError> {
        let attributes = config
            .attributes
            .filter(|attributes| !attributes.is_empty())
            .ok_or(ConfigurationError::MissingAttributes)?;
        let recipients = config
            .recipients
            .filter(|recipients| !recipients.is_empty())
            .ok_or(ConfigurationError::MissingRecipients)?;

        Ok(Self {
            attributes,
            detail_view_attributes: config.detail_view_attributes,
            attribute_labels: config.attribute_labels,
            rules: config.rules,
            recipients,
            spam_detection_delay: Duration::from_secs(config.spam_detection_delay),
            send_to_user_email: config.send_to_user_email,
            mail_text: config.mail_text,
            callback: None,
            mail_title: RwLock::new(config.mail_title),
        })
    }

    /// Registers the hook invoked with the populated model on each
    /// successful submission.
    pub fn with_callback(mut self, callback: SubmitCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn attributes(&self) -> &[AttributeName] {
        &self.attributes
    }

    pub fn detail_view_attributes(&self) -> Option<&[FieldDisplay]> {
        self.detail_view_attributes.as_deref()
    }

    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    pub fn recipients(&self) -> &[EmailAddress] {
        &self.recipients
    }

    pub fn spam_detection_delay(&self) -> Duration {
        self.spam_detection_delay
    }

    pub fn send_to_user_email(&self) -> &SendToUserEmail {
        &self.send_to_user_email
    }

    pub fn mail_text(&self) -> Option<&str> {
        self.mail_text.as_deref()
    }

    pub fn callback(&self) -> Option<&SubmitCallback> {
        self.callback.as_ref()
    }

    /// Display label for an attribute: the configured label if present,
    /// otherwise the humanized attribute name. Translating configured labels
    /// is left to the host.
    pub fn attribute_label(&self, attribute: &AttributeName) -> String {
        self.attribute_labels
            .get(attribute)
            .cloned()
            .unwrap_or_else(|| attribute.humanized())
    }

    /// The notification mail subject.
    ///
    /// Computed as `[<site title>] Contact Request` on first access and
    /// cached; later changes to the site title do not affect it. A
    /// configured or programmatic override wins over the computed default.
    pub fn mail_title(&self, app: &impl AppContextService) -> String {
        if let Some(title) = &*self
            .mail_title
            .read()
            .unwrap_or_else(PoisonError::into_inner)
        {
            return title.clone();
        }

        let computed = format!("[{}] Contact Request", app.site_title());
        self.mail_title
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(computed)
            .clone()
    }

    /// Overrides the mail subject, suppressing the computed default.
    pub fn set_mail_title(&self, title: impl Into<String>) {
        *self
            .mail_title
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(title.into());
    }
}

impl std::fmt::Debug for ContactFormModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactFormModule")
            .field("attributes", &self.attributes)
            .field("recipients", &self.recipients)
            .finish_non_exhaustive()
    }
}
