use std::{collections::HashMap, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
use contactform_models::{
    form::{FieldDisplay, RuleDescriptor},
    AttributeName,
};
use email_address::EmailAddress;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub form: ContactFormConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Title of the hosting site. Seeds the process-wide application context
    /// and thereby the default mail subject.
    pub title: String,
}

/// Configuration surface of the contact-form module.
///
/// ```toml
/// [form]
/// attributes = ["name", "email", "street", "city", "tel", "message"]
/// recipients = ["admin@example.com"]
///
/// [[form.rules]]
/// attributes = ["name", "email", "street", "city", "message"]
/// kind = "required"
///
/// [[form.rules]]
/// attributes = ["email"]
/// kind = "email"
/// ```
///
/// `attributes` and `recipients` are required; everything else has a default.
/// Their absence is only detected by the module initialization guard, not at
/// parse time, so that all configuration defects surface in one place on
/// startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactFormConfig {
    /// Fields of the dynamically constructed submission model.
    #[serde(default)]
    pub attributes: Option<Vec<AttributeName>>,
    /// Custom rows for the submitted-values table in the notification mail.
    /// When unset, the table lists every attribute in configuration order.
    #[serde(default)]
    pub detail_view_attributes: Option<Vec<FieldDisplay>>,
    /// Display labels. Attributes without an entry fall back to a humanized
    /// form of their name.
    #[serde(default)]
    pub attribute_labels: HashMap<AttributeName, String>,
    /// Declarative rules handed to the validation engine of the host.
    #[serde(default)]
    pub rules: Vec<RuleDescriptor>,
    /// Destination addresses of the notification mail.
    #[serde(default)]
    pub recipients: Option<Vec<EmailAddress>>,
    /// Submissions arriving faster than this many seconds after the form was
    /// rendered are treated as automated. Humans need at least two seconds.
    #[serde(default = "default_spam_detection_delay")]
    pub spam_detection_delay: u64,
    /// Name of the attribute holding the submitter's own address, to send
    /// them a copy of the notification. `false` disables the copy.
    #[serde(default)]
    pub send_to_user_email: SendToUserEmail,
    /// Markdown text prepended to the mail body.
    #[serde(default)]
    pub mail_text: Option<String>,
    /// Explicit mail subject. When unset, the subject is derived from the
    /// site title on first use.
    #[serde(default)]
    pub mail_title: Option<String>,
}

fn default_spam_detection_delay() -> u64 {
    2
}

/// Fatal configuration defects raised by the module initialization guard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("The `attributes` key must be set to the list of form fields.")]
    MissingAttributes,
    #[error("The `recipients` key must be set to at least one destination address.")]
    MissingRecipients,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SendToUserEmail {
    #[default]
    Disabled,
    Attribute(AttributeName),
}

impl SendToUserEmail {
    pub fn attribute(&self) -> Option<&AttributeName> {
        match self {
            Self::Disabled => None,
            Self::Attribute(attribute) => Some(attribute),
        }
    }
}

impl<'de> Deserialize<'de> for SendToUserEmail {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Attribute(AttributeName),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Self::Disabled),
            Raw::Flag(true) => Err(serde::de::Error::custom(
                "expected `false` or the name of the attribute holding the submitter's email address",
            )),
            Raw::Attribute(attribute) => Ok(Self::Attribute(attribute)),
        }
    }
}

#[cfg(test)]
mod tests {
    use contactform_models::form::RuleKind;

    use super::*;

    #[test]
    fn load_default_config() {
        let config = load(&[Path::new(DEFAULT_CONFIG_PATH)]).unwrap();
        config.form.attributes.unwrap();
        config.form.recipients.unwrap();
    }

    #[test]
    fn defaults() {
        let config = parse(
            r#"
            [site]
            title = "Example"

            [form]
            attributes = ["name", "email"]
            recipients = ["admin@example.com"]
            "#,
        );

        assert_eq!(config.site.title, "Example");
        assert_eq!(config.form.detail_view_attributes, None);
        assert!(config.form.attribute_labels.is_empty());
        assert!(config.form.rules.is_empty());
        assert_eq!(config.form.spam_detection_delay, 2);
        assert_eq!(config.form.send_to_user_email, SendToUserEmail::Disabled);
        assert_eq!(config.form.mail_text, None);
        assert_eq!(config.form.mail_title, None);
    }

    #[test]
    fn required_keys_may_be_absent_at_parse_time() {
        let config = parse(
            r#"
            [site]
            title = "Example"

            [form]
            "#,
        );

        assert_eq!(config.form.attributes, None);
        assert_eq!(config.form.recipients, None);
    }

    #[test]
    fn full() {
        let config = parse(
            r#"
            [site]
            title = "Example"

            [form]
            attributes = ["name", "email", "message"]
            recipients = ["admin@example.com", "sales@example.com"]
            spam_detection_delay = 5
            send_to_user_email = "email"
            mail_text = "Thanks for reaching out."
            mail_title = "Contact"
            detail_view_attributes = [
                { attribute = "name", label = "Full Name" },
                { attribute = "message" },
            ]

            [form.attribute_labels]
            email = "E-Mail"

            [[form.rules]]
            attributes = ["name", "email", "message"]
            kind = "required"

            [[form.rules]]
            attributes = ["email"]
            kind = "email"

            [[form.rules]]
            attributes = ["message"]
            kind = "max_length"
            max = 4096
            "#,
        );

        let form = config.form;
        assert_eq!(form.attributes.unwrap().len(), 3);
        assert_eq!(
            form.recipients.unwrap()[1],
            "sales@example.com".parse::<EmailAddress>().unwrap()
        );
        assert_eq!(form.spam_detection_delay, 5);
        assert_eq!(
            form.send_to_user_email.attribute().map(|a| &***a),
            Some("email")
        );
        assert_eq!(form.mail_text.as_deref(), Some("Thanks for reaching out."));
        assert_eq!(form.mail_title.as_deref(), Some("Contact"));

        let displays = form.detail_view_attributes.unwrap();
        assert_eq!(displays[0].label.as_deref(), Some("Full Name"));
        assert_eq!(displays[1].label, None);

        let label_key = AttributeName::try_from("email".to_owned()).unwrap();
        assert_eq!(form.attribute_labels[&label_key], "E-Mail");

        assert_eq!(form.rules.len(), 3);
        assert_eq!(form.rules[1].kind, RuleKind::Email);
        assert_eq!(form.rules[2].kind, RuleKind::MaxLength { max: 4096 });
    }

    #[test]
    fn send_to_user_email_rejects_true() {
        parse_err(
            r#"
            [site]
            title = "Example"

            [form]
            attributes = ["email"]
            recipients = ["admin@example.com"]
            send_to_user_email = true
            "#,
        );
    }

    #[test]
    fn send_to_user_email_rejects_invalid_attribute_name() {
        parse_err(
            r#"
            [site]
            title = "Example"

            [form]
            attributes = ["email"]
            recipients = ["admin@example.com"]
            send_to_user_email = "e mail"
            "#,
        );
    }

    fn parse(content: &str) -> Config {
        try_parse(content).unwrap()
    }

    fn parse_err(content: &str) {
        try_parse(content).unwrap_err();
    }

    fn try_parse(content: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
