use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{AttributeName, FieldValue};

/// Raw form submission as received from the hosting framework.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    /// Untrusted field data, keyed by form field name.
    pub fields: HashMap<String, String>,
    /// When the form was rendered to the visitor. Basis of the spam check.
    pub rendered_at: DateTime<Utc>,
}

/// Submission model built dynamically from the configured attributes.
///
/// Field order follows the attribute configuration. Submitted fields without
/// a configured attribute are discarded; configured attributes without a
/// submitted value hold an empty value so that a `required` rule can reject
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionModel {
    fields: Vec<(AttributeName, FieldValue)>,
}

impl SubmissionModel {
    pub fn from_request(
        attributes: &[AttributeName],
        fields: &HashMap<String, String>,
    ) -> Self {
        let fields = attributes
            .iter()
            .map(|attribute| {
                let value = fields.get(&**attribute).cloned().unwrap_or_default();
                (attribute.clone(), value.into())
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, attribute: &AttributeName) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name, value))
    }
}
