use serde::{Deserialize, Serialize};

use crate::AttributeName;

/// Declarative validation rule binding one or more attributes to a rule kind.
///
/// Descriptors are pure data: evaluation semantics belong to the validation
/// engine of the hosting framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub attributes: Vec<AttributeName>,
    #[serde(flatten)]
    pub kind: RuleKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    Email,
    MinLength { min: usize },
    MaxLength { max: usize },
    Pattern { pattern: String },
}

/// Display spec for one row of the submitted-values table in the
/// notification mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDisplay {
    pub attribute: AttributeName,
    /// Overrides the configured or humanized attribute label.
    #[serde(default)]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserialize_rule() {
        for (input, expected) in [
            (
                json!({"attributes": ["email"], "kind": "email"}),
                RuleKind::Email,
            ),
            (
                json!({"attributes": ["email"], "kind": "required"}),
                RuleKind::Required,
            ),
            (
                json!({"attributes": ["email"], "kind": "min_length", "min": 3}),
                RuleKind::MinLength { min: 3 },
            ),
            (
                json!({"attributes": ["email"], "kind": "pattern", "pattern": "^[0-9 +]+$"}),
                RuleKind::Pattern {
                    pattern: "^[0-9 +]+$".into(),
                },
            ),
        ] {
            let rule = serde_json::from_value::<RuleDescriptor>(input).unwrap();
            assert_eq!(
                rule.attributes,
                [AttributeName::try_from("email".to_owned()).unwrap()]
            );
            assert_eq!(rule.kind, expected);
        }
    }

    #[test]
    fn deserialize_rule_unknown_kind() {
        serde_json::from_value::<RuleDescriptor>(
            json!({"attributes": ["email"], "kind": "captcha"}),
        )
        .unwrap_err();
    }
}
