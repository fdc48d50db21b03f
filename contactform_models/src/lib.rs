use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

pub mod form;
pub mod submission;

pub static ATTRIBUTE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z][a-zA-Z0-9_]*$").unwrap());

/// Name of a field on the dynamically constructed submission model.
#[nutype(
    validate(len_char_max = 64, regex = ATTRIBUTE_NAME_REGEX),
    derive(
        Debug,
        Display,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        TryFrom,
        Deref,
        Serialize,
        Deserialize,
    )
)]
pub struct AttributeName(String);

/// Value submitted for a single attribute. Length limits are a matter for the
/// validation rules, not for this type.
#[nutype(derive(
    Debug,
    Display,
    Clone,
    PartialEq,
    Eq,
    From,
    Deref,
    Serialize,
    Deserialize,
))]
pub struct FieldValue(String);

impl AttributeName {
    /// Default display label for attributes without a configured one:
    /// `first_name` and `firstName` both become `First Name`.
    pub fn humanized(&self) -> String {
        let mut words: Vec<String> = Vec::new();
        let mut current = String::new();
        for c in self.chars() {
            if c == '_' {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else if c.is_ascii_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
                current.push(c);
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            words.push(current);
        }

        words
            .iter()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_name_validation() {
        for valid in ["name", "email", "first_name", "firstName", "address2"] {
            AttributeName::try_from(valid.to_owned()).unwrap();
        }
        for invalid in ["", "2fast", "first name", "first-name", "e@mail"] {
            AttributeName::try_from(invalid.to_owned()).unwrap_err();
        }
    }

    #[test]
    fn humanized() {
        for (input, expected) in [
            ("name", "Name"),
            ("first_name", "First Name"),
            ("firstName", "First Name"),
            ("tel", "Tel"),
            ("street_no_2", "Street No 2"),
        ] {
            let attribute = AttributeName::try_from(input.to_owned()).unwrap();
            assert_eq!(attribute.humanized(), expected);
        }
    }
}
