use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Value object identifying a glossary term.
///
/// Identifiers are derived once from the display name when a term is created
/// and never change afterwards, even if the term is renamed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId {
    value: String,
}

impl TermId {
    /// Wraps an existing identifier, e.g. one received from a request path.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Derives the identifier for a display name.
    ///
    /// The name is lower-cased and every space is replaced with an underscore.
    /// No other characters are touched, so distinct names such as `"A B"` and
    /// `"a_b"` derive the same identifier.
    #[must_use]
    pub fn derive(name: &str) -> Self {
        Self {
            value: name.to_lowercase().replace(' ', "_"),
        }
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl From<&str> for TermId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TermId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::TermId;

    #[rstest]
    #[case("Observer", "observer")]
    #[case("Abstract Factory", "abstract_factory")]
    #[case("Chain of  Responsibility", "chain_of__responsibility")]
    #[case("Model-View-Controller", "model-view-controller")]
    #[case("Электронный документ", "электронный_документ")]
    fn derives_lowercase_underscored_ids(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(TermId::derive(name).as_str(), expected);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TermId::new("factory_method");
        assert_eq!(
            serde_json::to_string(&id).expect("serialize"),
            "\"factory_method\""
        );
    }
}
