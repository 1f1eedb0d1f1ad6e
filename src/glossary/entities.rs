use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::value_objects::TermId;

/// Closed vocabulary of semantic relation kinds between terms.
///
/// Relations are persisted with their label. The English kebab-case name is
/// accepted as an alias on input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "имеет", alias = "has")]
    Has,
    #[serde(rename = "является частью", alias = "is-part-of")]
    IsPartOf,
    #[serde(rename = "характеризует", alias = "characterizes")]
    Characterizes,
    #[serde(rename = "участвует в", alias = "participates-in")]
    ParticipatesIn,
    #[serde(rename = "включает в себя", alias = "includes")]
    Includes,
    #[serde(rename = "вмещает в себя", alias = "contains")]
    Contains,
    #[serde(rename = "является подзадачей", alias = "is-subtask-of")]
    IsSubtaskOf,
    #[serde(rename = "является подсвойством", alias = "is-subproperty-of")]
    IsSubpropertyOf,
    #[serde(rename = "имеет свойство", alias = "has-property")]
    HasProperty,
    #[serde(rename = "связан с", alias = "related-to")]
    RelatedTo,
    #[serde(rename = "используется в", alias = "used-in")]
    UsedIn,
    #[serde(rename = "преобразуется в", alias = "transforms-to")]
    TransformsTo,
    #[serde(rename = "создает", alias = "creates")]
    Creates,
    #[serde(rename = "является результатом", alias = "is-result-of")]
    IsResultOf,
    #[serde(rename = "производит", alias = "produces")]
    Produces,
    #[serde(rename = "распознается через", alias = "recognized-by")]
    RecognizedBy,
}

impl RelationType {
    /// Every relation kind, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Has,
        Self::IsPartOf,
        Self::Characterizes,
        Self::ParticipatesIn,
        Self::Includes,
        Self::Contains,
        Self::IsSubtaskOf,
        Self::IsSubpropertyOf,
        Self::HasProperty,
        Self::RelatedTo,
        Self::UsedIn,
        Self::TransformsTo,
        Self::Creates,
        Self::IsResultOf,
        Self::Produces,
        Self::RecognizedBy,
    ];

    /// Returns the label stored in the glossary document.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Has => "имеет",
            Self::IsPartOf => "является частью",
            Self::Characterizes => "характеризует",
            Self::ParticipatesIn => "участвует в",
            Self::Includes => "включает в себя",
            Self::Contains => "вмещает в себя",
            Self::IsSubtaskOf => "является подзадачей",
            Self::IsSubpropertyOf => "является подсвойством",
            Self::HasProperty => "имеет свойство",
            Self::RelatedTo => "связан с",
            Self::UsedIn => "используется в",
            Self::TransformsTo => "преобразуется в",
            Self::Creates => "создает",
            Self::IsResultOf => "является результатом",
            Self::Produces => "производит",
            Self::RecognizedBy => "распознается через",
        }
    }

    /// Returns the English kebab-case alias.
    #[must_use]
    pub fn alias(self) -> &'static str {
        match self {
            Self::Has => "has",
            Self::IsPartOf => "is-part-of",
            Self::Characterizes => "characterizes",
            Self::ParticipatesIn => "participates-in",
            Self::Includes => "includes",
            Self::Contains => "contains",
            Self::IsSubtaskOf => "is-subtask-of",
            Self::IsSubpropertyOf => "is-subproperty-of",
            Self::HasProperty => "has-property",
            Self::RelatedTo => "related-to",
            Self::UsedIn => "used-in",
            Self::TransformsTo => "transforms-to",
            Self::Creates => "creates",
            Self::IsResultOf => "is-result-of",
            Self::Produces => "produces",
            Self::RecognizedBy => "recognized-by",
        }
    }
}

impl Display for RelationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RelationType {
    type Err = UnknownRelationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == s || kind.alias() == s)
            .ok_or_else(|| UnknownRelationType {
                value: s.to_string(),
            })
    }
}

/// Raised when text does not name a known [`RelationType`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown relation type `{value}`")]
pub struct UnknownRelationType {
    pub value: String,
}

/// A directed, typed edge from the owning term to another term.
///
/// The target is not required to exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub target_term_id: TermId,
    pub relation_type: RelationType,
    #[serde(default)]
    pub description: Option<String>,
}

impl Relation {
    #[must_use]
    pub fn new(target: impl Into<TermId>, relation_type: RelationType) -> Self {
        Self {
            target_term_id: target.into(),
            relation_type,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A stored glossary entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Term {
    pub id: TermId,
    #[validate(length(min = 1, message = "term must not be empty"))]
    pub term: String,
    #[validate(length(min = 1, message = "definition must not be empty"))]
    pub definition: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Term {
    /// Returns `true` when `query` is a case-insensitive substring of the
    /// name or the definition.
    ///
    /// `query` is expected to be lower-cased already.
    #[must_use]
    pub fn mentions(&self, query: &str) -> bool {
        self.term.to_lowercase().contains(query) || self.definition.to_lowercase().contains(query)
    }

    /// Returns the category when present and non-empty.
    #[must_use]
    pub fn listed_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|category| !category.is_empty())
    }
}

/// Caller supplied fields of a term, used for both create and full replace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TermInput {
    #[validate(length(min = 1, message = "term must not be empty"))]
    pub term: String,
    #[validate(length(min = 1, message = "definition must not be empty"))]
    pub definition: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl TermInput {
    #[must_use]
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            category: None,
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Identifier a create of this input would be stored under.
    #[must_use]
    pub fn derive_id(&self) -> TermId {
        TermId::derive(&self.term)
    }

    /// Builds the stored record under `id`.
    #[must_use]
    pub fn into_term(self, id: TermId) -> Term {
        Term {
            id,
            term: self.term,
            definition: self.definition,
            category: self.category,
            relations: self.relations,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use validator::Validate;

    use super::{Relation, RelationType, TermInput};

    #[test]
    fn input_builds_record_with_derived_id() {
        let input = TermInput::new("Abstract Factory", "Creates families of objects")
            .with_category("Creational")
            .with_relation(Relation::new("gof_patterns", RelationType::IsPartOf));
        let id = input.derive_id();
        let term = input.clone().into_term(id);

        assert_eq!(term.id.as_str(), "abstract_factory");
        assert_eq!(term.term, input.term);
        assert_eq!(term.definition, input.definition);
        assert_eq!(term.category.as_deref(), Some("Creational"));
        assert_eq!(term.relations, input.relations);
    }

    #[rstest]
    #[case("", "definition")]
    #[case("term", "")]
    fn empty_name_or_definition_is_rejected(#[case] term: &str, #[case] definition: &str) {
        let errors = TermInput::new(term, definition)
            .validate()
            .expect_err("empty field");
        assert_eq!(errors.field_errors().len(), 1);
    }

    #[test]
    fn relation_types_accept_label_and_alias() {
        let by_label: RelationType = serde_json::from_str("\"является частью\"").expect("label");
        let by_alias: RelationType = serde_json::from_str("\"is-part-of\"").expect("alias");
        assert_eq!(by_label, RelationType::IsPartOf);
        assert_eq!(by_alias, RelationType::IsPartOf);
        assert_eq!(
            serde_json::to_string(&by_alias).expect("serialize"),
            "\"является частью\""
        );
    }

    #[test]
    fn unknown_relation_type_is_rejected() {
        assert!(serde_json::from_str::<RelationType>("\"is-friend-of\"").is_err());
        let err = "is-friend-of"
            .parse::<RelationType>()
            .expect_err("unknown relation");
        assert_eq!(err.value, "is-friend-of");
    }

    #[test]
    fn from_str_matches_serde_names() {
        for kind in RelationType::ALL {
            assert_eq!(kind.label().parse::<RelationType>(), Ok(kind));
            assert_eq!(kind.alias().parse::<RelationType>(), Ok(kind));
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.label()));
        }
    }

    #[test]
    fn relation_description_defaults_to_absent() {
        let relation: Relation = serde_json::from_str(
            r#"{"target_term_id": "observer", "relation_type": "has"}"#,
        )
        .expect("relation");
        assert_eq!(relation, Relation::new("observer", RelationType::Has));
    }

    #[test]
    fn search_and_category_helpers() {
        let term = TermInput::new("Singleton", "Ensures a single instance")
            .with_category("")
            .into_term("singleton".into());
        assert!(term.mentions("single"));
        assert!(term.mentions("instance"));
        assert!(!term.mentions("observer"));
        assert_eq!(term.listed_category(), None);
    }
}
