//! Entry type definitions.
//!
//! Defines [`EntryType`] (the five kinds of captured knowledge), [`Entry`] (a record
//! as persisted by the store), [`EntryDraft`] (the create/update payload), and the
//! [`ViewIntent`] that drives what the client displays.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BabelError, Result};

/// The kinds of entries a user can capture. Ordered as in [`EntryType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// A single word or term worth keeping.
    Word,
    /// A phrase, saying, or expression.
    Phrase,
    /// A writer or thinker.
    Author,
    /// An idea, theory, or framework.
    Concept,
    /// A passage quoted from a text.
    Excerpt,
}

impl EntryType {
    /// All variants in display order.
    pub const ALL: [EntryType; 5] = [
        Self::Word,
        Self::Phrase,
        Self::Author,
        Self::Concept,
        Self::Excerpt,
    ];

    /// Wire-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Phrase => "phrase",
            Self::Author => "author",
            Self::Concept => "concept",
            Self::Excerpt => "excerpt",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "word" => Ok(Self::Word),
            "phrase" => Ok(Self::Phrase),
            "author" => Ok(Self::Author),
            "concept" => Ok(Self::Concept),
            "excerpt" => Ok(Self::Excerpt),
            _ => Err(format!("unknown entry type: {s}")),
        }
    }
}

/// Type constraint of a [`ViewIntent`]: everything, or a single [`EntryType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(EntryType),
}

impl TypeFilter {
    /// Value of the `type_filter` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(t) => t.as_str(),
        }
    }

    pub fn matches(&self, entry_type: EntryType) -> bool {
        match self {
            Self::All => true,
            Self::Only(t) => *t == entry_type,
        }
    }
}

impl std::fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other
                .parse::<EntryType>()
                .map(Self::Only)
                .map_err(|_| format!("unknown type filter: {s}")),
        }
    }
}

/// Opaque store-assigned identifier.
///
/// The store may send ids as JSON numbers or strings; both are held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// The store reports unset free-text fields as `""`.
fn empty_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// A persisted entry, as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Store-assigned id, never mutated by the client.
    pub id: EntryId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub title: String,
    pub content: String,
    /// Where the entry was encountered.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Personal reflection on why it was worth keeping.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub why_it_stuck: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub extended_note: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Display order only.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-text grouping label (e.g. `"Batch #2 (Foundational)"`).
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    /// Set at creation, not moved by edits.
    pub date_added: NaiveDate,
}

impl Entry {
    /// The payload that would re-submit this entry unchanged.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            entry_type: self.entry_type,
            title: self.title.clone(),
            content: self.content.clone(),
            source: self.source.clone(),
            why_it_stuck: self.why_it_stuck.clone(),
            extended_note: self.extended_note.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            batch: self.batch.clone(),
            date_added: Some(self.date_added),
        }
    }
}

/// Create/update payload: an [`Entry`] without its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub why_it_stuck: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub extended_note: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    /// Left unset on create, the store stamps today's date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<NaiveDate>,
}

impl EntryDraft {
    pub fn new(entry_type: EntryType, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            entry_type,
            title: title.into(),
            content: content.into(),
            source: None,
            why_it_stuck: None,
            extended_note: None,
            category: None,
            tags: Vec::new(),
            batch: None,
            date_added: None,
        }
    }

    /// Reject payloads the store must never see: blank title or blank content.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [("title", &self.title), ("content", &self.content)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BabelError::Validation(format!(
                "{} must not be empty",
                missing.join(" and ")
            )))
        }
    }
}

/// What the user currently wants to see: a free-text term and a type filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewIntent {
    pub term: String,
    pub type_filter: TypeFilter,
}

impl ViewIntent {
    /// Build an intent; surrounding whitespace in the term is ignored.
    pub fn new(term: impl AsRef<str>, type_filter: TypeFilter) -> Self {
        Self {
            term: term.as_ref().trim().to_string(),
            type_filter,
        }
    }

    /// `true` when the intent asks for the unfiltered collection.
    pub fn is_full_listing(&self) -> bool {
        self.term.is_empty() && self.type_filter == TypeFilter::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_entry(id: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "word",
            "title": "Bildungsroman",
            "content": "A literary genre focused on personal growth",
            "source": "",
            "whyItStuck": "The essay mirrored one",
            "extendedNote": "",
            "category": "Literary Terms",
            "tags": ["The Library Without a Roof"],
            "batch": "Batch #2 (Foundational)",
            "dateAdded": "2025-01-15"
        })
    }

    #[test]
    fn numeric_and_string_ids_decode_to_same_text() {
        let numeric: Entry = serde_json::from_value(wire_entry(serde_json::json!(7))).unwrap();
        let text: Entry = serde_json::from_value(wire_entry(serde_json::json!("7"))).unwrap();
        assert_eq!(numeric.id, EntryId::from("7"));
        assert_eq!(numeric, text);
    }

    #[test]
    fn empty_free_text_becomes_none() {
        let entry: Entry = serde_json::from_value(wire_entry(serde_json::json!(1))).unwrap();
        assert_eq!(entry.source, None);
        assert_eq!(entry.extended_note, None);
        assert_eq!(entry.why_it_stuck.as_deref(), Some("The essay mirrored one"));
        assert_eq!(entry.date_added, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn draft_serializes_camel_case_without_unset_fields() {
        let mut draft = EntryDraft::new(EntryType::Phrase, "Lacuna", "A gap");
        draft.why_it_stuck = Some("sounded like a lagoon".into());
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "phrase");
        assert_eq!(value["whyItStuck"], "sounded like a lagoon");
        assert!(value.get("source").is_none());
        assert!(value.get("dateAdded").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn validate_rejects_blank_title_or_content() {
        assert!(EntryDraft::new(EntryType::Word, "Apophenia", "Seeing patterns").validate().is_ok());

        let err = EntryDraft::new(EntryType::Word, "  ", "x").validate().unwrap_err();
        assert_eq!(err, BabelError::Validation("title must not be empty".into()));

        let err = EntryDraft::new(EntryType::Word, "", "").validate().unwrap_err();
        assert_eq!(
            err,
            BabelError::Validation("title and content must not be empty".into())
        );
    }

    #[test]
    fn to_draft_keeps_date_added() {
        let entry: Entry = serde_json::from_value(wire_entry(serde_json::json!(3))).unwrap();
        let draft = entry.to_draft();
        assert_eq!(draft.date_added, Some(entry.date_added));
        assert_eq!(draft.tags, entry.tags);
    }

    #[test]
    fn type_filter_parses_all_and_types() {
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            "author".parse::<TypeFilter>().unwrap(),
            TypeFilter::Only(EntryType::Author)
        );
        assert!("poem".parse::<TypeFilter>().is_err());
        assert!(TypeFilter::All.matches(EntryType::Excerpt));
        assert!(!TypeFilter::Only(EntryType::Word).matches(EntryType::Phrase));
    }

    #[test]
    fn full_listing_only_for_blank_term_and_all() {
        assert!(ViewIntent::default().is_full_listing());
        assert!(ViewIntent::new("   ", TypeFilter::All).is_full_listing());
        assert!(!ViewIntent::new("", TypeFilter::Only(EntryType::Word)).is_full_listing());
        assert!(!ViewIntent::new("metaphor", TypeFilter::All).is_full_listing());
    }
}
