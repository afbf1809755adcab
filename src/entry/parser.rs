//! Turns unstructured notes into entry drafts.
//!
//! Text is cut into segments at blank lines, numbered items, and bullets. Each segment
//! long enough to be meaningful becomes one [`EntryDraft`] whose title, content, type,
//! category, and source are guessed with keyword heuristics. The drafts are meant to be
//! reviewed (or bulk-imported) by the user, not trusted blindly.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::types::{EntryDraft, EntryType};

/// Segments shorter than this (in characters) are skipped.
const MIN_SEGMENT_CHARS: usize = 20;

/// Fallback source when no provenance marker is found.
pub const DEFAULT_SOURCE: &str = "Smart Import";

/// Fallback category when no category keyword matches.
pub const DEFAULT_CATEGORY: &str = "General";

static SEGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\n\s*\n|^\d+\.|^[-•*]\s+").expect("valid regex"));

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]").expect("valid regex"));

static SOURCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?im)source[:\s]+([^\n]+)",
        r"(?im)from[:\s]+([^\n]+)",
        r"(?im)via[:\s]+([^\n]+)",
        r"(?im)—([^—\n]+)$",
        r"(?im)\(([^)]+)\)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

const TYPE_KEYWORDS: [(EntryType, &[&str]); 5] = [
    (EntryType::Word, &["word", "term", "vocabulary", "definition"]),
    (EntryType::Phrase, &["phrase", "saying", "expression", "quote"]),
    (EntryType::Author, &["author", "writer", "said", "argues", "writes"]),
    (EntryType::Concept, &["concept", "idea", "theory", "framework", "approach"]),
    (EntryType::Excerpt, &["excerpt", "passage", "text", "reading"]),
];

const CATEGORY_KEYWORDS: [(&str, &[&str]); 8] = [
    ("Literary Terms", &["literary", "genre", "narrative", "writing", "essay"]),
    ("Philosophical Thinkers", &["philosophy", "philosophical", "thinker", "argues"]),
    ("Cultural Critique", &["culture", "society", "critique", "analysis"]),
    ("Writing Process", &["writing", "process", "editing", "draft"]),
    ("Political Rhetoric", &["political", "politics", "rhetoric", "speech"]),
    ("Legal Language", &["legal", "law", "court", "doctrine"]),
    ("Translation Philosophy", &["translation", "translate", "language"]),
    ("Material Metaphor", &["metaphor", "symbolism", "represents"]),
];

/// Parse free-form notes into drafts stamped with `today`.
pub fn parse_unstructured(text: &str, today: NaiveDate) -> Vec<EntryDraft> {
    let drafts: Vec<EntryDraft> = SEGMENT_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|segment| segment.chars().count() >= MIN_SEGMENT_CHARS)
        .filter_map(|segment| draft_from_segment(segment, today))
        .collect();

    tracing::debug!(drafts = drafts.len(), "parsed unstructured text");
    drafts
}

fn draft_from_segment(segment: &str, today: NaiveDate) -> Option<EntryDraft> {
    let lines: Vec<&str> = segment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let first_line = lines.first()?;

    let title = extract_title(first_line);
    let content = extract_content(&lines, &title);

    let mut draft = EntryDraft::new(determine_type(segment), title, content);
    draft.source = Some(extract_source(segment));
    draft.category = Some(determine_category(segment).to_string());
    draft.batch = Some(format!("{DEFAULT_SOURCE} {}", today.format("%Y-%m-%d")));
    draft.date_added = Some(today);
    Some(draft)
}

fn extract_title(first_line: &str) -> String {
    if let Some(quoted) = QUOTED.captures(first_line) {
        return quoted[1].to_string();
    }

    let char_len = first_line.chars().count();
    if is_upper(first_line) && char_len < 100 {
        return first_line.to_string();
    }

    if first_line.split_whitespace().count() <= 5 && char_len < 50 {
        return first_line.to_string();
    }

    let first_sentence = SENTENCE_END.split(first_line).next().unwrap_or(first_line);
    if first_sentence.chars().count() < 100 {
        return first_sentence.trim().to_string();
    }

    first_line.chars().take(50).collect::<String>().trim().to_string()
}

/// Upper-case in the loose sense: has cased letters and none of them are lower-case.
fn is_upper(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

fn extract_content(lines: &[&str], title: &str) -> String {
    let mut content_lines: Vec<String> = Vec::with_capacity(lines.len());
    let mut title_found = false;

    for line in lines {
        if !title_found && line.contains(title) {
            let remaining = line
                .replace(title, "")
                .trim_matches(|c| c == ' ' || c == '-' || c == ':')
                .to_string();
            if !remaining.is_empty() {
                content_lines.push(remaining);
            }
            title_found = true;
        } else {
            content_lines.push(line.to_string());
        }
    }

    if content_lines.is_empty() {
        content_lines = lines.iter().skip(1).map(|l| l.to_string()).collect();
    }

    content_lines.join(" ").trim().to_string()
}

fn determine_type(text: &str) -> EntryType {
    let lower = text.to_lowercase();
    let mut scores: Vec<(EntryType, usize)> = TYPE_KEYWORDS
        .iter()
        .map(|(entry_type, keywords)| {
            (*entry_type, keywords.iter().filter(|k| lower.contains(*k)).count())
        })
        .collect();

    let mut bump = |target: EntryType, by: usize| {
        if let Some((_, score)) = scores.iter_mut().find(|(t, _)| *t == target) {
            *score += by;
        }
    };

    if text.matches('"').count() >= 2 {
        bump(EntryType::Excerpt, 2);
    }
    if ["definition", "means", "refers to"].iter().any(|w| lower.contains(w)) {
        bump(EntryType::Word, 2);
    }
    if text.split_whitespace().count() > 50 {
        bump(EntryType::Excerpt, 1);
    }

    first_max(&scores)
        .filter(|(_, score)| *score > 0)
        .map(|(entry_type, _)| entry_type)
        .unwrap_or(EntryType::Concept)
}

fn determine_category(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    let scores: Vec<(&'static str, usize)> = CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            (*category, keywords.iter().filter(|k| lower.contains(*k)).count())
        })
        .collect();

    first_max(&scores)
        .filter(|(_, score)| *score > 0)
        .map(|(category, _)| category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Highest score, earliest candidate on ties.
fn first_max<T: Copy>(scores: &[(T, usize)]) -> Option<(T, usize)> {
    scores.iter().copied().fold(None, |best, candidate| match best {
        Some((_, best_score)) if best_score >= candidate.1 => best,
        _ => Some(candidate),
    })
}

fn extract_source(text: &str) -> String {
    SOURCE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}
