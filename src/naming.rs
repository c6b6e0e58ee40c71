//! Path template → action name synthesis
//!
//! Names are `<verb><Middle><Leaf>`, where `Middle` is the segment that
//! follows the namespace and `Leaf` is the last segment of the path.
//! Colliding paths fold extra trailing segments in between the two.

use crate::spec::Verb;

/// How many extra trailing segments a synthesized name includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum Disambiguation {
    /// `<verb><Middle><Leaf>`.
    #[default]
    None,
    /// Fold this many segments preceding the leaf into the name.
    Escalate(u32),
}

impl Disambiguation {
    /// Number of extra segments folded into the name.
    pub fn count(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Escalate(count) => count,
        }
    }

    /// Hint for a computed requirement; zero means no escalation.
    pub fn from_count(count: u32) -> Self {
        if count == 0 {
            Self::None
        } else {
            Self::Escalate(count)
        }
    }
}

/// Split a path template into segments, dropping empty ones.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Strip `{` and `}` from a segment.
pub fn deparameterize(segment: &str) -> String {
    segment.replace(['{', '}'], "")
}

/// Uppercase the first character, leaving the rest untouched.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Synthesize the action name for `verb` on `path`.
///
/// `namespace` is the segment excluded from names (usually `"rest"`).
/// When it does not appear in the path the first segment is used as the
/// middle part.
pub fn synthesize_name(verb: Verb, path: &str, namespace: &str, hint: Disambiguation) -> String {
    let parts: Vec<String> = segments(path).into_iter().map(deparameterize).collect();
    let verb = verb.as_str();

    let Some(leaf) = parts.last() else {
        return verb.to_string();
    };
    let middle_index = parts
        .iter()
        .position(|p| p == namespace)
        .map_or(0, |i| i + 1);
    let middle = parts.get(middle_index).map_or("", String::as_str);
    let method_middle = capitalize(middle);

    // "getDisplayData" under verb "get" must not become "getGetDisplayData"
    let non_redundant_leaf = if leaf.to_lowercase().starts_with(verb) {
        leaf.get(verb.len()..).unwrap_or(leaf)
    } else {
        leaf.as_str()
    };
    let mut method_end = if leaf != middle {
        capitalize(non_redundant_leaf)
    } else {
        String::new()
    };

    let count = hint.count() as usize;
    if count > 0 {
        let last = parts.len() - 1;
        let start = last.saturating_sub(count);
        let elongated: String = parts[start..last].iter().map(|p| capitalize(p)).collect();
        if elongated != method_middle {
            method_end = format!("{elongated}{method_end}");
        }
    }

    format!("{verb}{method_middle}{method_end}")
}
