//! Name-collision detection over a set of path templates.
//!
//! Two paths collide when their leaf segments (braces stripped) are equal,
//! since the default name scheme would give both the same suffix.

use std::collections::{BTreeSet, HashMap};

use crate::naming::{deparameterize, segments};

fn leaf(path: &str) -> Option<String> {
    segments(path).last().map(|s| deparameterize(s))
}

/// Indices of every path whose leaf segment is shared with another path.
///
/// All members of each group are reported, not only the first pair.
/// Paths with no segments have no leaf and never collide.
pub fn find_colliding_indices<S: AsRef<str>>(paths: &[S]) -> BTreeSet<usize> {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, path) in paths.iter().enumerate() {
        if let Some(leaf) = leaf(path.as_ref()) {
            groups.entry(leaf).or_default().push(index);
        }
    }

    groups
        .into_values()
        .filter(|members| members.len() > 1)
        .flatten()
        .collect()
}

/// Indices of the paths sharing `path`'s leaf segment.
pub(crate) fn leaf_group<S: AsRef<str>>(paths: &[S], path: &str) -> Vec<usize> {
    let Some(target) = leaf(path) else {
        return Vec::new();
    };
    paths
        .iter()
        .enumerate()
        .filter(|(_, p)| leaf(p.as_ref()).as_deref() == Some(target.as_str()))
        .map(|(i, _)| i)
        .collect()
}

/// Last segment index (of the longest path) at which the colliding set
/// still needs distinguishing.
///
/// Trailing segments are peeled off every path until the truncated set no
/// longer collides. A name must fold in every segment after the returned
/// index to be unique within the set.
pub fn escalation_depth<S: AsRef<str>>(colliding: &[S]) -> usize {
    let mut sorted: Vec<Vec<&str>> = colliding.iter().map(|p| segments(p.as_ref())).collect();
    // stable sort keeps original order for equal lengths
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));

    let Some(longest) = sorted.first() else {
        return 0;
    };
    let mut depth = longest.len().saturating_sub(1);

    let mut current: Vec<String> = sorted.iter().map(|parts| parts.join("/")).collect();
    while !find_colliding_indices(&current).is_empty() {
        current = current
            .iter()
            .map(|p| {
                let mut parts = segments(p);
                parts.pop();
                parts.join("/")
            })
            .collect();
        depth = depth.saturating_sub(1);
    }

    depth
}

/// Extra trailing segments `path` needs beyond the default name, given the
/// depth computed for its colliding group.
pub fn required_escalation(path: &str, depth: usize) -> u32 {
    let total = segments(path).len();
    total.saturating_sub(1).saturating_sub(depth) as u32
}
