use std::cmp::Reverse;

use super::Mapping;

/// A token occurrence in a view, as a half-open byte range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match<'m> {
    pub start: usize,
    pub end: usize,
    pub replacement: &'m str,
}

/// Find non-overlapping token occurrences, longest token first.
///
/// An occurrence that touches an already claimed character is skipped by one
/// character only, so a later occurrence of the same token that starts inside
/// the rejected span can still be claimed.
pub fn find_matches<'m>(view: &str, mapping: &'m Mapping) -> Vec<Match<'m>> {
    let mut keys: Vec<(&str, &str)> = mapping.iter().filter(|(k, _)| !k.is_empty()).collect();
    keys.sort_by_key(|(k, _)| Reverse(k.chars().count()));

    let mut occupied = vec![false; view.len()];
    let mut matches = Vec::new();

    for (key, replacement) in keys {
        let mut cursor = 0;
        while let Some(found) = view[cursor..].find(key) {
            let start = cursor + found;
            let end = start + key.len();
            if occupied[start..end].iter().any(|&taken| taken) {
                cursor = start + view[start..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            occupied[start..end].fill(true);
            matches.push(Match {
                start,
                end,
                replacement,
            });
            cursor = end;
        }
    }
    matches
}
