use crate::model::Run;

use super::coords::CoordinateMap;
use super::matcher::Match;

/// Rewrite run texts for every match, right to left.
///
/// Editing a run only shifts offsets to the right of the edit, so applying
/// matches in descending start order keeps every pending position valid.
pub fn apply(runs: &mut [&mut Run], map: &CoordinateMap, mut matches: Vec<Match<'_>>) {
    assert_eq!(
        runs.iter().map(|r| r.text()).collect::<String>(),
        map.view(),
        "coordinate map diverged from run texts"
    );
    matches.sort_by_key(|m| std::cmp::Reverse(m.start));

    for m in &matches {
        let first = map.locate(m.start);
        let last = map.locate(m.end - 1);

        if first.run == last.run {
            let text = runs[first.run].text();
            let mut updated = String::with_capacity(text.len() + m.replacement.len());
            updated.push_str(&text[..first.offset]);
            updated.push_str(m.replacement);
            updated.push_str(&text[last.offset + last.len..]);
            runs[first.run].set_text(updated);
        } else {
            let head = format!("{}{}", &runs[first.run].text()[..first.offset], m.replacement);
            runs[first.run].set_text(head);
            for run in runs[first.run + 1..last.run].iter_mut() {
                run.set_text(String::new());
            }
            let tail = runs[last.run].text()[last.offset + last.len..].to_string();
            runs[last.run].set_text(tail);
        }
    }
}
