use strsim::normalized_levenshtein;

/// Record of one applied substitution: the anchor that was found and the
/// text that replaced it. Produced transiently and consumed by the write it
/// authorizes; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    pub anchor: String,
    pub replacement: String,
}

/// Outcome of an anchor search over in-memory content.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a NoMatch outcome must not be written back to disk"]
pub enum PatchOutcome {
    /// The first occurrence of the anchor was replaced.
    Applied {
        patches: Vec<PatchRecord>,
        updated: String,
    },
    /// The anchor does not occur in the content. `closest` names the most
    /// similar content line, when one is similar enough to be worth
    /// reporting.
    NoMatch { closest: Option<String> },
}

/// Replace the first occurrence of `anchor` in `content` with `replacement`.
///
/// Single first-match replacement, not global: callers must supply an anchor
/// unique enough to pin down the intended edit site. Pure transform over
/// in-memory content; never touches disk.
pub fn apply_edit(content: &str, anchor: &str, replacement: &str) -> PatchOutcome {
    match content.find(anchor) {
        Some(start) => {
            let mut updated =
                String::with_capacity(content.len() - anchor.len() + replacement.len());
            updated.push_str(&content[..start]);
            updated.push_str(replacement);
            updated.push_str(&content[start + anchor.len()..]);
            PatchOutcome::Applied {
                patches: vec![PatchRecord {
                    anchor: anchor.to_string(),
                    replacement: replacement.to_string(),
                }],
                updated,
            }
        }
        None => PatchOutcome::NoMatch {
            closest: closest_line(content, anchor),
        },
    }
}

/// Lines less similar than this are not worth suggesting.
const SIMILARITY_FLOOR: f64 = 0.6;

/// Best-effort hint for a failed match: the content line most similar to the
/// anchor's first line.
fn closest_line(content: &str, anchor: &str) -> Option<String> {
    let needle = anchor.lines().next()?.trim();
    if needle.is_empty() {
        return None;
    }
    content
        .lines()
        .map(|line| (normalized_levenshtein(line.trim(), needle), line))
        .filter(|(score, _)| *score >= SIMILARITY_FLOOR)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, line)| line.trim().to_string())
}
