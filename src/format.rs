//! Bounded-length message rendering.
//!
//! Turns a commit record plus an optional resolved handle into the text to
//! broadcast. The output never exceeds [`MAX_LEN`] characters. The numeric
//! margins below come from the deployed announcement format and must stay
//! exactly as they are for output compatibility: they account for the "\n\n"
//! separators and the "..." truncation marker.

use crate::model::CommitRecord;

/// Maximum character budget for a rendered message.
pub const MAX_LEN: usize = 280;

/// Truncation marker appended to a cut body.
const ELLIPSIS: &str = "...";

/// Reserve beyond body+url when there is no attribution line.
const BARE_RESERVE: usize = 25;

/// Reserve beyond body+attribution+url when there is an attribution line.
const ATTRIBUTED_RESERVE: usize = 27;

/// Body cut point without attribution.
const BARE_CUT: usize = 252;

/// Body cut point with attribution, before subtracting the attribution length.
const ATTRIBUTED_CUT: usize = 250;

/// Render a commit announcement, truncating the body if the whole message
/// would exceed [`MAX_LEN`].
///
/// The attribution line is `by {author}`, extended to
/// `by {author} (@{handle})` when a handle was resolved, and absent entirely
/// for authorless commits. Truncation is a raw character-count cut with no
/// word-boundary awareness.
pub fn render(commit: &CommitRecord, handle: Option<&str>) -> String {
    let attribution = match commit.author.as_deref() {
        None => String::new(),
        Some(author) => match handle {
            Some(h) => format!("by {author} (@{h})"),
            None => format!("by {author}"),
        },
    };

    let body_len = commit.message.chars().count();

    if attribution.is_empty() {
        let body = if body_len + BARE_RESERVE > MAX_LEN {
            format!("{}{ELLIPSIS}", take_chars(&commit.message, BARE_CUT))
        } else {
            commit.message.clone()
        };
        return format!("{body}\n\n{}", commit.url);
    }

    let attribution_len = attribution.chars().count();
    let body = if body_len + attribution_len + ATTRIBUTED_RESERVE > MAX_LEN {
        let cut = ATTRIBUTED_CUT.saturating_sub(attribution_len);
        format!("{}{ELLIPSIS}", take_chars(&commit.message, cut))
    } else {
        commit.message.clone()
    };
    format!("{body}\n\n{attribution}\n\n{}", commit.url)
}

/// First `n` characters of `s` (whole string if shorter).
fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
