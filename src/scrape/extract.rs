//! HTML extraction helpers for the landing page's inline `ajax_token`.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::ScrapeError;

/// Literal that identifies the script block carrying the token.
pub const TOKEN_MARKER: &str = "ajax_token";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ajax_token\s*=\s*'([a-z0-9]{64})'").expect("token pattern compiles")
});

/// Inner text of every `<script>` element, in document order. Tag names
/// match regardless of ASCII case.
pub(crate) fn iter_scripts(html: &str) -> Vec<&str> {
    // ASCII lowercasing keeps byte offsets, so indices found in `lower` slice `html`.
    let lower = html.to_ascii_lowercase();
    let mut res = Vec::new();
    let mut pos = 0usize;

    while let Some(si) = lower[pos..].find("<script") {
        let si = pos + si;

        let open_end = match lower[si..].find('>') {
            Some(x) => si + x,
            None => break,
        };
        let close = match lower[open_end + 1..].find("</script>") {
            Some(x) => open_end + 1 + x,
            None => break,
        };

        res.push(&html[open_end + 1..close]);
        pos = close + "</script>".len();
    }

    res
}

/// First script body containing `marker`, or `None` if there is none or it is blank.
pub fn find_script_with_marker<'a>(html: &'a str, marker: &str) -> Option<&'a str> {
    iter_scripts(html)
        .into_iter()
        .find(|body| body.contains(marker))
        .filter(|body| !body.trim().is_empty())
}

/// The 64-character token assigned in `script`, if the assignment is well formed.
pub fn extract_token(script: &str) -> Option<&str> {
    TOKEN_RE
        .captures(script)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub(crate) fn token_from_html(html: &str) -> Result<String, ScrapeError> {
    let script = find_script_with_marker(html, TOKEN_MARKER).ok_or(ScrapeError::TokenNotFound(
        "no script tag contains 'ajax_token'",
    ))?;
    let token = extract_token(script).ok_or(ScrapeError::TokenNotFound(
        "script tag has no well-formed 'ajax_token' assignment",
    ))?;
    Ok(token.to_string())
}
