use once_cell::sync::Lazy;
use regex::Regex;

// Matches both the opening fence (with its optional language tag) and the
// closing fence, so a split yields before / code / after.
static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```([A-Za-z0-9_+#.\-]*)[ \t]*\r?\n?").expect("fence pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FencedSections {
    pub before: String,
    pub code: String,
    pub after: String,
    pub language: Option<String>,
}

/// Textual split of a markdown document around its first fenced code block.
///
/// Only the first three segments are kept; anything past a second fence is
/// dropped. Missing segments come back empty.
pub fn split_fenced_block(raw: &str) -> FencedSections {
    let mut segments = FENCE.split(raw).map(str::trim);
    let before = segments.next().unwrap_or_default().to_string();
    let code = segments.next().unwrap_or_default().to_string();
    let after = segments.next().unwrap_or_default().to_string();

    let language = FENCE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|tag| tag.as_str().to_string())
        .filter(|tag| !tag.is_empty());

    FencedSections {
        before,
        code,
        after,
        language,
    }
}
