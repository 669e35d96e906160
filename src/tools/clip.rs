//! Head/tail clipping of long tool output

/// Longest text passed through untouched, in characters
pub const CLIP_LIMIT: usize = 2000;

/// Characters kept from each end of clipped text
pub const CLIP_WINDOW: usize = 1000;

pub const CLIP_MARKER: &str = "\n\n[...content clipped...]\n\n";

/// Keep text up to `CLIP_LIMIT` characters; longer text becomes its first and
/// last `CLIP_WINDOW` characters joined by `CLIP_MARKER`.
pub fn clip(text: String) -> String {
    let count = text.chars().count();
    if count <= CLIP_LIMIT {
        return text;
    }

    let head: String = text.chars().take(CLIP_WINDOW).collect();
    let tail: String = text.chars().skip(count - CLIP_WINDOW).collect();
    format!("{}{}{}", head, CLIP_MARKER, tail)
}
