//! Text normalization applied before any comparison.
//!
//! Titles and tags arrive with HTML entities, emoji and irregular
//! whitespace. [`normalize`] decodes entities, replaces emoji and
//! pictographs with spaces, collapses whitespace runs to a single space
//! and trims. It is total: every input yields a (possibly empty) string.

/// Normalize raw text for similarity comparison.
///
/// ```
/// use simrank_core::normalize;
///
/// assert_eq!(normalize("제주도&nbsp;&amp;\n\t맛집 😀 "), "제주도 & 맛집");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let decoded = html_escape::decode_html_entities(raw);

    let mut out = String::with_capacity(decoded.len());
    let mut pending_space = false;
    for ch in decoded.chars() {
        if ch.is_whitespace() || is_pictograph(ch) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}

/// Emoji and pictograph code points treated as noise.
fn is_pictograph(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1F600..=0x1F64F   // emoticons
            | 0x1F300..=0x1F5FF // symbols & pictographs
            | 0x1F680..=0x1F6FF // transport & map
            | 0x1F1E0..=0x1F1FF // regional indicators (flags)
            | 0x1F900..=0x1F9FF // supplemental symbols & pictographs
            | 0x1FA70..=0x1FAFF // symbols & pictographs extended-A
            | 0x2600..=0x26FF   // miscellaneous symbols
            | 0x2700..=0x27BF   // dingbats
            | 0xFE0F            // emoji presentation selector
            | 0x200D            // zero-width joiner
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(normalize("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(normalize("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
        assert_eq!(normalize("it&#39;s"), "it's");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  제주도 \n\n 맛집\t추천  "), "제주도 맛집 추천");
    }

    #[test]
    fn test_strips_emoji() {
        assert_eq!(normalize("맛집😀투어"), "맛집 투어");
        assert_eq!(normalize("🚀🔥 launch ☀️"), "launch");
        assert_eq!(normalize("🇰🇷"), "");
        assert_eq!(normalize("👨‍👩‍👧 family"), "family");
    }

    #[test]
    fn test_only_noise_becomes_empty() {
        assert_eq!(normalize(" \n\t 😀 "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(" a&amp;b 😀  c ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize("경복궁 근정전"), "경복궁 근정전");
    }
}
