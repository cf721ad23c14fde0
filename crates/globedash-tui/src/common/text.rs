//! Width-aware text helpers for table cells and form fields.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fits `text` into `max_width` terminal columns, ending with `…` when cut.
///
/// Wide characters (CJK, flag emoji) count as two columns.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".repeat(max_width);
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// One bullet per character of a secret.
pub fn mask(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_unchanged() {
        assert_eq!(truncate_with_ellipsis("Chile", 10), "Chile");
        assert_eq!(truncate_with_ellipsis("Chile", 5), "Chile");
    }

    #[test]
    fn test_cut_with_ellipsis() {
        assert_eq!(
            truncate_with_ellipsis("South Georgia", 8),
            "South G…"
        );
    }

    #[test]
    fn test_degenerate_widths() {
        assert_eq!(truncate_with_ellipsis("Chile", 1), "…");
        assert_eq!(truncate_with_ellipsis("Chile", 0), "");
    }

    #[test]
    fn test_wide_characters() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_with_ellipsis("中华人民共和国", 6), "中华…");
        assert_eq!(truncate_with_ellipsis("a中b", 4), "a中b");
        assert_eq!(truncate_with_ellipsis("a中bc", 4), "a中…");
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("pässword"), "••••••••");
    }
}
