use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_display_width).sum()
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = grapheme_display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// The longest suffix of `s` that fits in `max_cells`, prefixed with `…`
/// when something was cut. Used for text inputs, where the end being typed
/// must stay visible.
pub fn tail_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut kept: Vec<&str> = Vec::new();
    for grapheme in s.graphemes(true).rev() {
        let gw = grapheme_display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        kept.push(grapheme);
    }
    kept.reverse();
    format!("\u{2026}{}", kept.concat())
}

/// Remove the last grapheme cluster, so backspace deletes what the
/// operator sees as one character.
pub fn pop_grapheme(s: &mut String) -> Option<String> {
    let (start, g) = s.grapheme_indices(true).next_back()?;
    let removed = g.to_string();
    s.truncate(start);
    Some(removed)
}

/// Display width of a grapheme cluster.
fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── display_width ──────────────────────────────────────────────

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width("frame 120"), 9);
    }

    #[test]
    fn display_width_cjk() {
        assert_eq!(display_width("手指"), 4);
    }

    #[test]
    fn display_width_tab() {
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn display_width_combining() {
        assert_eq!(display_width("e\u{0301}"), 1);
    }

    // ── truncate_to_width ──────────────────────────────────────────

    #[test]
    fn truncate_no_truncation_needed() {
        assert_eq!(truncate_to_width("drop", 10), "drop");
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("Needs manual review", 8), "Needs m\u{2026}");
    }

    #[test]
    fn truncate_cjk_boundary() {
        // 3 cells of budget cannot hold two 2-cell glyphs
        assert_eq!(truncate_to_width("手指交叉", 4), "手\u{2026}");
    }

    #[test]
    fn truncate_zero_and_one() {
        assert_eq!(truncate_to_width("abc", 0), "");
        assert_eq!(truncate_to_width("abc", 1), "\u{2026}");
    }

    // ── tail_to_width ──────────────────────────────────────────────

    #[test]
    fn tail_keeps_the_end() {
        assert_eq!(tail_to_width("glove slipped", 6), "\u{2026}ipped");
        assert_eq!(tail_to_width("short", 6), "short");
    }

    // ── pop_grapheme ───────────────────────────────────────────────

    #[test]
    fn pop_grapheme_ascii() {
        let mut s = String::from("abc");
        assert_eq!(pop_grapheme(&mut s), Some("c".to_string()));
        assert_eq!(s, "ab");
    }

    #[test]
    fn pop_grapheme_combining() {
        let mut s = String::from("cafe\u{0301}");
        pop_grapheme(&mut s);
        assert_eq!(s, "caf");
    }

    #[test]
    fn pop_grapheme_empty() {
        let mut s = String::new();
        assert_eq!(pop_grapheme(&mut s), None);
    }
}
