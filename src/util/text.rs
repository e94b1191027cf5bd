use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to a display width, appending an ellipsis when cut. Width is
/// measured in terminal cells, so wide glyphs count double.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// mm:ss, hours folded into minutes.
pub fn format_time(duration: std::time::Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcde", 5), "abcde");
    }

    #[test]
    fn long_strings_get_an_ellipsis() {
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(truncate_to_width("ありがとう", 5), "あり…");
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(Duration::from_secs(0)), "0:00");
        assert_eq!(format_time(Duration::from_secs(65)), "1:05");
        assert_eq!(format_time(Duration::from_secs(3700)), "61:40");
    }
}
