/// Greedy word wrap; words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cuts `s` to at most `max_len` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// `1 peak`, `3 peaks`.
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap("frame not found", 20), vec!["frame not found"]);
    }

    #[test]
    fn wrap_breaks_between_words() {
        assert_eq!(
            wrap("no frame of category nef_nmr_spectrum", 20),
            vec!["no frame of category", "nef_nmr_spectrum"]
        );
    }

    #[test]
    fn wrap_of_empty_text_is_one_empty_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_leaves_short_names() {
        assert_eq!(truncate("nef_nmr_meta_data", 30), "nef_nmr_meta_data");
        assert_eq!(truncate("hsqc", 4), "hsqc");
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("nef_nmr_spectrum_hsqc", 10), "nef_nmr_s…");
        assert_eq!(truncate("1H–15N HSQC", 4), "1H–…");
    }

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(1, "peak"), "1 peak");
        assert_eq!(count(0, "frame"), "0 frames");
        assert_eq!(count(12, "violation"), "12 violations");
    }
}
