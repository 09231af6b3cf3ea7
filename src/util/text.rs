// src/util/text.rs

/// Shorten free text to its first non-empty line, capped at `max_chars`.
///
/// Truncated output ends with an ellipsis; the cut never splits a character.
///
/// # Examples
///
/// ```
/// use noteboard::util::text::summarize;
///
/// assert_eq!(summarize("milk, eggs\nbread", 20), "milk, eggs");
/// assert_eq!(summarize("a rather long line", 8), "a rathe…");
/// ```
pub fn summarize(text: &str, max_chars: usize) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = line.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Replace tabs, line breaks and other control characters with single spaces.
pub fn single_line(text: &str) -> String {
    text.split(char::is_control)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Buy milk", 20, "Buy milk")]
    #[case("\n\n  Second try  \nthird", 20, "Second try")]
    #[case("", 20, "")]
    #[case("abcdef", 4, "abc…")]
    #[case("äöüß", 3, "äö…")]
    #[case("anything", 0, "")]
    fn given_text_when_summarizing_then_returns_first_line_within_width(
        #[case] input: &str,
        #[case] width: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(summarize(input, width), expected);
    }

    #[rstest]
    #[case("Groceries", "Groceries")]
    #[case("Buy\tmilk", "Buy milk")]
    #[case("two\r\nlines\n", "two lines")]
    #[case("", "")]
    fn given_text_with_control_chars_when_flattening_then_single_spaced_line(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(single_line(input), expected);
    }
}
