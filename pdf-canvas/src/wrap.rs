/// Word-wrap `text` into lines no wider than `max_width`, as measured by
/// `measure`. Explicit `\n` always starts a new line; a word wider than the
/// line is broken between characters.
pub(crate) fn wrap_lines<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    for para in text.split('\n') {
        wrap_paragraph(para.trim_end_matches('\r'), max_width, &measure, &mut lines);
    }
    lines
}

fn wrap_paragraph<F>(text: &str, max_width: f64, measure: &F, out: &mut Vec<String>)
where
    F: Fn(&str) -> f64,
{
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if measure(&candidate) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            out.push(std::mem::take(&mut line));
        }
        if measure(word) <= max_width {
            line = word.to_string();
        } else {
            let mut pieces = break_word(word, max_width, measure);
            // The tail stays open so following words can share its line.
            line = pieces.pop().unwrap_or_default();
            out.extend(pieces);
        }
    }
    out.push(line);
}

/// Split a single word into pieces that each fit `max_width`. A piece
/// always holds at least one character.
fn break_word<F>(word: &str, max_width: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && measure(&current) > max_width {
            current.pop();
            pieces.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every char is one unit wide.
    fn chars(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_lines("John Doe", 20.0, chars), vec!["John Doe"]);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_lines("123 Main St Anytown", 11.0, chars),
            vec!["123 Main St", "Anytown"]
        );
    }

    #[test]
    fn newlines_force_breaks_and_keep_blank_lines() {
        assert_eq!(
            wrap_lines("John Doe\n\nUSA", 20.0, chars),
            vec!["John Doe", "", "USA"]
        );
    }

    #[test]
    fn long_word_is_broken() {
        assert_eq!(
            wrap_lines("x abcdefghij y", 4.0, chars),
            vec!["x", "abcd", "efgh", "ij y"]
        );
    }

    #[test]
    fn empty_text_yields_one_blank_line() {
        assert_eq!(wrap_lines("", 10.0, chars), vec![""]);
    }
}
