//! LaTeX delimiter normalization.
//!
//! Chat tools often emit `\[ … \]` and `\( … \)`; the converter only
//! understands dollar delimiters with `tex_math_dollars`.

use std::sync::OnceLock;

use regex::Regex;

fn display_math() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\\\[(.*?)\\\]").expect("static regex"))
}

fn inline_math() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\\\((.*?)\\\)").expect("static regex"))
}

/// Rewrite `\[x\]` to `$$\nx\n$$` and `\(x\)` to `$x$`.
pub fn normalize_math_delimiters(markdown: &str) -> String {
    let display = display_math().replace_all(markdown, |caps: &regex::Captures<'_>| {
        format!("$$\n{}\n$$", caps[1].trim())
    });
    inline_math()
        .replace_all(&display, |caps: &regex::Captures<'_>| {
            format!("${}$", caps[1].trim())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_math_becomes_double_dollar_block() {
        assert_eq!(
            normalize_math_delimiters(r"before \[ x^2 \] after"),
            "before $$\nx^2\n$$ after"
        );
    }

    #[test]
    fn inline_math_becomes_single_dollar() {
        assert_eq!(normalize_math_delimiters(r"let \( a+b \) be"), "let $a+b$ be");
    }

    #[test]
    fn multiline_display_math_is_matched() {
        let src = "\\[\n\\sum_i x_i\n\\]";
        assert_eq!(normalize_math_delimiters(src), "$$\n\\sum_i x_i\n$$");
    }

    #[test]
    fn text_without_math_is_untouched() {
        assert_eq!(normalize_math_delimiters("# Title"), "# Title");
    }
}
