use crate::Point;

pub type LabelId = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionResult {
    pub expression: String,
    pub answer: String,
}

/// A typeset result placed over the canvas. Each label owns its position.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayLabel {
    pub id: LabelId,
    pub latex: String,
    pub position: Point,
}

/// Wraps `expression = answer` in inline math delimiters the typesetter
/// recognizes.
pub fn format_label(expression: &str, answer: &str) -> String {
    format!("\\(\\LARGE{{{expression} = {answer}}}\\)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_inline_delimiters() {
        assert_eq!(format_label("x", "5"), "\\(\\LARGE{x = 5}\\)");
        assert_eq!(
            format_label("2 + 3", "5"),
            r"\(\LARGE{2 + 3 = 5}\)"
        );
    }
}
