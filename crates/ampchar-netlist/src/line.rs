//! Tolerant line classifier for SPICE-style circuit descriptions.
//!
//! The transformer never needs a full SPICE grammar. It only needs to tell
//! component instance lines, directive-block markers, and the terminator
//! apart, so classification is line-oriented and never fails: anything
//! unrecognized is kept verbatim as [`LineKind::Other`].

/// Classification of a single netlist line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A component instance line (resistor, source, transistor, ...).
    Component,
    /// Start of an embedded directive block (`.control`).
    ControlStart,
    /// End of an embedded directive block (`.endc`).
    ControlEnd,
    /// The terminator line (`.end`).
    Terminator,
    /// Any other dot directive (`.param`, `.include`, ...).
    Directive,
    /// A comment line (`*`).
    Comment,
    /// A blank line.
    Blank,
    /// Anything else (title line, continuation, ...).
    Other,
}

/// A single line of a circuit description, with its classification.
#[derive(Debug, Clone)]
pub struct Line {
    raw: String,
    kind: LineKind,
}

impl Line {
    /// Classify a raw line of text.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = classify_str(&raw);
        Line { raw, kind }
    }

    /// The raw text of this line.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The classification of this line.
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// The component designator (first token) for component lines.
    pub fn designator(&self) -> Option<&str> {
        match self.kind {
            LineKind::Component => self.raw.split_whitespace().next(),
            _ => None,
        }
    }

    /// Whether this component's designator equals `name`, ignoring ASCII case.
    pub fn is_component(&self, name: &str) -> bool {
        self.designator()
            .is_some_and(|d| d.eq_ignore_ascii_case(name))
    }

    /// Whether this component's designator starts with `prefix`
    /// (case-sensitive, matching the load naming convention).
    pub fn has_designator_prefix(&self, prefix: &str) -> bool {
        self.designator().is_some_and(|d| d.starts_with(prefix))
    }

    /// Replace every whitespace-separated token equal to `from` with `to`,
    /// leaving all other tokens untouched.
    ///
    /// Token-exact replacement avoids rewriting node names that merely
    /// contain `from` as a substring.
    pub fn replace_node(&self, from: &str, to: &str) -> Line {
        let rewritten = self
            .raw
            .split_whitespace()
            .map(|tok| if tok == from { to } else { tok })
            .collect::<Vec<_>>()
            .join(" ");
        Line::classify(rewritten)
    }
}

fn classify_str(raw: &str) -> LineKind {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('*') {
        return LineKind::Comment;
    }
    if let Some(first) = trimmed.split_whitespace().next() {
        if first.starts_with('.') {
            // `.endc` must be checked before `.end`.
            return match first.to_ascii_lowercase().as_str() {
                ".control" => LineKind::ControlStart,
                ".endc" => LineKind::ControlEnd,
                ".end" => LineKind::Terminator,
                _ => LineKind::Directive,
            };
        }
        if first.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return LineKind::Component;
        }
    }
    LineKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markers() {
        assert_eq!(Line::classify(".control").kind(), LineKind::ControlStart);
        assert_eq!(Line::classify("  .endc").kind(), LineKind::ControlEnd);
        assert_eq!(Line::classify(".end").kind(), LineKind::Terminator);
        assert_eq!(Line::classify(".END").kind(), LineKind::Terminator);
        assert_eq!(Line::classify(".param vdd=1.8").kind(), LineKind::Directive);
    }

    #[test]
    fn test_classify_components_and_misc() {
        assert_eq!(
            Line::classify("M1 out in1 tail 0 nmos").kind(),
            LineKind::Component
        );
        assert_eq!(Line::classify("* a comment").kind(), LineKind::Comment);
        assert_eq!(Line::classify("").kind(), LineKind::Blank);
        assert_eq!(Line::classify("   ").kind(), LineKind::Blank);
        assert_eq!(Line::classify("+ 1k").kind(), LineKind::Other);
    }

    #[test]
    fn test_designator() {
        let line = Line::classify("Vcm cm 0 DC 0.9");
        assert_eq!(line.designator(), Some("Vcm"));
        assert!(line.is_component("vcm"));
        assert!(!line.is_component("Vcm2"));
        assert!(Line::classify("Rload out 0 10k").has_designator_prefix("Rl"));
    }

    #[test]
    fn test_replace_node_is_token_exact() {
        let line = Line::classify("M1 out in1 in1x 0 nmos");
        let rewritten = line.replace_node("in1", "out");
        assert_eq!(rewritten.raw(), "M1 out out in1x 0 nmos");
    }
}
