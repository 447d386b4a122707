//! Circuit description model.
//!
//! A [`Netlist`] is an ordered sequence of classified lines. It is immutable;
//! every transformation returns a new instance. This keeps the testbench
//! builders purely textual: no I/O, no hidden state.

use crate::error::{Error, Result};
use crate::line::{Line, LineKind};

/// An immutable, line-oriented circuit description.
#[derive(Debug, Clone)]
pub struct Netlist {
    lines: Vec<Line>,
}

impl Netlist {
    /// Parse a circuit description from text.
    ///
    /// Parsing is tolerant and never fails; structural requirements (such as
    /// the `.end` terminator) are checked by the transformations that need
    /// them.
    pub fn parse(text: &str) -> Self {
        Netlist {
            lines: text.lines().map(Line::classify).collect(),
        }
    }

    /// The classified lines of this description.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whether a `.end` terminator line is present.
    pub fn has_terminator(&self) -> bool {
        self.lines
            .iter()
            .any(|l| l.kind() == LineKind::Terminator)
    }

    /// Render back to simulator-ready text, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.raw());
            out.push('\n');
        }
        out
    }

    /// Return a copy with any embedded `.control` ... `.endc` block removed.
    ///
    /// The block markers themselves are removed too. A description without a
    /// directive block is returned unchanged.
    pub fn strip_control_block(&self) -> Netlist {
        let mut lines = Vec::with_capacity(self.lines.len());
        let mut in_block = false;
        for line in &self.lines {
            match line.kind() {
                LineKind::ControlStart => in_block = true,
                LineKind::ControlEnd => in_block = false,
                _ if !in_block => lines.push(line.clone()),
                _ => {}
            }
        }
        Netlist { lines }
    }

    /// Return a copy with a new `.control` block holding `directives`
    /// inserted immediately before the `.end` terminator.
    ///
    /// Fails with [`Error::NotFound`] if the terminator is absent.
    pub fn insert_control_block(&self, directives: &[String]) -> Result<Netlist> {
        let end = self
            .lines
            .iter()
            .position(|l| l.kind() == LineKind::Terminator)
            .ok_or_else(Error::terminator_missing)?;

        let mut lines = self.lines[..end].to_vec();
        lines.push(Line::classify(".control"));
        for directive in directives {
            lines.push(Line::classify(format!("  {directive}")));
        }
        lines.push(Line::classify(".endc"));
        lines.extend_from_slice(&self.lines[end..]);
        Ok(Netlist { lines })
    }

    /// Return a copy with each line mapped through `f`.
    ///
    /// `f` returns `None` to drop the line, or a replacement line. Directive
    /// blocks and markers are passed through untouched.
    pub fn map_lines<F>(&self, mut f: F) -> Netlist
    where
        F: FnMut(&Line) -> Option<Line>,
    {
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            match line.kind() {
                LineKind::Component => {
                    if let Some(mapped) = f(line) {
                        lines.push(mapped);
                    }
                }
                _ => lines.push(line.clone()),
            }
        }
        Netlist { lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "* test amp\n\
                        Vcm cm 0 DC 0.9\n\
                        M1 out in1 tail 0 nmos\n\
                        Rl out 0 10k\n\
                        .control\n\
                        ac dec 10 1 10G\n\
                        .endc\n\
                        .end\n";

    #[test]
    fn test_roundtrip() {
        let netlist = Netlist::parse(BASE);
        assert_eq!(netlist.to_text(), BASE);
        assert!(netlist.has_terminator());
    }

    #[test]
    fn test_strip_control_block() {
        let stripped = Netlist::parse(BASE).strip_control_block();
        let text = stripped.to_text();
        assert!(!text.contains(".control"));
        assert!(!text.contains("ac dec"));
        assert!(!text.contains(".endc"));
        assert!(text.contains(".end"));
    }

    #[test]
    fn test_insert_control_block_before_terminator() {
        let netlist = Netlist::parse(BASE).strip_control_block();
        let with_block = netlist
            .insert_control_block(&["dc Vcm 0 1.8 0.001".to_string()])
            .unwrap();
        let text = with_block.to_text();
        let control = text.find(".control").unwrap();
        let end = text.find(".end").unwrap();
        assert!(control < end);
        assert!(text.contains("dc Vcm 0 1.8 0.001"));
    }

    #[test]
    fn test_insert_without_terminator_fails() {
        let netlist = Netlist::parse("Vcm cm 0 DC 0.9\n");
        let err = netlist.insert_control_block(&[]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_map_lines_drops_and_rewrites() {
        let netlist = Netlist::parse(BASE);
        let mapped = netlist.map_lines(|line| {
            if line.has_designator_prefix("Rl") {
                None
            } else {
                Some(line.replace_node("in1", "out"))
            }
        });
        let text = mapped.to_text();
        assert!(!text.contains("Rl out"));
        assert!(text.contains("M1 out out tail 0 nmos"));
        // Directive block is untouched.
        assert!(text.contains("ac dec 10 1 10G"));
    }
}
