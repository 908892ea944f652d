use std::fmt::{self, Write};

/// Placed between elements in the compact rendering.
pub(crate) const GROUP_SEPARATOR: &str = "; ";

/// First line of the verbose rendering.
pub(crate) const MULTILINE_PREFIX: &str = "the following errors occurred:";

/// Introduces each element in the verbose rendering.
pub(crate) const MULTILINE_SEPARATOR: &str = "\n -  ";

/// Prefixed to every line of an element after its first.
pub(crate) const MULTILINE_INDENT: &str = "    ";

/// A [`fmt::Write`] adapter which writes `indent` before every line except the first.
///
/// The indent is only written once text actually follows a newline, so a trailing newline does
/// not leave a dangling indent behind.
pub(crate) struct Indented<'a, W: Write + ?Sized> {
    inner: &'a mut W,
    indent: &'static str,
    at_line_start: bool,
}

impl<'a, W: Write + ?Sized> Indented<'a, W> {
    pub(crate) fn new(inner: &'a mut W, indent: &'static str) -> Self {
        Indented { inner, indent, at_line_start: false }
    }
}

impl<W: Write + ?Sized> Write for Indented<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for line in s.split_inclusive('\n') {
            if self.at_line_start {
                self.inner.write_str(self.indent)?;
            }
            self.inner.write_str(line)?;
            self.at_line_start = line.ends_with('\n');
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indent(parts: &[&str]) -> String {
        let mut out = String::new();
        let mut w = Indented::new(&mut out, MULTILINE_INDENT);
        for part in parts {
            w.write_str(part).unwrap();
        }
        out
    }

    #[test]
    fn single_line_is_untouched() {
        assert_eq!(indent(&["hello"]), "hello");
    }

    #[test]
    fn later_lines_are_indented() {
        assert_eq!(indent(&["a\nb\nc"]), "a\n    b\n    c");
    }

    #[test]
    fn trailing_newline_has_no_indent() {
        assert_eq!(indent(&["a\n"]), "a\n");
    }

    #[test]
    fn newline_split_across_writes() {
        assert_eq!(indent(&["a\n", "b", "\n", "c"]), "a\n    b\n    c");
    }

    #[test]
    fn empty_input() {
        assert_eq!(indent(&[""]), "");
    }
}
