//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    prefix: Option<String>,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            prefix: None,
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Create a formatter writing to stdout, for lines meant to be piped.
    #[must_use]
    pub(crate) fn stdout() -> Self {
        Self {
            term: Term::stdout(),
            ..Self::new()
        }
    }

    /// Prefix every line with `[prefix] `.
    #[must_use]
    pub(crate) fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = (!prefix.is_empty()).then(|| format!("[{prefix}] "));
        self
    }

    fn line(&self, msg: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{msg}"),
            None => msg.to_owned(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(&self.line(msg));
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.green.apply_to(self.line(msg)).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.yellow.apply_to(self.line(msg)).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.red.apply_to(self.line(msg)).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(self.line(msg)).to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::TermTarget;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stream_targets() {
        assert!(matches!(Output::new().term.target(), TermTarget::Stderr));
        assert!(matches!(Output::stdout().term.target(), TermTarget::Stdout));
    }

    #[test]
    fn test_line_without_prefix() {
        assert_eq!(Output::new().line("Serving"), "Serving");
    }

    #[test]
    fn test_line_with_prefix() {
        let output = Output::new().with_prefix("NDBench UI - DEV");
        assert_eq!(output.line("Serving"), "[NDBench UI - DEV] Serving");
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        assert_eq!(Output::new().with_prefix("").line("x"), "x");
    }
}
