//! Request rewrite rules.
//!
//! Rules use the mod_rewrite one-liner syntax:
//!
//! ```text
//! <pattern> <replacement> [FLAGS]
//! ^/REST/(.*)$ http://localhost:8080/REST/$1 [P]
//! ```
//!
//! The pattern is a regex matched against the request path and query. A
//! leading `!` negates it. `$N` in the replacement expands to capture group
//! `N`, and a replacement of `-` keeps the URL as is.
//!
//! | Flag     | Effect                                     |
//! |----------|--------------------------------------------|
//! | `P`      | forward to the (absolute) replacement URL  |
//! | `R[=nnn]`| redirect, 302 unless a 3xx code is given   |
//! | `F`      | 403 Forbidden                              |
//! | `G`      | 410 Gone                                   |
//! | `NC`     | case-insensitive pattern                   |
//! | `L`      | stop after this rule if it matched         |
//!
//! A rule without `P`, `R`, `F` or `G` rewrites the URL internally and lets
//! the following rules see the new URL.

use axum::http::StatusCode;
use regex::{Captures, Regex, RegexBuilder};

/// Rule parse error.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Rule text is malformed.
    #[error("Invalid rewrite rule {rule:?}: {message}")]
    Syntax {
        /// Offending rule.
        rule: String,
        /// What is wrong with it.
        message: String,
    },
    /// Pattern is not a valid regex.
    #[error("Invalid pattern in rewrite rule {rule:?}: {source}")]
    Regex {
        /// Offending rule.
        rule: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },
    /// Flag not understood.
    #[error("Unknown flag {flag:?} in rewrite rule {rule:?}")]
    UnknownFlag {
        /// Offending rule.
        rule: String,
        /// The flag as written.
        flag: String,
    },
    /// `R=` code is not a redirect status.
    #[error("Invalid redirect status {code:?} in rewrite rule {rule:?}")]
    InvalidRedirectCode {
        /// Offending rule.
        rule: String,
        /// The code as written.
        code: String,
    },
}

/// What a matching rule does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Rewrite,
    Proxy,
    Redirect(StatusCode),
    Respond(StatusCode),
}

/// Outcome of evaluating the rule list against a request URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rewrite {
    /// Forward the request to this absolute URL.
    Proxy(String),
    /// Send the client elsewhere.
    Redirect {
        /// `Location` header value.
        location: String,
        /// 3xx status.
        status: StatusCode,
    },
    /// Answer with a bare status.
    Status(StatusCode),
    /// Continue with this URL instead of the requested one.
    Internal(String),
    /// No rule changed the request.
    Unchanged,
}

/// A single parsed rule.
#[derive(Debug)]
pub struct RewriteRule {
    pattern: Regex,
    negated: bool,
    /// `None` for `-`.
    replacement: Option<String>,
    action: Action,
    last: bool,
}

impl RewriteRule {
    /// Parse a rule from its one-line form.
    pub fn parse(rule: &str) -> Result<Self, RuleError> {
        let syntax = |message: &str| RuleError::Syntax {
            rule: rule.to_owned(),
            message: message.to_owned(),
        };

        let mut parts = rule.split_whitespace();
        let pattern = parts.next().ok_or_else(|| syntax("empty rule"))?;
        let replacement = parts
            .next()
            .ok_or_else(|| syntax("missing replacement"))?;
        let flags = parts.next();
        if parts.next().is_some() {
            return Err(syntax("expected `<pattern> <replacement> [FLAGS]`"));
        }

        let (action, last, nocase) = match flags {
            Some(flags) => Self::parse_flags(rule, flags)?,
            None => (Action::Rewrite, false, false),
        };

        let (negated, pattern) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(nocase)
            .build()
            .map_err(|source| RuleError::Regex {
                rule: rule.to_owned(),
                source,
            })?;

        let replacement = (replacement != "-").then(|| replacement.to_owned());

        if action == Action::Proxy
            && !replacement
                .as_deref()
                .is_some_and(|r| r.starts_with("http://") || r.starts_with("https://"))
        {
            return Err(syntax("[P] needs an absolute http:// or https:// replacement"));
        }

        Ok(Self {
            pattern,
            negated,
            replacement,
            action,
            last,
        })
    }

    /// Parse a `[A,B=c]` flag block into (action, last, nocase).
    fn parse_flags(rule: &str, block: &str) -> Result<(Action, bool, bool), RuleError> {
        let inner = block
            .strip_prefix('[')
            .and_then(|b| b.strip_suffix(']'))
            .ok_or_else(|| RuleError::Syntax {
                rule: rule.to_owned(),
                message: format!("flags must be enclosed in brackets, got {block:?}"),
            })?;

        let mut action = Action::Rewrite;
        let mut last = false;
        let mut nocase = false;

        for flag in inner.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let (name, value) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (flag, None),
            };

            let next = match (name.to_ascii_uppercase().as_str(), value) {
                ("L", None) => {
                    last = true;
                    continue;
                }
                ("NC", None) => {
                    nocase = true;
                    continue;
                }
                ("P", None) => Action::Proxy,
                ("F", None) => Action::Respond(StatusCode::FORBIDDEN),
                ("G", None) => Action::Respond(StatusCode::GONE),
                ("R", None) => Action::Redirect(StatusCode::FOUND),
                ("R", Some(code)) => Action::Redirect(Self::redirect_status(rule, code)?),
                _ => {
                    return Err(RuleError::UnknownFlag {
                        rule: rule.to_owned(),
                        flag: flag.to_owned(),
                    });
                }
            };

            if action != Action::Rewrite {
                return Err(RuleError::Syntax {
                    rule: rule.to_owned(),
                    message: "only one of P, R, F or G may be given".to_owned(),
                });
            }
            action = next;
        }

        Ok((action, last, nocase))
    }

    fn redirect_status(rule: &str, code: &str) -> Result<StatusCode, RuleError> {
        code.parse::<u16>()
            .ok()
            .and_then(|n| StatusCode::from_u16(n).ok())
            .filter(StatusCode::is_redirection)
            .ok_or_else(|| RuleError::InvalidRedirectCode {
                rule: rule.to_owned(),
                code: code.to_owned(),
            })
    }

    /// Apply the rule to `url`, returning the substituted URL if it matched.
    fn apply(&self, url: &str) -> Option<String> {
        let captures = if self.negated {
            if self.pattern.is_match(url) {
                return None;
            }
            None
        } else {
            Some(self.pattern.captures(url)?)
        };

        Some(match &self.replacement {
            Some(template) => expand(template, captures.as_ref()),
            None => url.to_owned(),
        })
    }
}

/// Substitute `$N` references with capture groups.
///
/// Unknown or non-participating groups expand to nothing. A `$` not followed
/// by a digit is kept literally.
fn expand(template: &str, captures: Option<&Captures<'_>>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut digits = String::new();
        while let Some(d) = chars.next_if(char::is_ascii_digit) {
            digits.push(d);
        }
        if digits.is_empty() {
            out.push('$');
            continue;
        }

        let group = digits
            .parse::<usize>()
            .ok()
            .and_then(|n| captures?.get(n));
        if let Some(m) = group {
            out.push_str(m.as_str());
        }
    }

    out
}

/// Ordered rule list.
#[derive(Debug, Default)]
pub struct RewriteRules {
    rules: Vec<RewriteRule>,
}

impl RewriteRules {
    /// Parse every rule, failing on the first invalid one.
    pub fn parse_all<S: AsRef<str>>(rules: &[S]) -> Result<Self, RuleError> {
        let rules = rules
            .iter()
            .map(|r| RewriteRule::parse(r.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate the rules in order against a path-and-query string.
    #[must_use]
    pub fn evaluate(&self, url: &str) -> Rewrite {
        let mut current = url.to_owned();
        let mut rewritten = false;

        for rule in &self.rules {
            let Some(target) = rule.apply(&current) else {
                continue;
            };

            match rule.action {
                Action::Proxy => return Rewrite::Proxy(target),
                Action::Redirect(status) => {
                    return Rewrite::Redirect {
                        location: target,
                        status,
                    };
                }
                Action::Respond(status) => return Rewrite::Status(status),
                Action::Rewrite => {
                    rewritten |= target != current;
                    current = target;
                }
            }

            if rule.last {
                break;
            }
        }

        if rewritten {
            Rewrite::Internal(current)
        } else {
            Rewrite::Unchanged
        }
    }
}
