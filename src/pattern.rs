//! Route pattern compilation.
//!
//! A pattern is scanned left to right into [`Token`]s, and every token is
//! turned into a fragment of one anchored, case-insensitive regular
//! expression:
//!
//! ```ignore
//!  Syntax      Token      Fragment
//!  about       literal    /about
//!  :id         param      /([^/]+?)
//!  :id?        optional   (?:/([^/]+?))?
//!  *           wildcard   (?:/(.*))?
//!  :file.js    param      /([^/]+?)\.js
//! ```
//!
//! Capture groups appear in the same order as the parameter names, so values
//! are extracted by position.

use crate::error::PatternError;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// A single token of a route pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal directory segment, e.g. `about`.
    Literal(String),
    /// A required parameter, e.g. `:id` or `:file.js`.
    Param { name: String, suffix: String },
    /// An optional parameter, e.g. `:id?`.
    Optional { name: String, suffix: String },
    /// The rest of the path, e.g. `*`, `*?` or `*path`.
    Wildcard { name: String, suffix: String },
}

impl Token {
    /// The parameter name recorded for this token, `None` for literals.
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::Literal(_) => None,
            Token::Param { name, .. }
            | Token::Optional { name, .. }
            | Token::Wildcard { name, .. } => Some(name),
        }
    }

    fn fragment(&self) -> String {
        match self {
            Token::Literal(text) => format!("/{}", regex::escape(text)),
            Token::Param { suffix, .. } => format!("/([^/]+?){}", regex::escape(suffix)),
            Token::Optional { suffix, .. } => {
                format!("(?:/([^/]+?){})?", regex::escape(suffix))
            }
            Token::Wildcard { suffix, .. } => format!("(?:/(.*){})?", regex::escape(suffix)),
        }
    }
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

// Splits `name.suffix` at the first dot.
fn split_suffix(run: &str) -> (&str, &str) {
    match run.find('.') {
        Some(i) => run.split_at(i),
        None => (run, ""),
    }
}

/// Scans a pattern into tokens.
///
/// `/` separates tokens and is otherwise dropped. Any character that does not
/// start or continue a token is rejected.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '/' => {}
            c if is_segment_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, c)) = chars.peek() {
                    if !is_segment_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Literal(pattern[start..end].to_owned()));
            }
            ':' | '*' => {
                let from = start + 1;
                let mut end = from;
                while let Some(&(i, c)) = chars.peek() {
                    if !is_segment_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }

                let optional = chars.peek().map(|&(_, c)| c) == Some('?');
                if optional {
                    chars.next();
                }

                let (name, suffix) = split_suffix(&pattern[from..end]);
                let suffix = suffix.to_owned();

                let token = if c == '*' {
                    let name = if name.is_empty() { "*" } else { name };
                    Token::Wildcard {
                        name: name.to_owned(),
                        suffix,
                    }
                } else if name.is_empty() {
                    return Err(PatternError::UnnamedParam {
                        pattern: pattern.to_owned(),
                        position: start,
                    });
                } else if optional {
                    Token::Optional {
                        name: name.to_owned(),
                        suffix,
                    }
                } else {
                    Token::Param {
                        name: name.to_owned(),
                        suffix,
                    }
                };

                tokens.push(token);
            }
            found => {
                return Err(PatternError::UnexpectedChar {
                    pattern: pattern.to_owned(),
                    position: start,
                    found,
                })
            }
        }
    }

    Ok(tokens)
}

/// A compiled route pattern.
///
/// ```rust
/// use pathway::Pattern;
///
/// let pattern = Pattern::compile("/files/:name.js")?;
/// assert_eq!(pattern.keys(), ["name"]);
/// assert_eq!(pattern.find("/files/app.js"), Some(vec![Some("app")]));
/// assert_eq!(pattern.find("/files/app.css"), None);
/// # Ok::<(), pathway::PatternError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    keys: Vec<String>,
    regex: Regex,
    loose: bool,
}

impl Pattern {
    /// Compiles a pattern that must match the whole path, with an optional
    /// trailing slash.
    pub fn compile(pattern: &str) -> Result<Pattern, PatternError> {
        Pattern::build(pattern, false)
    }

    /// Compiles a pattern that matches any path it is a segment-wise prefix of,
    /// for mounting a group of routes under a common path.
    pub fn compile_loose(pattern: &str) -> Result<Pattern, PatternError> {
        Pattern::build(pattern, true)
    }

    fn build(pattern: &str, loose: bool) -> Result<Pattern, PatternError> {
        let tokens = tokenize(pattern)?;

        let keys = tokens
            .iter()
            .filter_map(Token::name)
            .map(str::to_owned)
            .collect();

        let mut body: String = tokens.iter().map(Token::fragment).collect();
        if body.is_empty() {
            body.push('/');
        }

        let tail = if loose { "(?:/|$)" } else { "/?$" };
        let regex = RegexBuilder::new(&format!("^{}{}", body, tail))
            .case_insensitive(true)
            .build()?;

        Ok(Pattern {
            source: pattern.to_owned(),
            keys,
            regex,
            loose,
        })
    }

    /// The pattern as it was registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parameter names in declaration order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Whether this pattern was compiled for prefix matching.
    pub fn is_loose(&self) -> bool {
        self.loose
    }

    /// The generated matcher.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns `true` if the path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches a path, returning one value per key.
    ///
    /// Parameters that did not participate in the match, or matched an empty
    /// string, are `None`.
    pub fn find<'p>(&self, path: &'p str) -> Option<Vec<Option<&'p str>>> {
        let captures = self.regex.captures(path)?;

        Some(
            (1..=self.keys.len())
                .map(|i| {
                    captures
                        .get(i)
                        .map(|m| m.as_str())
                        .filter(|value| !value.is_empty())
                })
                .collect(),
        )
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Recognizes a router's base path at the front of a URL and captures the
/// route that follows it.
#[derive(Clone, Debug)]
pub struct BasePattern {
    regex: Regex,
}

impl BasePattern {
    /// The route runs up to the first fragment marker or whitespace, so
    /// percent-escapes and non-ASCII segments are kept whole.
    pub fn new(base: &str) -> Result<BasePattern, PatternError> {
        let regex = RegexBuilder::new(&format!(
            r"^(?:[#|/]{{0,2}}|{})/?(?P<route>[^#\s]*)",
            regex::escape(base)
        ))
        .case_insensitive(true)
        .build()?;

        Ok(BasePattern { regex })
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Rewrites a URL to `/` followed by the recognized route.
    pub fn normalize(&self, url: &str) -> Option<String> {
        self.regex
            .captures(url)
            .map(|captures| match captures.name("route") {
                Some(route) => format!("/{}", route.as_str()),
                None => "/".to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens() {
        let tokens = tokenize("/blog/:category/:post?/*").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal("blog".into()),
                Token::Param {
                    name: "category".into(),
                    suffix: "".into()
                },
                Token::Optional {
                    name: "post".into(),
                    suffix: "".into()
                },
                Token::Wildcard {
                    name: "*".into(),
                    suffix: "".into()
                },
            ]
        );
    }

    #[test]
    fn suffix_split() {
        let tokens = tokenize("/:file.min.js").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Param {
                name: "file".into(),
                suffix: ".min.js".into()
            }]
        );
    }

    #[test]
    fn adjacent_tokens() {
        let tokens = tokenize("/user_:name").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::Literal("user_".into()));
        assert_eq!(tokens[1].name(), Some("name"));
    }

    #[test]
    fn fragments() {
        let pattern = Pattern::compile("/thing/:id?").unwrap();
        assert_eq!(pattern.regex().as_str(), r"^/thing(?:/([^/]+?))?/?$");

        let pattern = Pattern::compile_loose("/api").unwrap();
        assert_eq!(pattern.regex().as_str(), "^/api(?:/|$)");

        let pattern = Pattern::compile("").unwrap();
        assert_eq!(pattern.regex().as_str(), "^//?$");
    }

    #[test]
    fn rejects_unknown_characters() {
        assert_eq!(
            tokenize("/users/{id}"),
            Err(PatternError::UnexpectedChar {
                pattern: "/users/{id}".into(),
                position: 7,
                found: '{'
            })
        );
        assert!(tokenize("/a?").is_err());
        assert_eq!(
            tokenize("/a/:/b"),
            Err(PatternError::UnnamedParam {
                pattern: "/a/:/b".into(),
                position: 3
            })
        );
    }

    #[test]
    fn base_normalize() {
        let base = BasePattern::new("/").unwrap();
        assert_eq!(base.normalize("/about").as_deref(), Some("/about"));
        assert_eq!(base.normalize("//about").as_deref(), Some("/about"));
        assert_eq!(base.normalize("").as_deref(), Some("/"));

        let hash = BasePattern::new("#").unwrap();
        assert_eq!(hash.normalize("/#/about/").as_deref(), Some("/about/"));
    }

    #[test]
    fn base_keeps_escapes() {
        let base = BasePattern::new("/").unwrap();
        assert_eq!(
            base.normalize("/users/john%20doe").as_deref(),
            Some("/users/john%20doe")
        );
        assert_eq!(
            base.normalize("/caf\u{e9}/men\u{fc}").as_deref(),
            Some("/caf\u{e9}/men\u{fc}")
        );
        assert_eq!(
            base.normalize("/search?q=a+b&page=2").as_deref(),
            Some("/search?q=a+b&page=2")
        );
        assert_eq!(base.normalize("/tasks#top").as_deref(), Some("/tasks"));
    }
}
