use std::fmt;

/// Represents errors that can occur when compiling a route pattern.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PatternError {
    /// A character that belongs to no token class.
    UnexpectedChar {
        /// The pattern being compiled.
        pattern: String,
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
    /// Parameters must be registered with a name.
    UnnamedParam {
        /// The pattern being compiled.
        pattern: String,
        /// Byte offset of the `:`.
        position: usize,
    },
    /// The generated matcher was rejected by the regex engine.
    Matcher(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar {
                pattern,
                position,
                found,
            } => write!(
                f,
                "unexpected character {:?} at offset {} in route '{}'",
                found, position, pattern
            ),
            Self::UnnamedParam { pattern, position } => write!(
                f,
                "parameter at offset {} in route '{}' must be registered with a name",
                position, pattern
            ),
            Self::Matcher(err) => write!(f, "failed to build route matcher: {}", err),
        }
    }
}

impl std::error::Error for PatternError {}

impl From<regex::Error> for PatternError {
    fn from(err: regex::Error) -> Self {
        PatternError::Matcher(err.to_string())
    }
}

/// Errors surfaced while dispatching a request.
///
/// These are what a handler chain hands to `next`: nothing here is fatal to
/// the router, and every one of them ends up in [`Dispatched::errors`](crate::Dispatched).
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// No route matched a non-empty URL.
    NotFound {
        /// The normalized URL that failed to match.
        url: String,
    },
    /// A handler rejected.
    Handler(Box<dyn std::error::Error + Send + Sync>),
    /// A handler rejected with a plain message.
    Message(String),
    /// A `json` body could not be serialized.
    Serialize(serde_json::Error),
}

impl Error {
    /// Wraps any error returned from a handler.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Handler(err.into())
    }

    /// Rejects with a message, the equivalent of `next('some reason')`.
    pub fn msg(msg: impl Into<String>) -> Self {
        Error::Message(msg.into())
    }

    /// Returns `true` for the no-match error produced by the default error handler.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { url } => write!(f, "404 Not Found: {}", url),
            Self::Handler(err) => write!(f, "handler failed: {}", err),
            Self::Message(msg) => f.write_str(msg),
            Self::Serialize(err) => write!(f, "failed to serialize json body: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Handler(err) => Some(err.as_ref()),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err)
    }
}
