//! Lossless conversion between a command line and a launch URI.
//!
//! The program name becomes the URI scheme and every remaining argument
//! becomes one percent-encoded path segment:
//!
//! ```text
//! ["jbang", "run", "Hello World.java"]  <->  jbang:///run/Hello%20World.java
//! ```
//!
//! Empty arguments map to empty segments, so `decode(encode(v)) == v` holds
//! for every vector with at least one argument after the program name.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use thiserror::Error;

/// Bytes escaped when an argument is written as a path segment.
///
/// Everything outside RFC 3986 `pchar` is escaped, plus `/` so an argument
/// never splits into two segments. Sub-delimiters such as `$`, `=`, `@` and
/// `+` stay literal. Non-ASCII is always UTF-8 percent-encoded.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// RFC 3986, Appendix B.
static URI_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("URI component pattern is valid")
});

static SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("scheme pattern is valid")
});

/// Failure converting between an argument vector and a launch URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer than two arguments, or a program name that is not a URI scheme.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("malformed URI {uri:?}: {reason}")]
    MalformedUri { uri: String, reason: String },

    /// The URI has a scheme but no path, e.g. `jbang://`.
    #[error("missing path in URI {0:?}")]
    MissingPath(String),
}

impl CodecError {
    /// Stable identifier for logs and exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => "invalid-arguments",
            Self::MalformedUri { .. } => "malformed-uri",
            Self::MissingPath(_) => "missing-path",
        }
    }

    fn malformed(uri: &str, reason: impl Into<String>) -> Self {
        Self::MalformedUri {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}

/// A parsed `<scheme>://<path>` launch URI.
///
/// The path is kept in its raw, still-encoded form; segments are decoded
/// only when the URI is turned back into arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaunchUri {
    scheme: String,
    path: String,
}

impl LaunchUri {
    /// Parse URI text, rejecting anything that is not a valid launch URI.
    ///
    /// Query and fragment are accepted and ignored. A non-empty authority is
    /// rejected: `jbang://run/x.java` would otherwise silently lose `run`.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        if text.trim().is_empty() {
            return Err(CodecError::malformed(text, "empty URI"));
        }

        let caps = URI_PARTS
            .captures(text)
            .ok_or_else(|| CodecError::malformed(text, "unrecognized URI structure"))?;

        let scheme = caps
            .get(1)
            .map(|m| m.as_str())
            .ok_or_else(|| CodecError::malformed(text, "missing scheme"))?;
        if !SCHEME.is_match(scheme) {
            return Err(CodecError::malformed(
                text,
                format!("invalid scheme {scheme:?}"),
            ));
        }

        if let Some(authority) = caps.get(2) {
            if !authority.as_str().is_empty() {
                return Err(CodecError::malformed(
                    text,
                    format!("unexpected authority {:?}", authority.as_str()),
                ));
            }
        }

        let path = caps.get(3).map_or("", |m| m.as_str());
        check_component(text, path, "path", "/")?;
        if let Some(query) = caps.get(4) {
            check_component(text, query.as_str(), "query", "/?")?;
        }
        if let Some(fragment) = caps.get(5) {
            check_component(text, fragment.as_str(), "fragment", "/?")?;
        }

        if path.is_empty() {
            return Err(CodecError::MissingPath(text.to_string()));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            path: path.to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The path exactly as it appears in the URI, still percent-encoded.
    pub fn raw_path(&self) -> &str {
        &self.path
    }

    /// Raw path segments, one per argument after the program name.
    ///
    /// Only the empty segment produced by a leading `/` is dropped; inner
    /// and trailing empty segments are arguments in their own right.
    pub fn raw_segments(&self) -> impl Iterator<Item = &str> {
        let path = self.path.strip_prefix('/').unwrap_or(&self.path);
        path.split('/')
    }

    /// Decode back into the argument vector, program name first.
    pub fn to_args(&self) -> Result<Vec<String>, CodecError> {
        let mut args = vec![self.scheme.clone()];
        for segment in self.raw_segments() {
            let decoded = percent_decode_str(segment).decode_utf8().map_err(|_| {
                CodecError::malformed(
                    &self.to_string(),
                    format!("segment {segment:?} is not valid UTF-8"),
                )
            })?;
            args.push(decoded.into_owned());
        }
        Ok(args)
    }
}

impl fmt::Display for LaunchUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.starts_with('/') {
            write!(f, "{}://{}", self.scheme, self.path)
        } else {
            write!(f, "{}:{}", self.scheme, self.path)
        }
    }
}

impl FromStr for LaunchUri {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Check every character of a URI component against RFC 3986.
///
/// `extra` lists characters legal in this component beyond `pchar`.
/// Non-ASCII text is tolerated the way IRIs allow it, as long as it is
/// neither whitespace nor a control character.
fn check_component(uri: &str, component: &str, name: &str, extra: &str) -> Result<(), CodecError> {
    let mut chars = component.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == '%' {
            let hex = component.get(idx + 1..idx + 3).unwrap_or("");
            if hex.len() != 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(CodecError::malformed(
                    uri,
                    format!("invalid percent-escape in {name} at byte {idx}"),
                ));
            }
            chars.nth(1);
            continue;
        }
        if is_pchar(c) || extra.contains(c) {
            continue;
        }
        if !c.is_ascii() && !c.is_whitespace() && !c.is_control() {
            continue;
        }
        return Err(CodecError::malformed(
            uri,
            format!("illegal character {c:?} in {name}"),
        ));
    }
    Ok(())
}

fn is_pchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:@".contains(c)
}

/// Encode a command line as a launch URI.
///
/// `args[0]` is used verbatim as the scheme and must already be a valid
/// scheme token; at least one further argument is required.
pub fn encode<S: AsRef<str>>(args: &[S]) -> Result<LaunchUri, CodecError> {
    let Some((program, rest)) = args.split_first() else {
        return Err(CodecError::InvalidArguments(
            "command line cannot be empty".to_string(),
        ));
    };
    if rest.is_empty() {
        return Err(CodecError::InvalidArguments(
            "command line must have at least 2 arguments (<program> <command>)".to_string(),
        ));
    }

    let scheme = program.as_ref();
    if !SCHEME.is_match(scheme) {
        return Err(CodecError::InvalidArguments(format!(
            "program name {scheme:?} is not a valid URI scheme"
        )));
    }

    let mut path = String::new();
    for arg in rest {
        path.push('/');
        path.extend(utf8_percent_encode(arg.as_ref(), SEGMENT));
    }

    Ok(LaunchUri {
        scheme: scheme.to_string(),
        path,
    })
}

/// Decode launch URI text back into a command line.
pub fn decode(uri: &str) -> Result<Vec<String>, CodecError> {
    LaunchUri::parse(uri)?.to_args()
}

/// Render a command line for display.
///
/// Arguments containing a space or a quote are wrapped in double quotes with
/// inner `"` escaped. The result is for people to read: never hand it to a
/// shell or use it to spawn a process.
pub fn to_quoted_command_string<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.contains([' ', '"', '\'']) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
