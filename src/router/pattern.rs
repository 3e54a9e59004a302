//! Route pattern compilation.
//!
//! Turns a pattern such as `/users/{id}/posts/{post_id}` into an anchored
//! [`Regex`] plus the ordered list of placeholder names, so that
//! `param_names[i]` always names capture group `i + 1`.
//!
//! Syntax:
//!
//! - `{name}` captures exactly one path segment (`[^/]+`).
//! - `{*name}` captures the rest of the path, slashes included, and may be
//!   empty. It is only accepted as the last element of the pattern.
//! - Everything else is literal. Literal text is escaped before it is placed
//!   in the regex, so `/files/a.txt` only matches the dot it spells out.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Regex fragment for a single-segment placeholder.
const SEGMENT_CAPTURE: &str = "([^/]+)";
/// Regex fragment for a trailing catch-all placeholder.
const REST_CAPTURE: &str = "(.*)";

/// A pattern that has been compiled into an anchored matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Anchored matcher over the full request path.
    pub matcher: Regex,
    /// Placeholder names in left-to-right order, one per capture group.
    pub param_names: Vec<Arc<str>>,
}

/// Configuration error raised when a route pattern cannot be compiled.
///
/// These are reported at registration time; a router never holds a route
/// whose pattern failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `{` was opened but never closed.
    UnclosedPlaceholder {
        /// The offending pattern
        pattern: String,
        /// Byte offset of the opening brace
        position: usize,
    },
    /// A `}` appeared without a matching `{`.
    UnexpectedClose {
        /// The offending pattern
        pattern: String,
        /// Byte offset of the closing brace
        position: usize,
    },
    /// A placeholder had an empty or otherwise unusable name.
    InvalidName {
        /// The offending pattern
        pattern: String,
        /// The name as written between the braces
        name: String,
    },
    /// The same placeholder name appeared twice.
    DuplicateName {
        /// The offending pattern
        pattern: String,
        /// The repeated name
        name: String,
    },
    /// A `{*name}` placeholder was followed by more pattern text.
    CatchAllNotLast {
        /// The offending pattern
        pattern: String,
    },
    /// The generated expression was rejected by the regex engine.
    Regex {
        /// The offending pattern
        pattern: String,
        /// Message from the regex engine
        message: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnclosedPlaceholder { pattern, position } => write!(
                f,
                "invalid route pattern '{pattern}': placeholder opened at byte {position} is never closed"
            ),
            PatternError::UnexpectedClose { pattern, position } => write!(
                f,
                "invalid route pattern '{pattern}': unexpected '}}' at byte {position}"
            ),
            PatternError::InvalidName { pattern, name } => write!(
                f,
                "invalid route pattern '{pattern}': placeholder name '{name}' is not allowed"
            ),
            PatternError::DuplicateName { pattern, name } => write!(
                f,
                "invalid route pattern '{pattern}': placeholder '{name}' appears more than once"
            ),
            PatternError::CatchAllNotLast { pattern } => write!(
                f,
                "invalid route pattern '{pattern}': a catch-all placeholder must end the pattern"
            ),
            PatternError::Regex { pattern, message } => {
                write!(f, "invalid route pattern '{pattern}': {message}")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Compile a route pattern into an anchored matcher and its placeholder names.
///
/// Patterns without placeholders compile to an exact literal match.
///
/// # Errors
///
/// Returns a [`PatternError`] when the placeholder syntax is malformed, a name
/// repeats, a catch-all is not last, or the resulting regex fails to build.
///
/// # Example
///
/// ```rust
/// use enzovu::router::compile_pattern;
///
/// let compiled = compile_pattern("/users/{id}").unwrap();
/// assert!(compiled.matcher.is_match("/users/42"));
/// assert!(!compiled.matcher.is_match("/users/42/"));
/// assert_eq!(&*compiled.param_names[0], "id");
/// ```
pub fn compile_pattern(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let mut regex_src = String::with_capacity(pattern.len() + 16);
    regex_src.push('^');
    let mut param_names: Vec<Arc<str>> = Vec::with_capacity(pattern.matches('{').count());

    // Delimiters are ASCII, so every index we slice at is a char boundary.
    let bytes = pattern.as_bytes();
    let mut literal_start = 0;
    let mut catch_all_seen = false;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => {
                if catch_all_seen {
                    return Err(PatternError::CatchAllNotLast {
                        pattern: pattern.to_string(),
                    });
                }
                regex_src.push_str(&regex::escape(&pattern[literal_start..pos]));

                let close = pattern[pos + 1..]
                    .find(['}', '{'])
                    .map(|offset| pos + 1 + offset)
                    .filter(|&idx| bytes[idx] == b'}')
                    .ok_or_else(|| PatternError::UnclosedPlaceholder {
                        pattern: pattern.to_string(),
                        position: pos,
                    })?;

                let raw = &pattern[pos + 1..close];
                let (name, catch_all) = match raw.strip_prefix('*') {
                    Some(name) => (name, true),
                    None => (raw, false),
                };
                validate_name(pattern, raw, name)?;
                if param_names.iter().any(|existing| &**existing == name) {
                    return Err(PatternError::DuplicateName {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }

                param_names.push(Arc::from(name));
                regex_src.push_str(if catch_all { REST_CAPTURE } else { SEGMENT_CAPTURE });
                catch_all_seen = catch_all;

                pos = close + 1;
                literal_start = pos;
            }
            b'}' => {
                return Err(PatternError::UnexpectedClose {
                    pattern: pattern.to_string(),
                    position: pos,
                });
            }
            _ if catch_all_seen => {
                return Err(PatternError::CatchAllNotLast {
                    pattern: pattern.to_string(),
                });
            }
            _ => pos += 1,
        }
    }

    regex_src.push_str(&regex::escape(&pattern[literal_start..]));
    regex_src.push('$');

    let matcher = Regex::new(&regex_src).map_err(|e| PatternError::Regex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    debug_assert_eq!(matcher.captures_len(), param_names.len() + 1);

    Ok(CompiledPattern {
        matcher,
        param_names,
    })
}

fn validate_name(pattern: &str, raw: &str, name: &str) -> Result<(), PatternError> {
    let usable = !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '/' | '{' | '}' | '*'));
    if usable {
        Ok(())
    } else {
        Err(PatternError::InvalidName {
            pattern: pattern.to_string(),
            name: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(compiled: &CompiledPattern) -> Vec<&str> {
        compiled.param_names.iter().map(|n| &**n).collect()
    }

    #[test]
    fn test_literal_pattern_is_exact() {
        let c = compile_pattern("/about").unwrap();
        assert!(c.matcher.is_match("/about"));
        assert!(!c.matcher.is_match("/about/"));
        assert!(!c.matcher.is_match("/aboutus"));
        assert!(!c.matcher.is_match("/x/about"));
        assert!(names(&c).is_empty());
    }

    #[test]
    fn test_root_pattern() {
        let c = compile_pattern("/").unwrap();
        assert!(c.matcher.is_match("/"));
        assert!(!c.matcher.is_match(""));
        assert!(!c.matcher.is_match("//"));
    }

    #[test]
    fn test_placeholders_in_order() {
        let c = compile_pattern("/users/{user_id}/posts/{post_id}").unwrap();
        assert_eq!(names(&c), vec!["user_id", "post_id"]);
        let caps = c.matcher.captures("/users/7/posts/abc").unwrap();
        assert_eq!(&caps[1], "7");
        assert_eq!(&caps[2], "abc");
    }

    #[test]
    fn test_placeholder_does_not_cross_segments() {
        let c = compile_pattern("/users/{id}").unwrap();
        assert!(!c.matcher.is_match("/users/1/2"));
        assert!(!c.matcher.is_match("/users/"));
    }

    #[test]
    fn test_placeholder_inside_segment() {
        let c = compile_pattern("/files/{name}.json").unwrap();
        let caps = c.matcher.captures("/files/report.json").unwrap();
        assert_eq!(&caps[1], "report");
        assert!(!c.matcher.is_match("/files/report.yaml"));
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let c = compile_pattern("/files/a.txt").unwrap();
        assert!(c.matcher.is_match("/files/a.txt"));
        assert!(!c.matcher.is_match("/files/aXtxt"));

        let c = compile_pattern("/v1+/(x)").unwrap();
        assert!(c.matcher.is_match("/v1+/(x)"));
        assert!(!c.matcher.is_match("/v11/x"));
        assert_eq!(c.matcher.captures_len(), 1);
    }

    #[test]
    fn test_catch_all() {
        let c = compile_pattern("/static/{*filepath}").unwrap();
        assert_eq!(names(&c), vec!["filepath"]);
        let caps = c.matcher.captures("/static/css/site.css").unwrap();
        assert_eq!(&caps[1], "css/site.css");
        assert!(c.matcher.is_match("/static/"));
        assert!(!c.matcher.is_match("/static"));
    }

    #[test]
    fn test_catch_all_must_be_last() {
        let err = compile_pattern("/a/{*rest}/b").unwrap_err();
        assert!(matches!(err, PatternError::CatchAllNotLast { .. }));
        let err = compile_pattern("/a/{*rest}{id}").unwrap_err();
        assert!(matches!(err, PatternError::CatchAllNotLast { .. }));
    }

    #[test]
    fn test_malformed_patterns() {
        assert!(matches!(
            compile_pattern("/users/{id").unwrap_err(),
            PatternError::UnclosedPlaceholder { position: 7, .. }
        ));
        assert!(matches!(
            compile_pattern("/users/{a{b}}").unwrap_err(),
            PatternError::UnclosedPlaceholder { .. }
        ));
        assert!(matches!(
            compile_pattern("/users/id}").unwrap_err(),
            PatternError::UnexpectedClose { position: 9, .. }
        ));
        assert!(matches!(
            compile_pattern("/users/{}").unwrap_err(),
            PatternError::InvalidName { .. }
        ));
        assert!(matches!(
            compile_pattern("/users/{*}").unwrap_err(),
            PatternError::InvalidName { .. }
        ));
        assert!(matches!(
            compile_pattern("/users/{a b}").unwrap_err(),
            PatternError::InvalidName { .. }
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = compile_pattern("/org/{id}/user/{id}").unwrap_err();
        assert_eq!(
            err,
            PatternError::DuplicateName {
                pattern: "/org/{id}/user/{id}".to_string(),
                name: "id".to_string(),
            }
        );
        assert!(err.to_string().contains("appears more than once"));
    }
}
