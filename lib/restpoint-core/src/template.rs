//! URL pattern compiler.
//!
//! Patterns name parameters with a `:` marker, one per path segment:
//! `/user/:username` or, with an optional segment, `/message/:messageid?`.
//! [`compile`] substitutes each placeholder from a [`Params`] object,
//! percent-encoding the value so it stays a single path segment.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Error, Params, Result};

/// Path segment encoding set: everything except unreserved characters
/// (A-Z a-z 0-9 - . _ ~) and sub-delims.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Compile a URL pattern against a parameter object.
///
/// Patterns without a `:` marker pass through untouched. A required
/// placeholder with no corresponding entry fails with
/// [`Error::MissingParameter`] naming the field; an optional placeholder
/// (trailing `?`) with no entry removes the whole segment.
///
/// ```
/// use restpoint_core::{Params, template};
/// use serde_json::json;
///
/// let path = template::compile("/user/:username", &json!({"username": "alice"}).into())
///     .expect("compiles");
/// assert_eq!(path, "/user/alice");
/// ```
pub fn compile(pattern: &str, params: &Params) -> Result<String> {
    if !pattern.contains(':') {
        return Ok(pattern.to_string());
    }

    let mut segments = Vec::new();
    for segment in pattern.split('/') {
        match placeholder(segment) {
            None => segments.push(segment.to_string()),
            Some((name, optional)) => match params.segment(name) {
                Some(value) => {
                    segments.push(utf8_percent_encode(&value, PATH_SEGMENT_ENCODE_SET).to_string());
                }
                None if optional => {}
                None => return Err(Error::missing_parameter(name)),
            },
        }
    }
    Ok(segments.join("/"))
}

/// Parse a segment as a placeholder, returning its name and whether it is
/// optional. Segments that are not placeholders return `None`.
fn placeholder(segment: &str) -> Option<(&str, bool)> {
    let name = segment.strip_prefix(':')?;
    if name.is_empty() {
        return None;
    }
    match name.strip_suffix('?') {
        Some(name) if !name.is_empty() => Some((name, true)),
        Some(_) => None,
        None => Some((name, false)),
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    fn params(value: serde_json::Value) -> Params {
        Params::from(value)
    }

    #[test]
    fn compile_substitutes_named_parameter() {
        let path = compile("/user/:username", &params(json!({"username": "alice"})))
            .expect("compiles");
        check!(path == "/user/alice");
    }

    #[test]
    fn compile_substitutes_multiple_parameters() {
        let path = compile(
            "/user/:username/messages/:id",
            &params(json!({"username": "bob", "id": 7})),
        )
        .expect("compiles");
        check!(path == "/user/bob/messages/7");
    }

    #[test]
    fn compile_percent_encodes_values() {
        let path = compile("/search/:q", &params(json!({"q": "a b/c%"}))).expect("compiles");
        check!(path == "/search/a%20b%2Fc%25");
    }

    #[test]
    fn compile_missing_required_parameter() {
        let err = compile("/user/:username", &Params::none()).expect_err("should fail");
        check!(err.to_string() == "expected \"username\" to be defined");
    }

    #[test]
    fn compile_optional_parameter_present() {
        let path = compile(
            "/message/:messageid?",
            &params(json!({"messageid": "42"})),
        )
        .expect("compiles");
        check!(path == "/message/42");
    }

    #[test]
    fn compile_optional_parameter_absent_drops_segment() {
        let path = compile("/message/:messageid?", &Params::none()).expect("compiles");
        check!(path == "/message");
    }

    #[test]
    fn compile_plain_pattern_passes_through() {
        let path = compile("/users/all", &Params::none()).expect("compiles");
        check!(path == "/users/all");
    }

    #[test]
    fn compile_literal_colon_segment_kept() {
        // A bare ":" is not a placeholder
        let path = compile("/odd/:/end", &Params::none()).expect("compiles");
        check!(path == "/odd/:/end");
    }
}
