//! Decoder for `key=value&key=value` payloads.
//!
//! # Design
//! Decoding never fails as a whole. A segment that is not exactly one
//! `key=value` pair, or whose escapes are malformed, is dropped and the rest
//! of the line is still used. Dropped pairs are logged, not reported.
//!
//! Two flavours exist. `decode_query` reads update bodies and is strict about
//! pair shape: `k=` and `a=b=c` are dropped, later duplicates win.
//! `decode_form` reads creation forms like a servlet parameter map: values
//! may be empty or contain `=`, and the first occurrence of a key wins.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::error::DecodeError;

/// Decode one line of form-encoded text into a key/value map.
///
/// Later duplicates overwrite earlier ones.
pub fn decode_query(raw: Option<&str>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(raw) = raw else {
        return map;
    };
    for segment in raw.split('&') {
        let Some((key, value)) = split_pair(segment) else {
            continue;
        };
        match (decode_component(key), decode_component(value)) {
            (Ok(key), Ok(value)) => {
                map.insert(key, value);
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(segment, error = %err, "skipping undecodable pair");
            }
        }
    }
    map
}

/// Decode one form-encoded string into a parameter map.
///
/// Each segment splits on its first `=`; a segment without `=` is dropped.
/// Empty values are kept. Earlier duplicates win over later ones.
pub fn decode_form(raw: Option<&str>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(raw) = raw else {
        return map;
    };
    for segment in raw.split('&') {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        match (decode_component(key), decode_component(value)) {
            (Ok(key), Ok(value)) => {
                map.entry(key).or_insert(value);
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(segment, error = %err, "skipping undecodable parameter");
            }
        }
    }
    map
}

/// Split a segment on every `=`, drop trailing empty pieces, and accept it
/// only when exactly two pieces remain. `k=` and `a=b=c` are rejected.
fn split_pair(segment: &str) -> Option<(&str, &str)> {
    let mut pieces: Vec<&str> = segment.split('=').collect();
    while pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    match pieces.as_slice() {
        [key, value] => Some((*key, *value)),
        _ => None,
    }
}

/// Percent-decode one component as UTF-8, treating `+` as a space.
pub fn decode_component(component: &str) -> Result<String, DecodeError> {
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(DecodeError::MalformedEscape { offset: i });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8)
}
