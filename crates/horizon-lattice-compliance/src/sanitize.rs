//! Identifier-safe string normalization.
//!
//! Every name that ends up inside a generated identifier passes through
//! [`sanitize`] (one breadcrumb segment) or [`sanitize_path`] (a dotted exact
//! name). Both are total: any input, including the empty string, unicode-only
//! text and very long names, yields a usable token.
//!
//! # Output alphabet
//!
//! A sanitized segment contains only ASCII letters, digits and `_`. The `.`
//! character is reserved for joining breadcrumb segments, so a dot inside a
//! user-supplied name is replaced like any other punctuation.
//!
//! ```
//! use horizon_lattice_compliance::sanitize::{DEFAULT_MAX_LENGTH, sanitize};
//!
//! assert_eq!(sanitize("Save Draft", DEFAULT_MAX_LENGTH), "Save_Draft");
//! assert_eq!(sanitize("Café.Menu", DEFAULT_MAX_LENGTH), "Cafe_Menu");
//! assert_eq!(sanitize("", DEFAULT_MAX_LENGTH), "unnamed");
//! ```

use sha1::{Digest, Sha1};

/// Token substituted for names that are empty or whitespace-only.
pub const PLACEHOLDER: &str = "unnamed";

/// Default upper bound on a single sanitized segment, in bytes.
pub const DEFAULT_MAX_LENGTH: usize = 64;

/// Smallest bound the sanitizer honours.
///
/// Requested bounds below this are raised to it so that a truncated name
/// always keeps a readable prefix in front of its hash suffix.
pub const MIN_LENGTH: usize = 16;

/// Number of hex characters in a content-derived suffix.
const HASH_LEN: usize = 8;

const REPLACEMENT: char = '_';
const SEPARATOR: char = '.';

/// Sanitize one identifier segment.
///
/// - Empty or whitespace-only input becomes [`PLACEHOLDER`].
/// - Non-ASCII letters are transliterated where a mapping exists, combining
///   marks are dropped, everything else becomes `_`.
/// - Runs of `_` collapse to one and leading/trailing `_` are removed.
/// - Input that had content but nothing survives becomes
///   `unnamed_<hash>` so two different unicode-only names stay distinct.
/// - Results longer than `max_length` are cut and given an `_<hash>` suffix
///   derived from the full sanitized string.
pub fn sanitize(raw: &str, max_length: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER.to_string();
    }

    let body = normalize(trimmed);
    if body.is_empty() {
        return format!("{PLACEHOLDER}_{}", short_hash(trimmed));
    }

    bound(body, max_length)
}

/// Sanitize a dotted name, keeping `.` as a separator.
///
/// Each dot-separated piece is sanitized on its own and empty pieces are
/// dropped, so `"login..submit."` becomes `"login.submit"`. The joined result
/// is bounded by `max_length` as a whole.
pub fn sanitize_path(raw: &str, max_length: usize) -> String {
    let pieces: Vec<String> = raw
        .split(SEPARATOR)
        .filter(|piece| !piece.trim().is_empty())
        .map(|piece| sanitize(piece, max_length))
        .collect();

    if pieces.is_empty() {
        return PLACEHOLDER.to_string();
    }

    bound(pieces.join("."), max_length)
}

/// Returns `true` if `s` is already in sanitized segment form.
pub fn is_sanitized(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(REPLACEMENT)
        && !s.ends_with(REPLACEMENT)
        && !s.contains("__")
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == REPLACEMENT)
}

/// First [`HASH_LEN`] hex characters of the SHA-1 of `text`.
pub(crate) fn short_hash(text: &str) -> String {
    let digest = format!("{:x}", Sha1::digest(text.as_bytes()));
    digest[..HASH_LEN].to_string()
}

fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if is_combining_mark(c) {
            continue;
        } else if !c.is_ascii() && push_transliterated(c, &mut out) {
            continue;
        } else if !out.is_empty() && !out.ends_with(REPLACEMENT) {
            out.push(REPLACEMENT);
        }
    }

    while out.ends_with(REPLACEMENT) {
        out.pop();
    }
    out
}

/// Cut `body` down to `max_length` bytes, appending a hash of the full text.
///
/// `body` is ASCII at this point, so byte slicing is on char boundaries.
fn bound(body: String, max_length: usize) -> String {
    let max_length = max_length.max(MIN_LENGTH);
    if body.len() <= max_length {
        return body;
    }

    let keep = max_length - HASH_LEN - 1;
    let prefix = body[..keep].trim_end_matches([REPLACEMENT, SEPARATOR]);
    format!("{prefix}{REPLACEMENT}{}", short_hash(&body))
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{1AB0}'..='\u{1AFF}' | '\u{20D0}'..='\u{20FF}')
}

/// Push an ASCII spelling of `c`, preserving case. Returns `false` when no
/// mapping exists.
fn push_transliterated(c: char, out: &mut String) -> bool {
    let Some(lower) = c.to_lowercase().next() else {
        return false;
    };

    let mapped = match transliterate(lower) {
        Some(mapped) => mapped,
        None if lower.is_ascii_alphanumeric() => {
            // e.g. U+0130 or the Kelvin sign, which lowercase to ASCII
            out.push(if c.is_uppercase() {
                lower.to_ascii_uppercase()
            } else {
                lower
            });
            return true;
        }
        None => return false,
    };

    if c.is_uppercase() {
        let mut chars = mapped.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    } else {
        out.push_str(mapped);
    }
    true
}

fn transliterate(c: char) -> Option<&'static str> {
    let mapped = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ð' | 'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĳ' => "ij",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        // Greek
        'α' | 'ά' => "a",
        'β' => "b",
        'γ' => "g",
        'δ' => "d",
        'ε' | 'έ' => "e",
        'ζ' => "z",
        'η' | 'ή' => "e",
        'θ' => "th",
        'ι' | 'ί' | 'ϊ' | 'ΐ' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' | 'ό' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' | 'ύ' | 'ϋ' | 'ΰ' => "y",
        'φ' => "ph",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' | 'ώ' => "o",
        _ => return None,
    };
    Some(mapped)
}
