//! HTML entity decoding for upstream-supplied descriptions.
//!
//! Page descriptions arrive already escaped for HTML. Maud escapes again on
//! output, so they are decoded first to avoid `&amp;amp;` in meta tags.

use std::borrow::Cow;

/// Longest entity name we try to decode before giving up.
const MAX_ENTITY_LEN: usize = 10;

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => None,
    }
}

fn numeric_entity(body: &str) -> Option<char> {
    let code = match body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse().ok()?,
    };
    char::from_u32(code)
}

/// Decode named (`&amp;`, `&lt;`, ...) and numeric (`&#39;`, `&#x27;`) entities.
///
/// Anything that doesn't parse as an entity is left as written.
pub fn unescape_html(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN)
            .and_then(|end| {
                let name = &after[..end];
                let c = match name.strip_prefix('#') {
                    Some(num) => numeric_entity(num),
                    None => named_entity(name),
                };
                c.map(|c| (c, end))
            });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
