//! Markup stripping and whitespace normalization for raw unit text.

/// Strips `<...>` markup and collapses whitespace runs to single spaces.
///
/// Tags are assumed not to nest. An unterminated `<` drops everything after
/// it. Characters outside tags and whitespace runs are kept verbatim, so
/// points, cantillation marks and directional controls survive untouched.
pub fn sanitize(raw: &str) -> String {
    let stripped = strip_markup(raw);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
