//! File and directory name sanitization.

const MAX_NAME_LEN: usize = 200;

/// Make `name` safe as a single path component.
///
/// Control characters are dropped, the reserved set `< > : " / \ | ? *` maps
/// to `_`, length is capped at 200 bytes, and surrounding spaces, dots and
/// underscores are trimmed. May return an empty string; callers fall back to
/// their next candidate.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::new();
    for c in name.trim().chars() {
        if (c as u32) < 32 || c as u32 == 127 {
            continue;
        }
        match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => out.push('_'),
            _ => out.push(c),
        }
        if out.len() >= MAX_NAME_LEN {
            break;
        }
    }

    out.trim_matches(|c| c == ' ' || c == '.' || c == '_')
        .to_string()
}
