/// Upper bound, in bytes, on a retained compile/link info log.
pub const MAX_DIAGNOSTIC_LEN: usize = 512;

const EMPTY_LOG: &str = "(driver returned an empty info log)";

/// Turns a raw info log from a failed compile/link into a non-empty message
/// of at most `MAX_DIAGNOSTIC_LEN` bytes, cut on a char boundary.
pub(crate) fn bounded_diagnostic(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['\0', '\n', '\r', ' ']);
    if trimmed.is_empty() {
        return EMPTY_LOG.to_string();
    }

    if trimmed.len() <= MAX_DIAGNOSTIC_LEN {
        return trimmed.to_string();
    }

    let mut end = MAX_DIAGNOSTIC_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
