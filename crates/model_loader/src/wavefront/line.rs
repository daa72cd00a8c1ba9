//! Line handling shared by the OBJ and MTL loaders
//!
//! Both formats are line oriented: `#` starts a comment, the first
//! whitespace-delimited token names the directive and the remainder of
//! the line is the directive's data payload.

/// Strip a `#` comment from a line.
pub fn strip_comments(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split a line into its directive token and data payload.
///
/// Returns `None` for lines with no directive (blank after comment
/// stripping). The payload is trimmed; a directive with no payload yields
/// an empty payload.
pub fn split_directive(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((directive, data)) => Some((directive, data.trim())),
        None => Some((trimmed, "")),
    }
}
