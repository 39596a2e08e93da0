//! Sanitizing spreadsheet text for terminal display.
//!
//! Cell contents come from files and shared sheets the user may not control. An
//! ANSI escape sequence inside a term would otherwise be interpreted by the
//! terminal when the term is printed or drawn.

/// Remove ANSI CSI sequences and control characters from `text`.
///
/// Newlines are kept when `keep_newlines` is set (notes pane); single-line
/// fields (terms, CLI output columns) turn them into spaces instead.
///
/// # Examples
///
/// ```
/// use termbase::utils::terminal::sanitize_cell;
///
/// assert_eq!(sanitize_cell("\x1b[31mcorrer\x1b[0m", false), "correr");
/// assert_eq!(sanitize_cell("line 1\nline 2", false), "line 1 line 2");
/// ```
pub fn sanitize_cell(text: &str, keep_newlines: bool) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            // CSI: ESC [ params final-letter
            if chars.peek() == Some(&'[') {
                chars.next();
                for next_ch in chars.by_ref() {
                    if next_ch.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            continue;
        }

        match ch {
            '\n' | '\r' if keep_newlines => result.push(ch),
            '\n' | '\r' | '\t' => result.push(' '),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}
