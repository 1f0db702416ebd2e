//! Character classes for identifiers and human-readable character names.

/// Symbols that may start (and continue) an identifier, besides letters.
pub const IDENTIFIER_SYMBOLS: &[char] = &[
    '+', '-', '/', '*', '.', ':', '_', '=', '!', '<', '>', '|', '&',
];

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || IDENTIFIER_SYMBOLS.contains(&ch)
}

pub fn is_identifier_continue(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit()
}

// (compact, full, description) for each C0 control character.
const CONTROL_NAMES: [(&str, &str, &str); 32] = [
    ("\\0", "\\0", "null character"),
    ("SOH", "<SOH>", "start of heading"),
    ("STX", "<STX>", "start of text"),
    ("ETX", "<ETX>", "end of text"),
    ("EOT", "<EOT>", "end of transmission"),
    ("ENQ", "<ENQ>", "enquiry"),
    ("ACK", "<ACK>", "acknowledge"),
    ("BEL", "<BEL>", "bell"),
    ("\\b", "\\b", "backspace"),
    ("\\t", "\\t", "horizontal tab"),
    ("\\n", "\\n", "new line"),
    ("\\v", "\\v", "vertical tab"),
    ("\\f", "\\f", "form feed"),
    ("\\r", "\\r", "carriage return"),
    ("SO", "<SO>", "shift out"),
    ("SI", "<SI>", "shift in"),
    ("DLE", "<DLE>", "data link escape"),
    ("DC1", "<DC1>", "device control 1"),
    ("DC2", "<DC2>", "device control 2"),
    ("DC3", "<DC3>", "device control 3"),
    ("DC4", "<DC4>", "device control 4"),
    ("NAK", "<NAK>", "negative acknowledge"),
    ("SYN", "<SYN>", "synchronous idle"),
    ("ETB", "<ETB>", "end of transmission block"),
    ("CAN", "<CAN>", "cancel"),
    ("EM", "<EM>", "end of medium"),
    ("SUB", "<SUB>", "substitute"),
    ("ESC", "<ESC>", "escape"),
    ("FS", "<FS>", "file separator"),
    ("GS", "<GS>", "group separator"),
    ("RS", "<RS>", "record separator"),
    ("US", "<US>", "unit separator"),
];

/// Describe a character for diagnostics.
///
/// Returns the rendering of the character and a short description of what
/// kind of character it is. Control characters get their conventional
/// names (`<BEL>`, `\t`, ...); `compact` drops the angle brackets. Other
/// non-printable characters are rendered as their decimal code point.
pub fn describe_char(ch: char, compact: bool) -> (String, &'static str) {
    let code = ch as u32;
    if code < 32 {
        let (short, full, desc) = CONTROL_NAMES[code as usize];
        let shown = if compact { short } else { full };
        return (shown.to_string(), desc);
    }
    if code == 127 {
        let shown = if compact { "DEL" } else { "<DEL>" };
        return (shown.to_string(), "delete");
    }
    if ch.is_control() || (ch.is_whitespace() && ch != ' ') {
        let shown = if compact {
            code.to_string()
        } else {
            format!("<{code}>")
        };
        return (shown, "non-printable");
    }
    (ch.to_string(), "printable")
}

/// Render every character of `s` in its printable form.
pub fn printable(s: &str) -> String {
    s.chars().map(|c| describe_char(c, false).0).collect()
}
