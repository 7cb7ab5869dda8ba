//! CTCP framing inside PRIVMSG and NOTICE text

const DELIM: char = '\x01';

/// A CTCP request carried in a message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctcp<'a> {
    pub command: &'a str,
    pub params: &'a str,
}

/// Split a CTCP request out of a message body, if it is one.
///
/// The closing delimiter is optional; some clients omit it.
pub fn parse(text: &str) -> Option<Ctcp<'_>> {
    let inner = text.strip_prefix(DELIM)?;
    let inner = inner.strip_suffix(DELIM).unwrap_or(inner);
    let (command, params) = inner.split_once(' ').unwrap_or((inner, ""));
    (!command.is_empty()).then_some(Ctcp { command, params })
}

/// Wrap a CTCP request for sending
pub fn format(command: &str, params: &str) -> String {
    if params.is_empty() {
        format!("{DELIM}{command}{DELIM}")
    } else {
        format!("{DELIM}{command} {params}{DELIM}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action() {
        assert_eq!(
            parse("\x01ACTION waves\x01"),
            Some(Ctcp { command: "ACTION", params: "waves" })
        );
        assert_eq!(
            parse("\x01ACTION waves"),
            Some(Ctcp { command: "ACTION", params: "waves" })
        );
        assert_eq!(parse("\x01VERSION\x01"), Some(Ctcp { command: "VERSION", params: "" }));
    }

    #[test]
    fn plain_text() {
        assert_eq!(parse("hello"), None);
        assert_eq!(parse("\x01\x01"), None);
    }

    #[test]
    fn format_action() {
        assert_eq!(format("ACTION", "waves"), "\x01ACTION waves\x01");
    }
}
