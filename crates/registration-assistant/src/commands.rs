//! Terminal input parsing.

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// `/quit` or `/exit`
    Quit,
    /// `/clear` - forget the conversation
    Clear,
    /// Any other `/command`
    Unknown(&'a str),
    /// Blank line
    Empty,
    /// Text for the assistant
    Message(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();

        if line.is_empty() {
            return Input::Empty;
        }

        if !line.starts_with('/') {
            return Input::Message(line);
        }

        match line.to_lowercase().as_str() {
            "/quit" | "/exit" => Input::Quit,
            "/clear" => Input::Clear,
            _ => Input::Unknown(line),
        }
    }
}

/// Shown at startup and for unknown commands.
pub const HELP_TEXT: &str = "Type a message to talk to the registration assistant.\n\
Commands: /clear resets the conversation, /quit or /exit leaves.";

/// Shown when Ctrl-C arrives while a request is in flight.
pub const INTERRUPTED_TEXT: &str = "Interrupted. A registration that was already being saved may \
still have been stored; list registrations on the next run to check.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Input::parse("/quit"), Input::Quit);
        assert_eq!(Input::parse("/exit"), Input::Quit);
        assert_eq!(Input::parse("  /EXIT  "), Input::Quit);
        assert_eq!(Input::parse("/clear"), Input::Clear);
        assert_eq!(Input::parse("/help"), Input::Unknown("/help"));
    }

    #[test]
    fn test_parse_messages() {
        assert_eq!(Input::parse(""), Input::Empty);
        assert_eq!(Input::parse("   \n"), Input::Empty);
        assert_eq!(
            Input::parse(" Register Jane, jane@test.com \n"),
            Input::Message("Register Jane, jane@test.com")
        );
    }
}
