use pages_core::Msg;

use super::constants::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupInput {
    Msg(Msg),
    Show,
    Quit,
    Unknown(String),
}

/// Maps one line typed into the popup to an input event. Field commands keep
/// the rest of the line untrimmed; the workflows trim on submit.
pub fn parse_line(line: &str) -> PopupInput {
    let line = line.trim_end_matches(['\r', '\n']);
    let (command, rest) = match line.trim_start().split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (line.trim(), ""),
    };
    match command {
        CMD_URL => PopupInput::Msg(Msg::UrlChanged(rest.to_string())),
        CMD_QUESTION => PopupInput::Msg(Msg::QuestionChanged(rest.to_string())),
        CMD_SUMMARIZE => PopupInput::Msg(Msg::SummarizeClicked),
        CMD_ASK => PopupInput::Msg(Msg::AskClicked),
        CMD_SHOW => PopupInput::Show,
        CMD_QUIT | "exit" => PopupInput::Quit,
        _ => PopupInput::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use pages_core::Msg;

    use super::{parse_line, PopupInput};

    #[test]
    fn field_commands_carry_rest_of_line() {
        assert_eq!(
            parse_line("url https://example.com\n"),
            PopupInput::Msg(Msg::UrlChanged("https://example.com".into()))
        );
        assert_eq!(
            parse_line("question what is this page about?"),
            PopupInput::Msg(Msg::QuestionChanged("what is this page about?".into()))
        );
        assert_eq!(parse_line("url"), PopupInput::Msg(Msg::UrlChanged(String::new())));
    }

    #[test]
    fn buttons_and_controls() {
        assert_eq!(parse_line("summarize"), PopupInput::Msg(Msg::SummarizeClicked));
        assert_eq!(parse_line("  ask  "), PopupInput::Msg(Msg::AskClicked));
        assert_eq!(parse_line("show"), PopupInput::Show);
        assert_eq!(parse_line("quit"), PopupInput::Quit);
        assert_eq!(parse_line("dance"), PopupInput::Unknown("dance".into()));
    }
}
