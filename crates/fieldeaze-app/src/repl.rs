//! Terminal line handling: slash commands and message rendering.

use fieldeaze_chat::{Message, Sender};

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyCommand {
    /// Text sent to the assistant as typed.
    Say(String),
    /// Tap the 1-based quick reply on the latest bot message.
    QuickReply(usize),
    Reset,
    Quit,
    /// A slash command that could not be understood.
    Invalid(String),
}

impl ReplyCommand {
    /// Parse a line. Anything not starting with `/` is a message, so bare
    /// numbers reach the assistant as selections.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return ReplyCommand::Say(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("quit") | Some("exit"), None, None) => ReplyCommand::Quit,
            (Some("reset"), None, None) => ReplyCommand::Reset,
            (Some("qr"), Some(n), None) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => ReplyCommand::QuickReply(n),
                _ => ReplyCommand::Invalid(format!("'{}' is not a quick reply number", n)),
            },
            _ => ReplyCommand::Invalid(format!("unknown command '{}'", line)),
        }
    }
}

/// Render a message as terminal lines, numbering its quick replies.
pub fn render(message: &Message, assistant_name: &str) -> String {
    let speaker = match message.sender {
        Sender::Bot => assistant_name,
        Sender::User => "You",
    };
    let mut out = format!("{}: {}", speaker, message.text);
    if !message.quick_replies.is_empty() {
        let options: Vec<String> = message
            .quick_replies
            .iter()
            .enumerate()
            .map(|(i, q)| format!("[{}] {}", i + 1, q))
            .collect();
        out.push_str(&format!("\n  {}", options.join("  ")));
    }
    out
}

pub const USAGE: &str =
    "Type a message, /qr N to tap a quick reply, /reset to start over, /quit to exit.";

#[cfg(test)]
mod tests {
    use super::*;
    use fieldeaze_chat::ReplyContext;

    fn bot(text: &str, quick_replies: &[&str]) -> Message {
        Message {
            id: 1,
            text: text.to_string(),
            sender: Sender::Bot,
            quick_replies: quick_replies.iter().map(|s| s.to_string()).collect(),
            context: ReplyContext::None,
            created_at: 0,
        }
    }

    #[test]
    fn test_plain_text_and_numbers_are_messages() {
        assert_eq!(ReplyCommand::parse("hi"), ReplyCommand::Say("hi".to_string()));
        assert_eq!(ReplyCommand::parse(" 2 "), ReplyCommand::Say("2".to_string()));
        assert_eq!(
            ReplyCommand::parse("1, 3"),
            ReplyCommand::Say("1, 3".to_string())
        );
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(ReplyCommand::parse("/quit"), ReplyCommand::Quit);
        assert_eq!(ReplyCommand::parse("/exit"), ReplyCommand::Quit);
        assert_eq!(ReplyCommand::parse("/reset"), ReplyCommand::Reset);
        assert_eq!(ReplyCommand::parse("/qr 2"), ReplyCommand::QuickReply(2));
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(ReplyCommand::parse("/qr"), ReplyCommand::Invalid(_)));
        assert!(matches!(ReplyCommand::parse("/qr 0"), ReplyCommand::Invalid(_)));
        assert!(matches!(ReplyCommand::parse("/qr x"), ReplyCommand::Invalid(_)));
        assert!(matches!(ReplyCommand::parse("/book"), ReplyCommand::Invalid(_)));
    }

    #[test]
    fn test_render_numbers_quick_replies() {
        let out = render(&bot("Hello!", &["Show services", "FAQs"]), "Fieldeaze");
        assert_eq!(out, "Fieldeaze: Hello!\n  [1] Show services  [2] FAQs");
    }

    #[test]
    fn test_render_without_quick_replies() {
        assert_eq!(render(&bot("Bye", &[]), "Fieldeaze"), "Fieldeaze: Bye");
    }
}
