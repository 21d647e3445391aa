//! Error types for the conversational assistant.

/// Errors from validating a submitted message.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
}

/// Why a numbered selection could not be used.
///
/// Never leaves the engine: every variant is turned into a corrective reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{value} is not between 1 and {max}")]
    OutOfRange { value: String, max: usize },
    #[error("'{0}' is not a number")]
    Unparsable(String),
    #[error("no matching option")]
    NoMatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::Disabled.to_string(), "chat is disabled");
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(2000).to_string(),
            "message exceeds maximum length of 2000 characters"
        );
    }

    #[test]
    fn test_selection_error_display() {
        let err = SelectionError::OutOfRange {
            value: "9".to_string(),
            max: 4,
        };
        assert_eq!(err.to_string(), "9 is not between 1 and 4");

        let err = SelectionError::Unparsable("two".to_string());
        assert_eq!(err.to_string(), "'two' is not a number");

        assert_eq!(SelectionError::NoMatch.to_string(), "no matching option");
    }

    #[test]
    fn test_selection_error_negative_value() {
        let err = SelectionError::OutOfRange {
            value: "-3".to_string(),
            max: 2,
        };
        assert!(err.to_string().starts_with("-3"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::MessageTooLong(10));
        assert!(dbg.contains("MessageTooLong"));

        let dbg = format!("{:?}", SelectionError::NoMatch);
        assert!(dbg.contains("NoMatch"));
    }
}
