use std::sync::LazyLock;

use regex::Regex;

// A line that opens a scripted turn, e.g. "User: ..." or "  assistant:".
static MOCK_TURN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:user|assistant)[ \t]*:").expect("mock turn pattern is valid")
});

static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A\s*assistant[ \t]*:[ \t]*").expect("leading label pattern is valid")
});

/// Cleans a model reply before it is returned to the client.
///
/// A leading `Assistant:` label is dropped, and everything from the first
/// line that starts a further `User:` or `Assistant:` turn is cut, so an
/// invented continuation of the conversation never reaches the user.
pub fn sanitize_reply(reply: &str) -> String {
    let body = LEADING_LABEL.replace(reply, "");
    let cut = MOCK_TURN.find(&body).map_or(body.len(), |m| m.start());
    body[..cut].trim().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_reply_is_trimmed_only() {
        assert_eq!(
            sanitize_reply("  Lodge by 31 October.\n"),
            "Lodge by 31 October."
        );
    }

    #[test]
    fn cuts_at_first_mock_turn() {
        let reply = "Lodge by 31 October.\nUser: thanks!\nAssistant: You're welcome.";

        assert_eq!(sanitize_reply(reply), "Lodge by 31 October.");
    }

    #[test]
    fn mock_turn_match_is_case_insensitive_and_indented() {
        let reply = "The levy is 2%.\n   ASSISTANT : anything else?";

        assert_eq!(sanitize_reply(reply), "The levy is 2%.");
    }

    #[test]
    fn leading_assistant_label_is_removed() {
        let reply = "Assistant: The levy is 2%.\nUser: and the surcharge?";

        assert_eq!(sanitize_reply(reply), "The levy is 2%.");
    }

    #[test]
    fn role_words_mid_line_are_kept() {
        let reply = "Every user: should keep records for five years.";

        assert_eq!(sanitize_reply(reply), reply);
    }

    #[test]
    fn reply_that_is_only_a_mock_turn_becomes_empty() {
        assert_eq!(sanitize_reply("User: what about GST?"), "");
    }
}
