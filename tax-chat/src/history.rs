use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One prior message in the conversation, supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The most recent `max_turns` turns, skipping blank ones.
///
/// Nothing is kept between requests, so the caller's history is the whole
/// conversation and this is the only bound on what goes upstream.
pub fn recent_turns(
    history: &[ChatTurn],
    max_turns: usize,
) -> Vec<ChatTurn> {
    let kept: Vec<&ChatTurn> = history
        .iter()
        .filter(|turn| !turn.content.trim().is_empty())
        .collect();
    let start = kept.len().saturating_sub(max_turns);
    kept[start..].iter().map(|turn| (*turn).clone()).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn conversation(turns: usize) -> Vec<ChatTurn> {
        (0..turns)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("question {i}"))
                } else {
                    ChatTurn::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn short_history_is_kept_whole() {
        let history = conversation(3);

        assert_eq!(recent_turns(&history, 6), history);
    }

    #[test]
    fn long_history_keeps_most_recent() {
        let history = conversation(10);

        let kept = recent_turns(&history, 6);

        assert_eq!(kept.len(), 6);
        assert_eq!(kept[0].content, "question 4");
        assert_eq!(kept[5].content, "answer 9");
    }

    #[test]
    fn blank_turns_do_not_count() {
        let history = vec![
            ChatTurn::user("first"),
            ChatTurn::assistant("   "),
            ChatTurn::user("second"),
        ];

        let kept = recent_turns(&history, 2);

        assert_eq!(kept, vec![ChatTurn::user("first"), ChatTurn::user("second")]);
    }

    #[test]
    fn zero_limit_drops_everything() {
        assert!(recent_turns(&conversation(4), 0).is_empty());
    }

    #[test]
    fn role_deserializes_lowercase() {
        let turn: ChatTurn =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();

        assert_eq!(turn, ChatTurn::assistant("hi"));
    }
}
