//! Conversation transcript owned by a single session

use crate::llm::{Message, Role, ToolCall};

/// Ordered, append-only record of one session's conversation.
///
/// Created with the system message already in place and replayed verbatim to
/// the completion service every round.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Add a message to the end
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// True once the model has answered with plain content and no tool requests.
    ///
    /// A transcript holding only the system and user messages never qualifies,
    /// so at least one model round always happens.
    pub fn is_goal_achieved(&self) -> bool {
        if self.messages.len() <= 2 {
            return false;
        }

        matches!(
            self.messages.last(),
            Some(Message::Assistant { tool_calls, .. }) if tool_calls.is_empty()
        )
    }

    /// Text of the last message if it is a non-empty assistant reply
    pub fn final_answer(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role() == Role::Assistant)
            .and_then(Message::text)
            .filter(|text| !text.trim().is_empty())
    }

    /// Tool calls from assistant messages that have no matching tool result yet
    pub fn unresolved_tool_calls(&self) -> Vec<&ToolCall> {
        let resolved: Vec<&str> = self
            .messages
            .iter()
            .filter_map(|m| match m {
                Message::Tool { tool_call_id, .. } => Some(tool_call_id.as_str()),
                _ => None,
            })
            .collect();

        self.messages
            .iter()
            .flat_map(Message::tool_calls)
            .filter(|call| !resolved.contains(&call.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Transcript {
        let mut transcript = Transcript::new("system");
        transcript.append(Message::user("do the thing"));
        transcript
    }

    #[test]
    fn test_new_has_system_message_first() {
        let transcript = Transcript::new("be helpful");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0], Message::system("be helpful"));
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_short_transcripts_never_achieved() {
        let transcript = Transcript::new("system");
        assert!(!transcript.is_goal_achieved());

        let transcript = seeded();
        assert!(!transcript.is_goal_achieved());
    }

    #[test]
    fn test_two_messages_ending_in_assistant_not_achieved() {
        let mut transcript = Transcript::new("system");
        transcript.append(Message::assistant(Some("hi".into()), vec![]));
        assert_eq!(transcript.len(), 2);
        assert!(!transcript.is_goal_achieved());
    }

    #[test]
    fn test_plain_assistant_reply_achieves_goal() {
        let mut transcript = seeded();
        transcript.append(Message::assistant(Some("done".into()), vec![]));
        assert!(transcript.is_goal_achieved());
        assert_eq!(transcript.final_answer(), Some("done"));
    }

    #[test]
    fn test_assistant_with_tool_calls_not_achieved() {
        let mut transcript = seeded();
        transcript.append(Message::assistant(
            None,
            vec![ToolCall::new("c1", "listDirectory", "{}")],
        ));
        assert!(!transcript.is_goal_achieved());
        assert_eq!(transcript.final_answer(), None);
    }

    #[test]
    fn test_last_tool_message_not_achieved() {
        let mut transcript = seeded();
        transcript.append(Message::assistant(
            None,
            vec![ToolCall::new("c1", "listDirectory", "{}")],
        ));
        transcript.append(Message::tool("c1", "listing"));
        assert!(!transcript.is_goal_achieved());
        assert_eq!(transcript.final_answer(), None);
    }

    #[test]
    fn test_empty_assistant_reply_achieves_goal_without_answer() {
        let mut transcript = seeded();
        transcript.append(Message::assistant(None, vec![]));
        assert!(transcript.is_goal_achieved());
        assert_eq!(transcript.final_answer(), None);
    }

    #[test]
    fn test_unresolved_tool_calls() {
        let mut transcript = seeded();
        transcript.append(Message::assistant(
            None,
            vec![
                ToolCall::new("c1", "listDirectory", "{}"),
                ToolCall::new("c2", "readFileContent", "{\"filePath\":\"a\"}"),
            ],
        ));
        assert_eq!(transcript.unresolved_tool_calls().len(), 2);

        transcript.append(Message::tool("c1", "listing"));
        let unresolved = transcript.unresolved_tool_calls();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].id, "c2");

        transcript.append(Message::tool("c2", "content"));
        assert!(transcript.unresolved_tool_calls().is_empty());
    }
}
