use crate::{
    config::RequestConfig,
    generic::ConversationTurn,
    model::{ModelExtrasTable, RequestExtras},
};

/// Provider-neutral description of one streaming completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ConversationTurn>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub extras: RequestExtras,
}

impl ChatRequest {
    /// Build the outbound request for `history`.
    ///
    /// Non-blank system instructions become a leading system turn. A trailing
    /// placeholder (empty assistant turn) is dropped since it only exists to
    /// be filled by this very request.
    pub fn from_history(
        history: &[ConversationTurn],
        config: &RequestConfig,
        extras: &ModelExtrasTable,
    ) -> Self {
        let turns = match history.split_last() {
            Some((last, rest)) if last.is_placeholder() => rest,
            _ => history,
        };

        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(instructions) = config
            .system_instructions()
            .filter(|text| !text.trim().is_empty())
        {
            messages.push(ConversationTurn::system(instructions));
        }
        messages.extend(turns.iter().cloned());

        Self {
            model: config.model().to_owned(),
            messages,
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
            extras: extras.resolve(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ReasoningEffort,
        generic::Role,
        model::{GPT_OSS_120B, LLAMA_3_3_70B_VERSATILE},
    };

    #[test]
    fn prepends_system_and_drops_placeholder() {
        let history = vec![
            ConversationTurn::user("Hi"),
            ConversationTurn::assistant("Hello!"),
            ConversationTurn::user("How are you?"),
            ConversationTurn::placeholder(),
        ];
        let config = RequestConfig::builder(LLAMA_3_3_70B_VERSATILE)
            .with_system_instructions("Be brief.")
            .build()
            .unwrap();

        let request = ChatRequest::from_history(&history, &config, &ModelExtrasTable::default());

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.messages[0].text, "Be brief.");
        assert_eq!(request.messages[3].text, "How are you?");
    }

    #[test]
    fn blank_instructions_are_not_sent() {
        let history = vec![ConversationTurn::user("Hi"), ConversationTurn::placeholder()];
        let config = RequestConfig::builder(LLAMA_3_3_70B_VERSATILE)
            .with_system_instructions("   \n")
            .build()
            .unwrap();

        let request = ChatRequest::from_history(&history, &config, &ModelExtrasTable::default());

        assert_eq!(request.messages, vec![ConversationTurn::user("Hi")]);
    }

    #[test]
    fn carries_config_and_dispatched_extras() {
        let history = vec![ConversationTurn::user("Hi")];
        let config = RequestConfig::builder(GPT_OSS_120B)
            .with_temperature(0.3)
            .with_max_tokens(512)
            .with_reasoning_effort(ReasoningEffort::Low)
            .build()
            .unwrap();

        let request = ChatRequest::from_history(&history, &config, &ModelExtrasTable::default());

        assert_eq!(request.model, GPT_OSS_120B);
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.extras.reasoning_effort, Some(ReasoningEffort::Low));
        assert_eq!(request.extras.top_p, Some(1.0));
    }
}
