// Claude-backed gateway: transcript mapping, module system prompt, one call

use async_trait::async_trait;
use std::time::Duration;

use super::{GatewayError, LlmGateway};
use crate::claude::{self, ClaudeClient, MessageRequest};
use crate::coaching::{self, ModuleType};
use crate::engine::{Message, Role};

/// Build the system prompt for a module: coaching persona, module goals and a
/// short header naming the active module, its role title and focus.
pub fn module_system_prompt(module: ModuleType) -> String {
    let role = coaching::role(module);
    let description = coaching::focus_description(module);

    format!(
        "{base}\n\n\
         ## Current Module Context:\n\
         - Module: {module}\n\
         - Your Role: {role}\n\
         - Module Focus: {description}\n\n\
         Remember to stay in character as a {role} and guide the user through the {module} \
         module using the Story / Solution / Success framework.",
        base = coaching::system_prompt(module),
    )
}

/// Map the session transcript to the two-role API transcript.
///
/// System-role messages are dropped; their content belongs on the system channel.
pub fn to_api_messages(history: &[Message]) -> Vec<claude::Message> {
    history
        .iter()
        .filter_map(|msg| match msg.role {
            Role::System => None,
            Role::User => Some(claude::Message::user(msg.content.clone())),
            Role::Assistant => Some(claude::Message::assistant(msg.content.clone())),
        })
        .collect()
}

pub struct ClaudeGateway {
    client: ClaudeClient,
    max_tokens: u32,
    timeout: Duration,
}

impl ClaudeGateway {
    pub fn new(client: ClaudeClient, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            client,
            max_tokens,
            timeout,
        }
    }
}

#[async_trait]
impl LlmGateway for ClaudeGateway {
    async fn generate(
        &self,
        history: &[Message],
        module: ModuleType,
        model: &str,
    ) -> Result<String, GatewayError> {
        let request = MessageRequest::new(model, to_api_messages(history))
            .with_system(module_system_prompt(module))
            .with_max_tokens(self.max_tokens);

        let response = self
            .client
            .send_message(&request)
            .await
            .map_err(|e| GatewayError::classify(e, model, self.timeout))?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or(GatewayError::NoTextContent)
    }

    fn name(&self) -> &str {
        "claude"
    }
}
