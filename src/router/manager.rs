use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::assembler::{assemble, Route};
use super::classifier::is_org_related;
use super::sanitizer::sanitize;
use super::stall::should_stop;
use crate::agents::{
    AgentFactory, ChatMessage, ChatOptions, ChatResult, ConversableAgent, SummaryMethod, UserProxy,
};
use crate::app::Config;
use crate::constants::COORDINATOR_TERMINATION;
use crate::docs::DocumentStore;
use crate::utils::{MentorError, MentorResult, Tokenizer};

/// What one user prompt produced
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// `None` for home page conversations
    pub route: Option<Route>,
    /// Messages safe to show, in order
    pub messages: Vec<ChatMessage>,
    /// Summary of the agent conversation
    pub summary: String,
    /// Whether the stall guard appended its synthetic message
    pub stalled: bool,
}

/// Routes prompts to the right agent with document context and cleans up the result
pub struct ChatManager {
    config: Arc<Config>,
    store: DocumentStore,
    graph_agent: Option<ConversableAgent>,
    text_agent: Option<ConversableAgent>,
    coordinator: Option<ConversableAgent>,
    user_proxy: UserProxy,
    coordinator_proxy: UserProxy,
    graph_tokenizer: Tokenizer,
    text_tokenizer: Tokenizer,
}

impl ChatManager {
    /// Build all agents from configuration. An agent whose API key is missing is
    /// left out and reported when a prompt needs it.
    pub fn new(config: Arc<Config>) -> MentorResult<Self> {
        let graph_agent = optional(AgentFactory::create_graph_agent(&config))?;
        let text_agent = optional(AgentFactory::create_text_agent(&config))?;
        let coordinator = optional(AgentFactory::create_coordinator_agent(&config))?;
        let store = DocumentStore::from_config(&config.documents);

        Ok(Self::with_agents(config, store, graph_agent, text_agent, coordinator))
    }

    /// Build a manager over explicit agents
    pub fn with_agents(
        config: Arc<Config>,
        store: DocumentStore,
        graph_agent: Option<ConversableAgent>,
        text_agent: Option<ConversableAgent>,
        coordinator: Option<ConversableAgent>,
    ) -> Self {
        Self {
            user_proxy: AgentFactory::create_user_proxy(&config),
            coordinator_proxy: AgentFactory::create_coordinator_proxy(),
            graph_tokenizer: Tokenizer::new(&config.agents.graph.model),
            text_tokenizer: Tokenizer::new(&config.agents.text.model),
            config,
            store,
            graph_agent,
            text_agent,
            coordinator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tokenizer matching the model of the agent that answers `route`
    fn tokenizer(&self, route: Route) -> &Tokenizer {
        match route {
            Route::Org => &self.graph_tokenizer,
            Route::Personal => &self.text_tokenizer,
        }
    }

    /// Answer a prompt from the org charts or the personal notes
    pub async fn generate_response(
        &self,
        prompt: &str,
        language: Option<&str>,
    ) -> MentorResult<ChatResponse> {
        let docs = self.store.load()?;
        let route = Route::from_classification(is_org_related(prompt, &self.config.routing.org_keywords));
        let final_prompt = assemble(route, &docs, prompt);

        let tokenizer = self.tokenizer(route);
        let tokens = tokenizer.count_tokens(&final_prompt);
        let limit = self
            .config
            .context
            .max_context_tokens
            .min(tokenizer.context_window());
        info!(?route, tokens, "Routing prompt");
        if tokens > limit {
            warn!(
                tokens,
                limit,
                "Assembled context is larger than the configured limit"
            );
        }

        let agent = match route {
            Route::Org => self.require(&self.graph_agent, &self.config.agents.graph.api_key_env)?,
            Route::Personal => self.require(&self.text_agent, &self.config.agents.text.api_key_env)?,
        };

        let options = ChatOptions {
            max_turns: Some(1),
            summary_method: SummaryMethod::ReflectionWithLlm,
            language: language.map(str::to_string),
        };
        let mut result = self.dispatch(&self.user_proxy, agent, final_prompt, &options).await?;

        let stalled = should_stop(&result.chat_history, &self.config.routing.termination_phrases);
        if stalled {
            warn!(agent = agent.name(), "Agent is stuck on generic answers");
            result
                .chat_history
                .push(ChatMessage::new(route.agent_role(), route.stall_message()));
        }

        Ok(ChatResponse {
            route: Some(route),
            messages: sanitize(result.chat_history, &self.config.routing.leak_markers),
            summary: result.summary,
            stalled,
        })
    }

    /// Answer a question about the application itself
    pub async fn home_response(
        &self,
        prompt: &str,
        language: Option<&str>,
    ) -> MentorResult<ChatResponse> {
        let agent = self.require(&self.coordinator, &self.config.agents.coordinator.api_key_env)?;
        let message = format!("I would like to know '{}'", prompt);
        let options = ChatOptions {
            max_turns: None,
            summary_method: SummaryMethod::LastMessage,
            language: language.map(str::to_string),
        };

        let result = self.dispatch(&self.coordinator_proxy, agent, message, &options).await?;

        // Nothing from the closing message onwards is shown
        let messages = result
            .chat_history
            .into_iter()
            .take_while(|m| !m.content.contains(COORDINATOR_TERMINATION))
            .collect();

        Ok(ChatResponse {
            route: None,
            messages,
            summary: result.summary,
            stalled: false,
        })
    }

    /// Run one proxy conversation under the configured time limit
    async fn dispatch(
        &self,
        proxy: &UserProxy,
        agent: &ConversableAgent,
        message: String,
        options: &ChatOptions,
    ) -> MentorResult<ChatResult> {
        let secs = self.config.llm.agent_timeout_secs;
        tokio::time::timeout(
            Duration::from_secs(secs),
            proxy.initiate_chat(agent, message, options),
        )
        .await
        .map_err(|_| MentorError::Timeout(secs))?
    }

    fn require<'a>(
        &self,
        agent: &'a Option<ConversableAgent>,
        key_env: &str,
    ) -> MentorResult<&'a ConversableAgent> {
        agent
            .as_ref()
            .ok_or_else(|| MentorError::MissingApiKey(key_env.to_string()))
    }
}

/// A missing API key disables one agent instead of the whole application
fn optional(result: MentorResult<ConversableAgent>) -> MentorResult<Option<ConversableAgent>> {
    match result {
        Ok(agent) => Ok(Some(agent)),
        Err(MentorError::MissingApiKey(key)) => {
            warn!("{} is not set; the agent using it is disabled", key);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Role;
    use crate::models::{ApiRole, MockModel, ModelResponse};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn response(text: &str) -> ModelResponse {
        ModelResponse {
            content: text.to_string(),
            usage: None,
            model_name: "mock".to_string(),
        }
    }

    /// A backend that gives the same answer to every call
    fn always(text: &'static str) -> Box<MockModel> {
        let mut model = MockModel::new();
        model.expect_chat().returning(move |_, _| Ok(response(text)));
        Box::new(model)
    }

    fn workspace() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let org = temp_dir.path().join("org");
        let personal = temp_dir.path().join("personal");
        fs::create_dir_all(&org).unwrap();
        fs::create_dir_all(&personal).unwrap();
        fs::write(org.join("chart.md"), "```mermaid\ngraph TD; A-->B\n```\n").unwrap();
        fs::write(personal.join("day1.md"), "Met Carol from HR.").unwrap();
        temp_dir
    }

    fn manager(
        dir: &TempDir,
        graph: Box<MockModel>,
        text: Box<MockModel>,
        coordinator: Option<Box<MockModel>>,
    ) -> ChatManager {
        let config = Arc::new(Config::default());
        let store = DocumentStore::new(dir.path().join("personal"), dir.path().join("org"));
        ChatManager::with_agents(
            config.clone(),
            store,
            Some(AgentFactory::graph_agent(graph, &config)),
            Some(AgentFactory::text_agent(text, &config)),
            coordinator.map(|m| AgentFactory::coordinator_agent(m, &config)),
        )
    }

    #[tokio::test]
    async fn test_org_prompt_goes_to_graph_agent_with_diagrams() {
        let dir = workspace();
        let mut graph = MockModel::new();
        graph
            .expect_chat()
            .withf(|messages, _| {
                messages
                    .iter()
                    .any(|m| m.role == ApiRole::User && m.content.contains("graph TD; A-->B"))
            })
            .times(2)
            .returning(|_, _| Ok(response("B reports to A.")));

        let manager = manager(&dir, Box::new(graph), Box::new(MockModel::new()), None);
        let reply = manager
            .generate_response("Who does B report to?", Some("English"))
            .await
            .unwrap();

        assert_eq!(reply.route, Some(Route::Org));
        assert!(!reply.stalled);
        assert_eq!(reply.summary, "B reports to A.");
        // The injected prompt is hidden; only the answer remains
        assert_eq!(
            reply.messages,
            vec![ChatMessage::new(Role::GraphAgent, "B reports to A.")]
        );
    }

    #[tokio::test]
    async fn test_personal_prompt_goes_to_text_agent() {
        let dir = workspace();
        let mut text = MockModel::new();
        text.expect_chat()
            .withf(|messages, _| messages.iter().any(|m| m.content.contains("# day1.md\nMet Carol from HR.")))
            .returning(|_, _| Ok(response("You met Carol.")));

        let manager = manager(&dir, Box::new(MockModel::new()), Box::new(text), None);
        let reply = manager.generate_response("Who did I meet?", None).await.unwrap();

        assert_eq!(reply.route, Some(Route::Personal));
        assert_eq!(reply.messages, vec![ChatMessage::new(Role::TextAgent, "You met Carol.")]);
    }

    #[tokio::test]
    async fn test_generic_answers_append_stall_message() {
        let dir = workspace();
        let manager = manager(
            &dir,
            always("I am sorry, please clarify"),
            Box::new(MockModel::new()),
            None,
        );

        let reply = manager.generate_response("Who leads the team?", None).await.unwrap();
        assert!(reply.stalled);
        assert_eq!(
            reply.messages.last(),
            Some(&ChatMessage::new(
                Role::GraphAgent,
                "Ending the chat as no relevant answer can be provided."
            ))
        );
    }

    #[tokio::test]
    async fn test_generic_personal_answers_end_with_text_agent() {
        let dir = workspace();
        let manager = manager(
            &dir,
            Box::new(MockModel::new()),
            always("I am sorry, please clarify"),
            None,
        );

        let reply = manager.generate_response("What did I do on day one?", None).await.unwrap();
        assert_eq!(reply.route, Some(Route::Personal));
        assert!(reply.stalled);
        assert_eq!(
            reply.messages.last(),
            Some(&ChatMessage::new(
                Role::TextAgent,
                "Ending the chat as no helpful answer can be provided."
            ))
        );
    }

    #[test]
    fn test_token_budget_follows_routed_model() {
        let dir = workspace();
        let mut config = Config::default();
        config.agents.text.model = "gpt-4".to_string();
        let store = DocumentStore::new(dir.path().join("personal"), dir.path().join("org"));
        let manager = ChatManager::with_agents(Arc::new(config), store, None, None, None);

        assert_eq!(manager.tokenizer(Route::Org).context_window(), 1_048_576);
        assert_eq!(manager.tokenizer(Route::Personal).context_window(), 8192);
    }

    #[tokio::test]
    async fn test_leaked_diagram_reply_is_hidden() {
        let dir = workspace();
        let manager = manager(
            &dir,
            always("Here it is:\n```mermaid\ngraph TD; A-->B\n```"),
            Box::new(MockModel::new()),
            None,
        );

        let reply = manager.generate_response("Show the org chart", None).await.unwrap();
        assert!(reply.messages.is_empty());
    }

    #[tokio::test]
    async fn test_missing_agent_reports_its_key() {
        let dir = workspace();
        let config = Arc::new(Config::default());
        let store = DocumentStore::new(dir.path().join("personal"), dir.path().join("org"));
        let manager = ChatManager::with_agents(config, store, None, None, None);

        let err = manager.generate_response("my notes", None).await.unwrap_err();
        assert!(matches!(err, MentorError::MissingApiKey(key) if key == "GEMINI1_API_KEY"));
    }

    #[tokio::test]
    async fn test_home_response_hides_closing_message() {
        let dir = workspace();
        let mut coordinator = MockModel::new();
        let mut calls = 0;
        coordinator.expect_chat().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(response("Start with the RAG Agent Space page."))
            } else {
                Ok(response("Glad to help. ALL DONE"))
            }
        });

        let manager = manager(
            &dir,
            Box::new(MockModel::new()),
            Box::new(MockModel::new()),
            Some(Box::new(coordinator)),
        );
        let reply = manager.home_response("How should I start?", None).await.unwrap();

        let contents: Vec<&str> = reply.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "I would like to know 'How should I start?'",
                "Start with the RAG Agent Space page.",
                "",
            ]
        );
        assert!(reply.route.is_none());
    }
}
