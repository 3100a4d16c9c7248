use super::agent::ConversableAgent;
use super::proxy::UserProxy;
use super::types::Role;
use crate::app::{AgentSettings, Config};
use crate::constants::{COORDINATOR_MAX_AUTO_REPLY, COORDINATOR_TERMINATION};
use crate::models::{Model, ModelConfig, ModelFactory};
use crate::utils::MentorResult;

const GRAPH_SYSTEM_MESSAGE: &str = "You are a GraphRAG Agent specializing in querying an \
organizational structure stored in a graph DB. Your role is to answer questions about employees, \
such as their email, position, or reporting relationships. Use precise and accurate information \
retrieved from the graph DB. If the query is unclear or the information is unavailable, politely \
explain and ask for clarification.";

const TEXT_SYSTEM_MESSAGE: &str = "You are a TextRAG Agent designed to answer questions based on \
personal markdown notes. Your role is to retrieve relevant information from the notes and provide \
clear, concise answers. Focus on understanding the context of the notes and delivering responses \
that align with the user's intent. If the notes lack relevant information, inform the user and \
suggest rephrasing or providing more details.";

const COORDINATOR_SYSTEM_MESSAGE: &str = "You are a helpful agent coordinator for an onboarding \
website. Your role is to guide new employees through the platform and help them understand how to \
use its features. When users ask questions like 'How should I start with this website?', respond \
with an overview of the site's purpose: 'This website helps you get familiar with your company and \
onboarding process! The website allows you to: 1. Visualize the enterprise culture, 2. Understand \
organization stakeholders, and 3. Grow with the company using your personal note.' Direct users to \
the appropriate pages as follows: - For stakeholder mapping and reporting lines, visit 'RAG Agent \
Space' and put org charts under the org documents folder. - For note-taking, put daily markdown \
notes under the personal documents folder and ask about them in 'RAG Agent Space'. Answer all user \
questions in a concise and helpful way based on this structure. When the user has nothing more to \
ask, end your reply with ALL DONE.";

/// Creates the agents of the application
pub struct AgentFactory;

impl AgentFactory {
    /// Organization-structure agent over an explicit backend
    pub fn graph_agent(model: Box<dyn Model>, config: &Config) -> ConversableAgent {
        ConversableAgent::new(
            Role::GraphAgent,
            GRAPH_SYSTEM_MESSAGE,
            model,
            model_config(&config.agents.graph, config),
        )
    }

    /// Personal-notes agent over an explicit backend
    pub fn text_agent(model: Box<dyn Model>, config: &Config) -> ConversableAgent {
        ConversableAgent::new(
            Role::TextAgent,
            TEXT_SYSTEM_MESSAGE,
            model,
            model_config(&config.agents.text, config),
        )
    }

    /// Home page coordinator over an explicit backend
    pub fn coordinator_agent(model: Box<dyn Model>, config: &Config) -> ConversableAgent {
        ConversableAgent::new(
            Role::Assistant,
            COORDINATOR_SYSTEM_MESSAGE,
            model,
            model_config(&config.agents.coordinator, config),
        )
        .with_max_consecutive_auto_reply(COORDINATOR_MAX_AUTO_REPLY)
    }

    pub fn create_graph_agent(config: &Config) -> MentorResult<ConversableAgent> {
        let model = ModelFactory::create(&config.agents.graph, &config.llm)?;
        Ok(Self::graph_agent(model, config))
    }

    pub fn create_text_agent(config: &Config) -> MentorResult<ConversableAgent> {
        let model = ModelFactory::create(&config.agents.text, &config.llm)?;
        Ok(Self::text_agent(model, config))
    }

    pub fn create_coordinator_agent(config: &Config) -> MentorResult<ConversableAgent> {
        let model = ModelFactory::create(&config.agents.coordinator, &config.llm)?;
        Ok(Self::coordinator_agent(model, config))
    }

    /// Proxy for the document agents: any generic-failure phrase ends the exchange
    pub fn create_user_proxy(config: &Config) -> UserProxy {
        UserProxy::terminating_on_phrases(&config.routing.termination_phrases)
    }

    /// Proxy for the home page coordinator
    pub fn create_coordinator_proxy() -> UserProxy {
        UserProxy::terminating_on(COORDINATOR_TERMINATION)
    }
}

fn model_config(settings: &AgentSettings, config: &Config) -> ModelConfig {
    ModelConfig::from_settings(settings, config.llm.seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ChatMessage;
    use crate::models::MockModel;

    #[test]
    fn test_agents_carry_their_roles() {
        let config = Config::default();
        let graph = AgentFactory::graph_agent(Box::new(MockModel::new()), &config);
        let text = AgentFactory::text_agent(Box::new(MockModel::new()), &config);
        let coordinator = AgentFactory::coordinator_agent(Box::new(MockModel::new()), &config);

        assert_eq!(graph.name(), "GraphRAG_Agent");
        assert_eq!(text.name(), "TextRAG_Agent");
        assert_eq!(coordinator.role(), Role::Assistant);
        assert_eq!(coordinator.max_consecutive_auto_reply(), Some(2));
        assert!(graph.system_message().contains("reporting relationships"));
    }

    #[test]
    fn test_user_proxy_uses_configured_phrases() {
        let proxy = AgentFactory::create_user_proxy(&Config::default());
        assert!(proxy.is_termination_msg(&ChatMessage::new(Role::GraphAgent, "Could you please clarify?")));
        assert!(!proxy.is_termination_msg(&ChatMessage::new(Role::GraphAgent, "Dana manages Sales.")));
    }
}
