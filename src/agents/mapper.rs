//! Agent request mapper
//!
//! Translates an [`Agent`], its enabled [`Tool`]s and a bounded slice of chat
//! history into a Gemini `generateContent` request, and runs that request
//! once against an [`LlmProvider`].

use tracing::{debug, error};

use super::error::LlmResult;
use super::llm::{
    Content, FunctionDeclaration, GenerateContentRequest, GenerateContentResponse, LlmProvider,
    ParameterSchema, Properties, PropertySchema, SchemaType, ToolDeclarations,
};
use crate::domain::{Agent, Message, ParameterType, Role, Tool};

/// A fully mapped request plus the model it targets
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRequest {
    pub model: String,
    pub body: GenerateContentRequest,
}

fn schema_type(param_type: ParameterType) -> SchemaType {
    match param_type {
        ParameterType::String => SchemaType::String,
        ParameterType::Number => SchemaType::Number,
        ParameterType::Boolean => SchemaType::Boolean,
    }
}

/// One function declaration per tool, same length and order as the input
pub fn map_tools(tools: &[Tool]) -> Vec<FunctionDeclaration> {
    tools
        .iter()
        .map(|tool| FunctionDeclaration {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: ParameterSchema {
                schema_type: SchemaType::Object,
                properties: Properties(
                    tool.parameters
                        .iter()
                        .map(|p| {
                            (
                                p.name.clone(),
                                PropertySchema {
                                    schema_type: schema_type(p.param_type),
                                    description: p.description.clone(),
                                },
                            )
                        })
                        .collect(),
                ),
                required: tool.required_parameters(),
            },
        })
        .collect()
}

/// Map history to turns. Only `model` keeps its role; everything else is sent as `user`.
pub fn map_history(history: &[Message]) -> Vec<Content> {
    history
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::Model => "model",
                Role::User | Role::System | Role::Tool => "user",
            };
            Content::text(role, m.content.clone())
        })
        .collect()
}

pub fn build_request(agent: &Agent, tools: &[Tool], prompt: &str, history: &[Message]) -> AgentRequest {
    let mut contents = map_history(history);
    contents.push(Content::text("user", prompt));

    let declarations = map_tools(tools);
    let tools = if declarations.is_empty() {
        None
    } else {
        Some(vec![ToolDeclarations {
            function_declarations: declarations,
        }])
    };

    let system_instruction = if agent.system_instruction.trim().is_empty() {
        None
    } else {
        Some(Content::instruction(agent.system_instruction.clone()))
    };

    AgentRequest {
        model: agent.model_or_default().to_string(),
        body: GenerateContentRequest {
            contents,
            system_instruction,
            tools,
        },
    }
}

/// Build the request and perform exactly one generation call
pub async fn run_agent(
    provider: &dyn LlmProvider,
    agent: &Agent,
    tools: &[Tool],
    prompt: &str,
    history: &[Message],
) -> LlmResult<GenerateContentResponse> {
    let request = build_request(agent, tools, prompt, history);
    debug!(
        agent_id = %agent.id,
        model = %request.model,
        turns = request.body.contents.len(),
        tools = tools.len(),
        "Sending generateContent request"
    );

    provider
        .generate_content(&request.model, &request.body)
        .await
        .map_err(|e| {
            error!(agent_id = %agent.id, provider = provider.name(), error = %e, "Agent call failed");
            e
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ToolParameter, DEFAULT_MODEL};

    fn sample_tools() -> Vec<Tool> {
        vec![
            Tool::new("t1", "check_order_status", "Retrieve tracking details").with_parameter(
                ToolParameter::new("order_id", ParameterType::String, "The order ID", true),
            ),
            Tool::new("t2", "update_crm_lead", "Update lead status")
                .with_parameter(ToolParameter::new("email", ParameterType::String, "Customer email", true))
                .with_parameter(ToolParameter::new("notes", ParameterType::String, "Notes", false))
                .with_parameter(ToolParameter::new("hot", ParameterType::Boolean, "Hot lead", true)),
        ]
    }

    #[test]
    fn test_map_tools_preserves_length_and_order() {
        let declarations = map_tools(&sample_tools());
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].name, "check_order_status");
        assert_eq!(declarations[1].name, "update_crm_lead");

        let schema = &declarations[1].parameters;
        assert_eq!(schema.schema_type, SchemaType::Object);
        assert_eq!(schema.required, vec!["email", "hot"]);
        assert_eq!(schema.properties.names().collect::<Vec<_>>(), vec!["email", "notes", "hot"]);
        assert_eq!(schema.properties.get("hot").unwrap().schema_type, SchemaType::Boolean);
    }

    #[test]
    fn test_tool_without_parameters() {
        let declarations = map_tools(&[Tool::new("t9", "ping", "Ping")]);
        let json = serde_json::to_value(&declarations[0]).unwrap();
        assert_eq!(json["parameters"]["type"], "OBJECT");
        assert_eq!(json["parameters"]["properties"], serde_json::json!({}));
        assert_eq!(json["parameters"]["required"], serde_json::json!([]));
    }

    #[test]
    fn test_non_model_roles_become_user() {
        let mut tool_msg = Message::user("tool output");
        tool_msg.role = Role::Tool;
        let history = vec![
            Message::user("hi"),
            Message::model("hello"),
            Message::system("Error communicating with agent. Check API logs."),
            tool_msg,
        ];
        let roles: Vec<_> = map_history(&history)
            .into_iter()
            .map(|c| c.role.unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user", "user"]);
    }

    #[test]
    fn test_build_request_appends_prompt() {
        let agent = Agent::new("1", "Support");
        let history = vec![Message::user("a"), Message::model("b"), Message::user("c")];
        let request = build_request(&agent, &[], "where is my order?", &history);

        assert_eq!(request.body.contents.len(), history.len() + 1);
        let last = request.body.contents.last().unwrap();
        assert_eq!(last.role.as_deref(), Some("user"));
        assert_eq!(last.parts[0].text.as_deref(), Some("where is my order?"));
    }

    #[test]
    fn test_no_enabled_tools_omits_tools_field() {
        let agent = Agent::new("1", "Support");
        let request = build_request(&agent, &[], "hi", &[]);
        let json = serde_json::to_value(&request.body).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_tools_and_instruction_are_wrapped() {
        let mut agent = Agent::new("2", "Orchestrator Pro");
        agent.system_instruction = "You are a Super Agent.".to_string();
        agent.model = String::new();
        let request = build_request(&agent, &sample_tools(), "go", &[]);

        assert_eq!(request.model, DEFAULT_MODEL);
        let json = serde_json::to_value(&request.body).unwrap();
        assert_eq!(json["tools"][0]["functionDeclarations"][0]["name"], "check_order_status");
        assert_eq!(
            json["tools"][0]["functionDeclarations"][0]["parameters"]["properties"]["order_id"]["type"],
            "STRING"
        );
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are a Super Agent.");
    }
}
