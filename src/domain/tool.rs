//! Tool and tool parameter types

use serde::{Deserialize, Serialize};

/// Scalar type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
}

/// A single named argument of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(default, rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl ToolParameter {
    pub fn new(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required,
        }
    }
}

/// A named callable capability exposed to the model for function calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ordered parameter list; order is preserved in the mapped schema
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    /// Connection this tool would run against (never invoked)
    #[serde(default, alias = "connection_id", skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

impl Tool {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            connection_id: None,
        }
    }

    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Names of required parameters, in declaration order
    pub fn required_parameters(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_parameters_keep_order() {
        let tool = Tool::new("t2", "update_crm_lead", "Update lead status")
            .with_parameter(ToolParameter::new("email", ParameterType::String, "Customer email", true))
            .with_parameter(ToolParameter::new("notes", ParameterType::String, "Notes", false))
            .with_parameter(ToolParameter::new("score", ParameterType::Number, "Lead score", true));

        assert_eq!(tool.required_parameters(), vec!["email", "score"]);
    }

    #[test]
    fn test_empty_connection_is_omitted() {
        let tool = Tool::new("t1", "check_order_status", "Retrieve tracking details");
        let json = serde_json::to_value(&tool).unwrap();
        assert!(json.get("connectionId").is_none());

        let parsed: Tool = serde_json::from_value(serde_json::json!({
            "name": "lookup",
            "description": "Lookup",
            "parameters": [{"name": "flag", "type": "boolean", "description": "", "required": false}],
            "connectionId": "c1"
        }))
        .unwrap();
        assert_eq!(parsed.parameters[0].param_type, ParameterType::Boolean);
        assert_eq!(parsed.connection_id.as_deref(), Some("c1"));
    }
}
