//! Request/response bodies of the agent HTTP API.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct IdObject {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolPayload {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentRequest<'a> {
    pub name: &'a str,
    pub model: &'a str,
    pub instructions: &'a str,
    pub tools: Vec<ToolPayload>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    InputText { text: &'a str },
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentPayload<'a> {
    pub file_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub role: &'a str,
    pub content: Vec<ContentPart<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentPayload<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRunRequest<'a> {
    pub agent_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunObject {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub last_error: Option<LastError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    OutputText {
        text: String,
    },
    OutputFile {
        file_id: String,
        #[serde(default)]
        filename: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_request_shape() {
        let req = CreateMessageRequest {
            role: "user",
            content: vec![ContentPart::InputText { text: "why?" }],
            attachments: vec![AttachmentPayload { file_id: "file-1" }],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "role": "user",
                "content": [{"type": "input_text", "text": "why?"}],
                "attachments": [{"file_id": "file-1"}]
            })
        );
    }

    #[test]
    fn run_object_tolerates_unknown_output_items() {
        let run: RunObject = serde_json::from_value(json!({
            "id": "run_1",
            "status": "completed",
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "output_text", "text": "hi"},
                {"type": "output_file", "file_id": "f1"}
            ]
        }))
        .unwrap();
        assert_eq!(
            run.output,
            vec![
                OutputItem::Other,
                OutputItem::OutputText { text: "hi".into() },
                OutputItem::OutputFile {
                    file_id: "f1".into(),
                    filename: None
                },
            ]
        );
        assert!(run.last_error.is_none());
    }
}
