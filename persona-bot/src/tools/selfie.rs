//! Selfie tool: renders the persona's appearance in a scene chosen by the model.

use async_trait::async_trait;
use image_generation_client::ImageGenerationClient;
use openai_client::ToolDefinition;
use serde_json::{json, Value};
use tracing::info;

use super::{required_str, Tool, ToolError, ToolOutput};
use crate::persona::Persona;

pub const SELFIE_TOOL_NAME: &str = "selfie";

#[derive(Clone)]
pub struct SelfieTool {
    images: ImageGenerationClient,
    persona: Persona,
}

impl SelfieTool {
    pub fn new(images: ImageGenerationClient, persona: Persona) -> Self {
        Self { images, persona }
    }

    /// Image prompt for a selfie of this persona in `scene`.
    pub fn image_prompt(&self, scene: &str) -> String {
        format!(
            "A realistic smartphone selfie of {}, {}. Natural light, candid, high detail.",
            self.persona.profile().appearance,
            scene.trim()
        )
    }
}

#[async_trait]
impl Tool for SelfieTool {
    fn spec(&self) -> ToolDefinition {
        ToolDefinition {
            name: SELFIE_TOOL_NAME.to_string(),
            description: "Take a selfie of yourself when the human asks for a picture of you. \
                Input describes where you are and what you are doing, e.g. 'at the beach at sunset'."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "scene": { "type": "string", "description": "Setting, pose and mood of the selfie" }
                },
                "required": ["scene"]
            }),
        }
    }

    async fn call(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let scene = required_str(&arguments, "scene")?;
        let url = self
            .images
            .generate_image(&self.image_prompt(scene))
            .await
            .map_err(|e| ToolError::Upstream(e.to_string()))?;
        info!(persona = %self.persona, "Selfie generated");
        Ok(ToolOutput::image(
            url,
            "Selfie taken and attached to your reply. Do not include the link in your message.",
        ))
    }
}
