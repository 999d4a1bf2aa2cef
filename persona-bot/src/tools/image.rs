//! Free-form image generation for prompts the model writes itself.

use async_trait::async_trait;
use image_generation_client::ImageGenerationClient;
use openai_client::ToolDefinition;
use serde_json::{json, Value};

use super::{required_str, Tool, ToolError, ToolOutput};

pub const GENERATE_IMAGE_TOOL_NAME: &str = "generate_image";

/// Free-form image generation from a text prompt.
#[derive(Clone)]
pub struct GenerateImageTool {
    images: ImageGenerationClient,
}

impl GenerateImageTool {
    pub fn new(images: ImageGenerationClient) -> Self {
        Self { images }
    }
}

#[async_trait]
impl Tool for GenerateImageTool {
    fn spec(&self) -> ToolDefinition {
        ToolDefinition {
            name: GENERATE_IMAGE_TOOL_NAME.to_string(),
            description: "Generate an image of anything that is not yourself. \
                Input is a detailed description of the image."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "prompt": { "type": "string", "description": "Detailed image description" }
                },
                "required": ["prompt"]
            }),
        }
    }

    async fn call(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let prompt = required_str(&arguments, "prompt")?;
        let url = self
            .images
            .generate_image(prompt)
            .await
            .map_err(|e| ToolError::Upstream(e.to_string()))?;
        Ok(ToolOutput::image(url, "Image generated and attached to your reply."))
    }
}
