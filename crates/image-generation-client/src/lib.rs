//! OpenAI DALL-E image generation client.
//!
//! Text prompt in, hosted image URL out. Used by the selfie and image tools.

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateImageRequestArgs, Image, ImageModel, ImageSize},
    Client,
};
use openai_client::mask_token;
use std::sync::Arc;

pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// OpenAI DALL-E image generation client. Clones share the HTTP client.
#[derive(Clone)]
pub struct ImageGenerationClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    size: ImageSize,
    api_key_for_logging: Option<String>,
}

impl ImageGenerationClient {
    pub fn new(api_key: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            size: ImageSize::S1024x1024,
            api_key_for_logging,
        }
    }

    /// Client with a custom base URL (OpenAI-compatible services, mock servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            size: ImageSize::S1024x1024,
            api_key_for_logging,
        }
    }

    /// Sets the model (`dall-e-2`, `dall-e-3` or any compatible model name).
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn image_model(&self) -> ImageModel {
        match self.model.as_str() {
            "dall-e-2" => ImageModel::DallE2,
            "dall-e-3" => ImageModel::DallE3,
            other => ImageModel::Other(other.to_string()),
        }
    }

    /// Generates one image for `prompt` and returns its URL.
    #[tracing::instrument(skip(self, prompt))]
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let masked = self
            .api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string());

        tracing::info!(
            model = %self.model,
            size = ?self.size,
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            api_key = %masked,
            "OpenAI image generation request"
        );

        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(self.image_model())
            .size(self.size)
            .n(1)
            .build()?;

        let response = self.client.images().create(request).await?;

        let url = response.data.iter().find_map(|d| match d.as_ref() {
            Image::Url { url, .. } => Some(url.clone()),
            _ => None,
        });

        match url {
            Some(url) => {
                tracing::info!(image_url = %url, "OpenAI image generation completed");
                Ok(url)
            }
            None => anyhow::bail!("No image URL in response"),
        }
    }
}
