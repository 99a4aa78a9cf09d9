use std::sync::Arc;

use tracing::debug;

use crate::domain::llm::{ContentPart, LlmRequest, Message};
use crate::domain::{DomainError, ImageAcquirer, ImageSource, PromptCatalog};
use crate::infrastructure::llm::ProviderRegistry;

/// Orchestrates one recognition or reconciliation request: acquire the image,
/// render the instruction, make a single provider call, return the raw text.
///
/// Every call is a fresh, independent request; there is no retry, caching, or
/// fallback provider selection.
#[derive(Debug)]
pub struct RelayService {
    registry: ProviderRegistry,
    acquirer: Arc<dyn ImageAcquirer>,
    prompts: PromptCatalog,
    validator_provider_id: String,
}

impl RelayService {
    pub fn new(
        registry: ProviderRegistry,
        acquirer: Arc<dyn ImageAcquirer>,
        prompts: PromptCatalog,
        validator_provider_id: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            acquirer,
            prompts,
            validator_provider_id: validator_provider_id.into(),
        }
    }

    /// Recognize traffic signs in an image through the named vision provider.
    pub async fn recognize(
        &self,
        provider_id: &str,
        source: ImageSource,
        locale: Option<&str>,
    ) -> Result<String, DomainError> {
        // Resolve the provider before any network call so an unknown id
        // never triggers an acquisition.
        let handle = self.registry.get(provider_id)?;

        let blob = self.acquirer.acquire(source).await?;
        debug!(
            provider_id,
            media_type = blob.media_type(),
            image_bytes = blob.len(),
            "Image acquired"
        );

        let instruction = self.prompts.render_recognize(locale)?;

        let message = Message::user_with_parts(vec![
            ContentPart::Text { text: instruction },
            ContentPart::ImageBase64 {
                data: blob.base64(),
                media_type: blob.media_type().to_string(),
            },
        ]);

        let mut request = LlmRequest::new(vec![message]);
        request.max_tokens = handle.max_tokens;

        let response = handle.provider.chat(&handle.model, request).await?;
        Ok(response.content().unwrap_or("").to_string())
    }

    /// Cross-check two prior recognition answers with a text-only call to
    /// the configured validator provider.
    pub async fn reconcile(
        &self,
        first: &str,
        second: &str,
        locale: &str,
    ) -> Result<String, DomainError> {
        if first.trim().is_empty() {
            return Err(DomainError::input("firstResult must not be empty"));
        }
        if second.trim().is_empty() {
            return Err(DomainError::input("secondResult must not be empty"));
        }

        let handle = self.registry.get(&self.validator_provider_id)?;
        let instruction = self.prompts.render_validate(first, second, locale)?;

        let mut request = LlmRequest::new(vec![Message::user(instruction)]);
        request.max_tokens = handle.max_tokens;

        let response = handle.provider.chat(&handle.model, request).await?;
        Ok(response.content().unwrap_or("").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::mock::MockImageAcquirer;
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::infrastructure::llm::ProviderHandle;
    use bytes::Bytes;

    const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fakejpegdata";

    fn service_with(
        provider: Arc<MockLlmProvider>,
        acquirer: MockImageAcquirer,
    ) -> RelayService {
        let mut registry = ProviderRegistry::default();
        registry.insert(
            "vision",
            ProviderHandle {
                provider: provider.clone(),
                model: "vision-model".to_string(),
                max_tokens: Some(400),
            },
        );
        registry.insert(
            "validator",
            ProviderHandle {
                provider,
                model: "text-model".to_string(),
                max_tokens: None,
            },
        );

        RelayService::new(
            registry,
            Arc::new(acquirer),
            PromptCatalog::default(),
            "validator",
        )
    }

    #[tokio::test]
    async fn test_recognize_upload_returns_provider_text() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_text("Stop sign detected."));
        let service = service_with(provider.clone(), MockImageAcquirer::new());

        let result = service
            .recognize(
                "vision",
                ImageSource::upload(Bytes::from_static(JPEG_BYTES)),
                Some("Belgium"),
            )
            .await
            .unwrap();

        assert_eq!(result, "Stop sign detected.");

        // The provider saw one multimodal request with the locale-scoped
        // instruction and the base64 image part.
        let requests = provider.recorded_requests();
        assert_eq!(requests.len(), 1);
        let message = &requests[0].messages[0];
        assert!(message.is_multimodal());
        assert!(message.content_text().unwrap().contains("Belgium"));
        assert_eq!(requests[0].max_tokens, Some(400));
    }

    #[tokio::test]
    async fn test_recognize_unknown_provider_skips_acquisition() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_text("unused"));
        // An acquirer that would fail if it were reached.
        let acquirer = MockImageAcquirer::new().with_error("must not be called");
        let service = service_with(provider.clone(), acquirer);

        let result = service
            .recognize("unknown", ImageSource::external("123"), None)
            .await;

        assert!(matches!(result, Err(DomainError::UnknownProvider { .. })));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recognize_acquisition_failure_skips_gateway() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_text("unused"));
        let acquirer = MockImageAcquirer::new().with_error("download failed");
        let service = service_with(provider.clone(), acquirer);

        let result = service
            .recognize("vision", ImageSource::external("123"), None)
            .await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_reconcile_single_call_with_verbatim_inputs() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_text("Consistent: stop sign"));
        let service = service_with(provider.clone(), MockImageAcquirer::new());

        let result = service
            .reconcile("A: stop sign", "B: yield sign", "Belgium")
            .await
            .unwrap();

        assert_eq!(result, "Consistent: stop sign");
        assert_eq!(provider.call_count(), 1);

        let prompt = provider.recorded_requests()[0].messages[0]
            .content_text()
            .unwrap()
            .to_string();
        assert!(prompt.contains("A: stop sign"));
        assert!(prompt.contains("B: yield sign"));
        assert!(prompt.contains("Belgium"));
    }

    #[tokio::test]
    async fn test_reconcile_rejects_empty_inputs() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_text("unused"));
        let service = service_with(provider.clone(), MockImageAcquirer::new());

        let result = service.reconcile("", "B: yield sign", "Belgium").await;
        assert!(matches!(result, Err(DomainError::Input { .. })));

        let result = service.reconcile("A: stop", "   ", "Belgium").await;
        assert!(matches!(result, Err(DomainError::Input { .. })));

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("HTTP 500"));
        let service = service_with(provider, MockImageAcquirer::new());

        let result = service
            .recognize(
                "vision",
                ImageSource::upload(Bytes::from_static(JPEG_BYTES)),
                None,
            )
            .await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }
}
