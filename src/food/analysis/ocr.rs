use std::time::Duration;

use tokio::time::timeout;

use crate::providers::traits::{CompletionProvider, ImageInput};

/// Used when the vision model is unavailable, slow, or returns nothing.
pub const FALLBACK_MENU_TEXT: &str =
    "Dal Tadka\nPaneer Tikka\nButter Chicken\nBiryani\nRoti\nNaan\nSamosa\nChole\nRice\nDosa";

const OCR_PROMPT: &str = "Transcribe every dish name on this restaurant menu. \
Return plain text with one dish per line, without prices, descriptions, numbering or commentary.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTextSource {
    Vision,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct MenuText {
    pub text: String,
    pub source: MenuTextSource,
}

impl MenuText {
    fn fallback() -> Self {
        Self {
            text: FALLBACK_MENU_TEXT.to_string(),
            source: MenuTextSource::Fallback,
        }
    }
}

/// Reads menu text from an image, racing the vision call against `deadline`.
///
/// Never fails: a missing provider, a vendor error, an empty transcript or a
/// timeout all produce the canned menu text instead.
pub async fn read_menu_text(
    provider: Option<&dyn CompletionProvider>,
    image: ImageInput<'_>,
    deadline: Duration,
) -> MenuText {
    let Some(provider) = provider else {
        log::warn!("No vision provider configured, using fallback menu text");
        return MenuText::fallback();
    };

    log::info!("Reading menu image with {}", provider.model_name());

    match timeout(deadline, provider.complete_with_image(OCR_PROMPT, image)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => MenuText {
            text,
            source: MenuTextSource::Vision,
        },
        Ok(Ok(_)) => {
            log::warn!("Vision model returned no menu text, using fallback");
            MenuText::fallback()
        }
        Ok(Err(e)) => {
            log::error!("Menu OCR failed: {}", e);
            MenuText::fallback()
        }
        Err(_) => {
            log::warn!("Menu OCR timed out after {:?}, using fallback", deadline);
            MenuText::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    enum Behaviour {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct StubVision(Behaviour);

    #[async_trait]
    impl CompletionProvider for StubVision {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("text completion not used"))
        }

        async fn complete_with_image(&self, _prompt: &str, _image: ImageInput<'_>) -> Result<String> {
            match self.0 {
                Behaviour::Reply(text) => Ok(text.to_string()),
                Behaviour::Fail => Err(anyhow!("quota exceeded")),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("too late".to_string())
                }
            }
        }

        fn model_name(&self) -> &str {
            "stub-vision"
        }
    }

    const IMAGE: ImageInput<'static> = ImageInput {
        data: b"not really a jpeg",
        mime_type: "image/jpeg",
    };

    #[tokio::test]
    async fn returns_vision_text() {
        let stub = StubVision(Behaviour::Reply("Rajma Chawal\nPoha"));
        let menu = read_menu_text(Some(&stub as &dyn CompletionProvider), IMAGE, Duration::from_secs(1)).await;
        assert_eq!(menu.source, MenuTextSource::Vision);
        assert_eq!(menu.text, "Rajma Chawal\nPoha");
    }

    #[tokio::test]
    async fn falls_back_on_error() {
        let stub = StubVision(Behaviour::Fail);
        let menu = read_menu_text(Some(&stub as &dyn CompletionProvider), IMAGE, Duration::from_secs(1)).await;
        assert_eq!(menu.source, MenuTextSource::Fallback);
        assert_eq!(menu.text, FALLBACK_MENU_TEXT);
    }

    #[tokio::test]
    async fn falls_back_on_blank_reply() {
        let stub = StubVision(Behaviour::Reply("  \n "));
        let menu = read_menu_text(Some(&stub as &dyn CompletionProvider), IMAGE, Duration::from_secs(1)).await;
        assert_eq!(menu.source, MenuTextSource::Fallback);
    }

    #[tokio::test]
    async fn falls_back_on_timeout() {
        let stub = StubVision(Behaviour::Hang);
        let menu = read_menu_text(Some(&stub as &dyn CompletionProvider), IMAGE, Duration::from_millis(50)).await;
        assert_eq!(menu.source, MenuTextSource::Fallback);
    }

    #[tokio::test]
    async fn falls_back_without_provider() {
        let menu = read_menu_text(None, IMAGE, Duration::from_secs(1)).await;
        assert_eq!(menu.source, MenuTextSource::Fallback);
    }
}
