use anyhow::{Context, Result};
use arboard::Clipboard;

/// Maximum clipboard size (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Something text can be copied into. The TUI holds one of these so tests can
/// swap in a fake.
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard via arboard. Opened on first use, so constructing one
/// never fails in a headless environment.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().context("Failed to initialize clipboard")?,
        };
        let clipboard = self.clipboard.insert(clipboard);
        clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

/// Validate `text` and hand it to `provider`.
pub fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy text to the system clipboard.
///
/// # Errors
/// Returns error if:
/// - Text is empty
/// - Text is too large for clipboard (>10MB)
/// - System clipboard is unavailable (headless environment, denied access)
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    // Validate first so bad input never touches the system clipboard
    validate_clipboard_text(text)?;
    SystemClipboard::new().set_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockClipboard {
        text: Option<String>,
        should_fail: bool,
    }

    impl MockClipboard {
        fn new() -> Self {
            Self { text: None, should_fail: false }
        }

        fn with_failure() -> Self {
            Self { text: None, should_fail: true }
        }
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.should_fail {
                anyhow::bail!("Mock clipboard error");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_target_term() {
        let mut mock = MockClipboard::new();
        copy_with_provider("correr", &mut mock).unwrap();
        assert_eq!(mock.text.as_deref(), Some("correr"));
    }

    #[test]
    fn test_copy_unicode_term() {
        let mut mock = MockClipboard::new();
        copy_with_provider("Straßenbahn 路面電車", &mut mock).unwrap();
        assert_eq!(mock.text.as_deref(), Some("Straßenbahn 路面電車"));
    }

    #[test]
    fn test_clipboard_provider_failure() {
        let mut mock = MockClipboard::with_failure();
        let result = copy_with_provider("correr", &mut mock);
        assert!(result.unwrap_err().to_string().contains("Mock clipboard error"));
    }

    #[test]
    fn test_copy_empty_text_rejected() {
        let mut mock = MockClipboard::new();
        let result = copy_with_provider("", &mut mock);

        assert!(result.unwrap_err().to_string().contains("empty"));
        assert!(mock.text.is_none());
    }

    #[test]
    fn test_copy_exactly_at_limit() {
        let mut mock = MockClipboard::new();
        let text = "a".repeat(MAX_CLIPBOARD_SIZE);
        assert!(copy_with_provider(&text, &mut mock).is_ok());
    }

    #[test]
    fn test_copy_one_byte_over_limit() {
        let mut mock = MockClipboard::new();
        let text = "a".repeat(MAX_CLIPBOARD_SIZE + 1);
        let err_msg = copy_with_provider(&text, &mut mock).unwrap_err().to_string();

        assert!(err_msg.contains("too large"));
        assert!(err_msg.contains("bytes"));
    }

    #[test]
    fn test_size_counted_in_bytes() {
        let mut mock = MockClipboard::new();
        // 4 bytes per char, 12MB total
        let text = "🚀".repeat(3 * 1024 * 1024);
        assert!(copy_with_provider(&text, &mut mock).is_err());
    }

    #[test]
    fn test_copy_to_clipboard_validates_before_clipboard_access() {
        let result = copy_to_clipboard("");
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_system_clipboard_construction_is_lazy() {
        let clipboard = SystemClipboard::new();
        assert!(clipboard.clipboard.is_none());
    }
}
