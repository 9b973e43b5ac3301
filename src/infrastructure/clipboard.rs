use super::errors::Result;

pub struct ClipboardService;

impl ClipboardService {
    pub fn copy_text(text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        log::debug!("copied {} bytes to clipboard", text.len());
        Ok(())
    }
}
