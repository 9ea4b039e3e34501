//! Copy text to the system clipboard.
//!
//! In the browser the rendered text of an element is selected and the
//! `copy` command is issued. On native targets the text is written through
//! the OS clipboard.

use thiserror::Error;

/// Message returned on a successful copy.
pub const COPIED: &str = "Copied to clipboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The copy command ran and reported failure.
    #[error("Unable to copy")]
    CopyFailed,
    /// The platform has no usable clipboard.
    #[error("Unsupported browser")]
    Unsupported,
}

/// Select `element`'s rendered text and copy it.
#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(element: &web_sys::Element) -> Result<&'static str, ClipboardError> {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or(ClipboardError::Unsupported)?;
    let document = window.document().ok_or(ClipboardError::Unsupported)?;

    let range = document.create_range().map_err(|_| ClipboardError::Unsupported)?;
    range
        .select_node(element)
        .map_err(|_| ClipboardError::Unsupported)?;

    let selection = window.get_selection().ok().flatten();
    if let Some(selection) = &selection {
        let _ = selection.remove_all_ranges();
        let _ = selection.add_range(&range);
    }

    let result = match document.dyn_ref::<web_sys::HtmlDocument>() {
        Some(html) => match html.exec_command("copy") {
            Ok(true) => Ok(COPIED),
            Ok(false) => Err(ClipboardError::CopyFailed),
            Err(_) => Err(ClipboardError::Unsupported),
        },
        None => Err(ClipboardError::Unsupported),
    };

    if let Some(selection) = &selection {
        let _ = selection.remove_all_ranges();
    }

    if let Err(e) = &result {
        crate::log_warn!("copy to clipboard failed: {}", e);
    }
    result
}

/// Copy `text` to the OS clipboard.
#[cfg(not(target_arch = "wasm32"))]
pub fn copy_to_clipboard(text: &str) -> Result<&'static str, ClipboardError> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| {
        crate::log_warn!("clipboard unavailable: {}", e);
        ClipboardError::Unsupported
    })?;

    clipboard.set_text(text).map_err(|e| {
        crate::log_warn!("copy to clipboard failed: {}", e);
        ClipboardError::CopyFailed
    })?;

    Ok(COPIED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_read_as_user_messages() {
        assert_eq!(ClipboardError::CopyFailed.to_string(), "Unable to copy");
        assert_eq!(ClipboardError::Unsupported.to_string(), "Unsupported browser");
        assert_eq!(COPIED, "Copied to clipboard");
    }
}
