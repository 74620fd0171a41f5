use super::sanitize_fragment;

/// Outcome of offering a new fragment to a [`Preview`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewUpdate {
    /// The sanitized fragment replaced the displayed HTML.
    Updated,
    /// Nothing to show (empty fragment); the displayed HTML is kept.
    Unchanged,
    /// The sanitizer removed everything; the stale HTML is kept.
    Rejected,
}

/// Last sanitized HTML accepted for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    html: String,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn update(&mut self, fragment: &str) -> PreviewUpdate {
        if fragment.trim().is_empty() {
            return PreviewUpdate::Unchanged;
        }
        let safe = sanitize_fragment(fragment);
        if safe.trim().is_empty() {
            log::warn!("sanitizer rejected the whole fragment; keeping previous preview");
            return PreviewUpdate::Rejected;
        }
        self.html = safe;
        PreviewUpdate::Updated
    }
}
