/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// Whether the document differs from before the command.
    pub changed: bool,
    /// Document version after the command; bumped only on change.
    pub version: u64,
}
