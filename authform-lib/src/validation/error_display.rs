/// Where a view displays a field's validation error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDisplay {
    /// Show error message below the field (default).
    #[default]
    Below,
    /// Show error message on the same line, after the value.
    Inline,
    /// Don't display the message - the field is only marked as invalid.
    None,
}
