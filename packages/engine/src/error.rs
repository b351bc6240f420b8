#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChlogError {
    pub code: String,
    pub title: String,
    pub description: String,
}

impl ChlogError {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn unknown(description: impl Into<String>) -> Self {
        Self::new("CHLOG_ERROR_UNKNOWN", "Unknown error", description)
    }
}

impl std::fmt::Display for ChlogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.title, self.description, self.code)
    }
}

impl std::error::Error for ChlogError {}
