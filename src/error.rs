use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AnnotationError {
    #[error("failed to fetch {resource}: {message}")]
    SourceFetch { resource: String, message: String },

    #[error("{resource} returned status {status}: {message}")]
    SourceStatus {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("input file not found: {0}")]
    InputNotFound(String),

    #[error("column '{column}' not found. Available columns: {available:?}")]
    #[diagnostic(help("use --column to select the annotation column"))]
    MissingRequiredColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("annotation table has no header line: {0}")]
    EmptyTable(String),

    #[error("no valid {kind} annotation found after cleaning")]
    #[diagnostic(help("check the selected column and that its cells hold identifiers in the expected format"))]
    NoValidAnnotations { kind: String },

    #[error("no {kind} category could be resolved")]
    #[diagnostic(help(
        "possible causes: rare or absent identifiers, or malformed reference data"
    ))]
    NoCategoriesResolved { kind: String },

    #[error("invalid token pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(String),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid pathway map id: {0}")]
    InvalidMapId(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
