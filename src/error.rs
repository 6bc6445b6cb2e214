use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum MagicError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("File not exists: {}", path.display())]
    #[diagnostic(
        code(magic::source_not_found),
        help("Check the path of the JSON document you are trying to load.")
    )]
    SourceNotFound { path: PathBuf },

    #[error("File not found: {}", path.display())]
    #[diagnostic(
        code(magic::snapshot_not_found),
        help("Snapshots are created with `Magic::save` before they can be loaded.")
    )]
    SnapshotNotFound { path: PathBuf },

    #[error("Invalid file content: {}: {reason}", path.display())]
    #[diagnostic(
        code(magic::invalid_snapshot),
        help("A snapshot starts with the `Magic.serialized` marker line followed by the saved entries.")
    )]
    InvalidSnapshot { path: PathBuf, reason: String },

    #[error("\"{key}\" is not iterable!")]
    #[diagnostic(
        code(magic::not_iterable),
        help("Only nested containers and sequences can be merged into.")
    )]
    NotIterable { key: String },

    #[error("Unknown method \"{name}\"()")]
    #[diagnostic(
        code(magic::unknown_operation),
        help("Convention accessors are named `getSomeKey` or `setSomeKey`.")
    )]
    UnknownOperation { name: String },

    #[error("Value at \"{key}\" cannot be serialized")]
    #[diagnostic(
        code(magic::not_serializable),
        help("Lazy values must be read (or deleted) before the container is saved.")
    )]
    NotSerializable { key: String },

    #[error(transparent)]
    #[diagnostic(code(magic::io))]
    Io(#[from] std::io::Error),
}

impl MagicError {
    /// Numeric sub-code distinguishing the invalid-argument failures.
    ///
    /// JSON 100, missing JSON source file 101, YAML 102, INI 103,
    /// missing snapshot 1 and invalid snapshot 2. Other kinds have no code.
    #[must_use]
    pub fn sub_code(&self) -> Option<u16> {
        match self {
            MagicError::Parse(err) => Some(err.sub_code()),
            MagicError::SourceNotFound { .. } => Some(101),
            MagicError::SnapshotNotFound { .. } => Some(1),
            MagicError::InvalidSnapshot { .. } => Some(2),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum ParseError {
    #[error("Invalid JSON: {message}")]
    #[diagnostic(code(parser::json), help("The input is not a valid JSON document."))]
    Json {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("Invalid YAML: {message}")]
    #[diagnostic(code(parser::yaml), help("The input is not a valid YAML document."))]
    Yaml {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("Invalid INI string: {message}")]
    #[diagnostic(
        code(parser::ini),
        help("INI lines are `key = value`, `[section]` headers or `;` comments.")
    )]
    Ini {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("Expected a mapping or sequence at the top of the {format} document, found {found}")]
    #[diagnostic(
        code(parser::unexpected_root),
        help("A container can only be built from a mapping or a sequence.")
    )]
    UnexpectedRoot { format: Format, found: String },
}

impl ParseError {
    #[must_use]
    pub fn format(&self) -> Format {
        match self {
            ParseError::Json { .. } => Format::Json,
            ParseError::Yaml { .. } => Format::Yaml,
            ParseError::Ini { .. } => Format::Ini,
            ParseError::UnexpectedRoot { format, .. } => *format,
        }
    }

    #[must_use]
    pub fn sub_code(&self) -> u16 {
        match self.format() {
            Format::Json => 100,
            Format::Yaml => 102,
            Format::Ini => 103,
        }
    }
}

/// The text formats that can fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Ini,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => write!(f, "JSON"),
            Format::Yaml => write!(f, "YAML"),
            Format::Ini => write!(f, "INI"),
        }
    }
}
