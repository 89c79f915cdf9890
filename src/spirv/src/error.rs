use derive_more::*;

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ShaderParseErrorKind {
    /// The byte stream is not a valid SPIR-V module.
    #[display(fmt = "invalid module")]
    InvalidModule,
    /// This parser is incapable of parsing the current module.
    #[display(fmt = "unsupported module")]
    UnsupportedModule,
    /// An id was referenced but never defined.
    #[display(fmt = "undefined id")]
    UndefinedId,
    /// A struct query was made against some other kind of type.
    #[display(fmt = "not a struct")]
    NotAStruct,
    #[display(fmt = "member index out of range")]
    MemberOutOfRange,
    /// A size or length does not fit in 32 bits.
    #[display(fmt = "limit exceeded")]
    LimitExceeded,
}

#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display(fmt = "{}: {}", kind, detail)]
pub struct ShaderParseError {
    kind: ErrorKind,
    detail: String,
}

pub type ErrorKind = ShaderParseErrorKind;
pub type Error = ShaderParseError;
pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable description of what went wrong.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}
