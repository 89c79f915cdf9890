use derive_more::Display;

use crate::ProviderError;

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Error {
    /// The input byte length is not a multiple of the word size.
    #[display(fmt = "malformed input: {} bytes is not a whole number of words", len)]
    MalformedInput { len: usize },
    /// The provider rejected the module.
    #[display(fmt = "failed to parse module: {}", _0)]
    Parse(String),
    /// A query against an already-parsed module failed.
    #[display(fmt = "{}: {}", context, message)]
    Query { context: String, message: String },
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) trait ResultExt<T> {
    /// Converts a provider failure into `Error::Query`, naming the
    /// operation that was in progress.
    fn context<C: Into<String>>(self, f: impl FnOnce() -> C) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, ProviderError> {
    fn context<C: Into<String>>(self, f: impl FnOnce() -> C) -> Result<T> {
        self.map_err(|e| Error::Query { context: f().into(), message: e.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = Error::MalformedInput { len: 7 };
        assert_eq!(err.to_string(),
            "malformed input: 7 bytes is not a whole number of words");
        let res: std::result::Result<(), _> =
            Err(ProviderError("undefined id: %9".to_owned()));
        let err = res.context(|| "uniform buffer `Globals`").unwrap_err();
        assert_eq!(err.to_string(), "uniform buffer `Globals`: undefined id: %9");
    }
}
