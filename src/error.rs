use std::result;
use std::fmt::{self, Display};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum ErrorKind {
    UnexpectedCharacter { line: usize, character: char },
    UnterminatedString { line: usize },
}

#[derive(Debug, PartialEq, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn unexpected_character(line: usize, character: char) -> Error {
        let kind = ErrorKind::UnexpectedCharacter { line, character };
        Error { kind, message: "Unexpected character.".into() }
    }

    pub fn unterminated_string(line: usize) -> Error {
        let kind = ErrorKind::UnterminatedString { line };
        Error { kind, message: "Unterminated string.".into() }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn line(&self) -> usize {
        use ErrorKind::*;
        match self.kind() {
            UnexpectedCharacter { line, .. } | UnterminatedString { line } => *line,
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line(), self.message)
    }
}
