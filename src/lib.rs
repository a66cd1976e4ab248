pub mod error;
pub mod expr;
pub mod printer;
pub mod report;
pub mod scanner;
pub mod token;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::report::{Diagnostics, Reporter};
pub use crate::scanner::{scan, Scanner};
pub use crate::token::{Literal, Token, TokenKind};
