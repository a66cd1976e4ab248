use crate::{
    error::{Error, Result},
    report::Reporter,
    token::{Literal, Token, TokenKind},
};
use log::{debug, trace};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::str::Chars;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "and" => TokenKind::And,
    "class" => TokenKind::Class,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "nil" => TokenKind::Nil,
    "or" => TokenKind::Or,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "super" => TokenKind::Super,
    "this" => TokenKind::This,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
};

type Lexed = (TokenKind, Option<Literal>);

/// Scans `source` into tokens, handing lexical errors to `reporter`.
///
/// The result always ends with a single `EndOfFile` token.
pub fn scan<R: Reporter + ?Sized>(source: &str, reporter: &mut R) -> Vec<Token> {
    Scanner::new(source).scan_tokens(reporter)
}

/// Iterates over the tokens of a source string, yielding lexical errors
/// in place of the lexemes that caused them. The `EndOfFile` sentinel is
/// only added by `scan_tokens`.
pub struct Scanner<'a> {
    src: PeekMoreIterator<Chars<'a>>,
    lexeme_buffer: String,
    line: usize,
}

impl <'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        loop {
            self.src.peek()?;
            self.lexeme_buffer.clear();
            let line = self.line;

            let lexed = match self.next_token_kind() {
                None => continue,
                Some(lexed) => lexed,
            };

            let lexeme = self.lexeme_buffer.clone();
            return Some(lexed.map(|(kind, literal)| Token {
                kind,
                lexeme,
                literal,
                line,
            }));
        }
    }
}

impl <'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.chars().peekmore(),
            lexeme_buffer: String::new(),
            line: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn scan_tokens<R: Reporter + ?Sized>(mut self, reporter: &mut R) -> Vec<Token> {
        let mut tokens = Vec::new();
        for scanned in self.by_ref() {
            match scanned {
                Ok(token) => {
                    trace!("scanned {}", token);
                    tokens.push(token);
                },
                Err(e) => {
                    debug!("lexical error: {}", e);
                    reporter.error(&e);
                },
            }
        }
        tokens.push(Token::eof(self.line()));
        tokens
    }

    /// Consumes one lexeme. `None` means it produced no token.
    fn next_token_kind(&mut self) -> Option<Result<Lexed>> {
        let next_char = self.src.next()?;
        self.lexeme_buffer.push(next_char);

        use TokenKind::*;
        let kind = match next_char {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => Minus,
            '+' => Plus,
            ';' => Semicolon,
            '*' => Star,
            '!' => if self.does_next_match('=') { BangEqual } else { Bang },
            '=' => if self.does_next_match('=') { EqualEqual } else { Equal },
            '<' => if self.does_next_match('=') { LessEqual } else { Less },
            '>' => if self.does_next_match('=') { GreaterEqual } else { Greater },
            '/' => {
                if self.does_next_match('/') { // is this a comment?
                    self.advance_until_match('\n');
                    return None;
                }
                Slash
            },
            ' ' | '\r' | '\t' => return None,
            '\n' => {
                self.line += 1;
                return None;
            },
            '"' => return Some(self.extract_string()),
            c if c.is_ascii_digit() => return Some(Ok(self.extract_number())),
            c if can_start_identifier(&c) => return Some(Ok(self.extract_identifier())),
            c => return Some(Err(Error::unexpected_character(self.line, c))),
        };
        Some(Ok((kind, None)))
    }

    fn does_next_match(&mut self, c: char) -> bool {
        match self.src.peek() {
            Some(next) if c == *next => {
                self.lexeme_buffer.push(c);
                self.src.next();
                true
            }
            _ => false,
        }
    }

    fn extract_string(&mut self) -> Result<Lexed> {
        let mut newline_count = 0;
        self.advance_until_match_for_each('"', |c| if c == '\n' { newline_count += 1 });
        self.line += newline_count;
        match self.src.next() {
            None => Err(Error::unterminated_string(self.line)),
            Some(q) => { // q here must be " due to advance_until_match
                self.lexeme_buffer.push(q);
                let value = &self.lexeme_buffer[1..self.lexeme_buffer.len() - 1];
                Ok((TokenKind::String, Some(Literal::String(value.to_string()))))
            },
        }
    }

    fn extract_number(&mut self) -> Lexed {
        self.advance_until(|n| !n.is_ascii_digit());

        let is_fraction = self.src.peek() == Some(&'.')
            && self.src.peek_nth(1).map_or(false, |c| c.is_ascii_digit());
        if is_fraction {
            self.lexeme_buffer.push('.');
            self.src.next();
            self.advance_until(|n| !n.is_ascii_digit());
        }

        // Only ASCII digits with at most one interior '.' get here.
        let value = self.lexeme_buffer.parse().unwrap_or_default();
        (TokenKind::Number, Some(Literal::Number(value)))
    }

    fn extract_identifier(&mut self) -> Lexed {
        self.advance_until(|n| !is_part_of_valid_identifier(n));

        let text = self.lexeme_buffer.as_str();
        match KEYWORDS.get(text) {
            Some(kind) => (*kind, None),
            None => (TokenKind::Identifier, None),
        }
    }

    fn advance_until_match(&mut self, c: char) {
        self.advance_until(|n| n == &c)
    }

    fn advance_until(&mut self, should_stop: impl Fn(&char) -> bool) {
        self.advance_until_for_each(should_stop, |_| {})
    }

    fn advance_until_match_for_each(
        &mut self,
        c: char,
        f: impl FnMut(char),
    ) {
        self.advance_until_for_each(|n| n == &c, f);
    }

    fn advance_until_for_each(
        &mut self,
        should_stop: impl Fn(&char) -> bool,
        mut f: impl FnMut(char),
    ) {
        while let Some(&next) = self.src.peek() {
            if should_stop(&next) {
                break;
            }
            self.src.next();
            self.lexeme_buffer.push(next);
            f(next);
        }
    }
}

fn can_start_identifier(c: &char) -> bool {
    c.is_ascii_alphabetic() || c == &'_'
}

fn is_part_of_valid_identifier(c: &char) -> bool {
    can_start_identifier(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Diagnostics;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source, &mut Diagnostics::new()).iter().map(Token::kind).collect()
    }

    #[test]
    fn single_character_tokens() {
        use TokenKind::*;
        assert_eq!(
            vec![LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus, Semicolon, Star, Slash, EndOfFile],
            kinds("(){},.-+;*/")
        );
    }

    #[test]
    fn one_or_two_character_operators() {
        use TokenKind::*;
        assert_eq!(
            vec![Bang, BangEqual, Equal, EqualEqual, Less, LessEqual, Greater, GreaterEqual, EndOfFile],
            kinds("! != = == < <= > >=")
        );
        assert_eq!(vec![EqualEqual, Equal, EndOfFile], kinds("==="));
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let tokens = scan("/ // ignored ( )\n/", &mut Diagnostics::new());
        assert_eq!(3, tokens.len());
        assert_eq!((TokenKind::Slash, 1), (tokens[0].kind(), tokens[0].line()));
        assert_eq!((TokenKind::Slash, 2), (tokens[1].kind(), tokens[1].line()));
    }

    #[test]
    fn comment_at_end_of_input() {
        assert_eq!(vec![TokenKind::EndOfFile], kinds("// nothing else"));
    }

    #[test]
    fn multiline_string_takes_its_start_line() {
        let tokens = scan("\"a\nb\" x", &mut Diagnostics::new());
        assert_eq!(TokenKind::String, tokens[0].kind());
        assert_eq!(1, tokens[0].line());
        assert_eq!(Some(&Literal::String("a\nb".into())), tokens[0].literal());
        assert_eq!(2, tokens[1].line());
        assert_eq!(2, tokens[2].line());
    }

    #[test]
    fn empty_string_literal() {
        let tokens = scan("\"\"", &mut Diagnostics::new());
        assert_eq!("\"\"", tokens[0].lexeme());
        assert_eq!(Some(&Literal::String("".into())), tokens[0].literal());
    }

    #[test]
    fn unterminated_string_reports_the_line_it_ran_out_on() {
        let mut d = Diagnostics::new();
        let tokens = scan("\"one\ntwo\nthree", &mut d);
        assert_eq!(vec![TokenKind::EndOfFile], tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert_eq!(3, tokens[0].line());
        let reported: Vec<_> = d.iter().map(|r| (r.line, r.message.as_str())).collect();
        assert_eq!(vec![(3, "Unterminated string.")], reported);
    }

    #[test]
    fn fractional_numbers() {
        let tokens = scan("3.25", &mut Diagnostics::new());
        assert_eq!("3.25", tokens[0].lexeme());
        assert_eq!(Some(&Literal::Number(3.25)), tokens[0].literal());
    }

    #[test]
    fn trailing_dot_is_not_part_of_a_number() {
        let tokens = scan("12.", &mut Diagnostics::new());
        assert_eq!(3, tokens.len());
        assert_eq!(("12", TokenKind::Number), (tokens[0].lexeme(), tokens[0].kind()));
        assert_eq!(TokenKind::Dot, tokens[1].kind());
    }

    #[test]
    fn method_call_on_number() {
        use TokenKind::*;
        assert_eq!(vec![Number, Dot, Identifier, EndOfFile], kinds("1.abs"));
    }

    #[test]
    fn negative_numbers_are_two_tokens() {
        use TokenKind::*;
        assert_eq!(vec![Minus, Number, EndOfFile], kinds("-5"));
    }

    #[test]
    fn keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(
            vec![And, Class, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True, Var, While, EndOfFile],
            kinds("and class else false for fun if nil or print return super this true var while")
        );
        assert_eq!(
            vec![Identifier, Identifier, Identifier, Identifier, EndOfFile],
            kinds("_private camelCase var1 Class")
        );
    }

    #[test]
    fn errors_do_not_stop_the_scan() {
        let mut d = Diagnostics::new();
        let tokens = scan("a @ b\n# c", &mut d);
        let lexemes: Vec<_> = tokens.iter().map(Token::lexeme).collect();
        assert_eq!(vec!["a", "b", "c", ""], lexemes);
        let lines: Vec<_> = d.iter().map(|r| r.line).collect();
        assert_eq!(vec![1, 2], lines);
    }

    #[test]
    fn iterator_yields_errors_in_place() {
        let scanned: Vec<_> = Scanner::new("1 $ 2").collect();
        assert_eq!(3, scanned.len());
        assert!(scanned[0].is_ok());
        match &scanned[1] {
            Err(e) => assert_eq!("Unexpected character.", e.message()),
            Ok(t) => panic!("expected an error, got {}", t),
        }
        assert!(scanned[2].is_ok());
    }

    #[test]
    fn line_tracks_what_has_been_consumed() {
        let mut scanner = Scanner::new("a\n\"b\nc\"\nd");
        assert_eq!(1, scanner.line());

        let first = scanner.next().map(|t| t.map(|t| t.line()));
        assert_eq!(Some(Ok(1)), first);
        assert_eq!(1, scanner.line());

        let string = scanner.next().map(|t| t.map(|t| t.line()));
        assert_eq!(Some(Ok(2)), string);
        assert_eq!(3, scanner.line());

        let tokens = scanner.scan_tokens(&mut Diagnostics::new());
        let lines: Vec<_> = tokens.iter().map(|t| (t.lexeme(), t.line())).collect();
        assert_eq!(vec![("d", 4), ("", 4)], lines);
    }

    #[test]
    fn eof_carries_the_last_line() {
        let tokens = scan("x\n\n", &mut Diagnostics::new());
        assert_eq!(3, tokens[1].line());
    }
}
