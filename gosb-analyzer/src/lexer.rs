//! Tokenizer for Go source text.
//!
//! Produces the token stream (with Go's automatic semicolon insertion) and,
//! separately, every comment with its line range so doc comments can be
//! attached to declarations afterwards.

use miette::SourceSpan;

/// Byte range in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: Span) -> Span {
        let end = self.end().max(other.end());
        Span::new(self.offset, end - self.offset)
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.offset.into(), span.len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,
    Op,
    Semicolon,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text; empty for inserted semicolons and EOF.
    pub text: &'a str,
    pub span: Span,
    /// 1-based line of the first character.
    pub line: usize,
}

impl Token<'_> {
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == keyword
    }

    /// Identifier that is not a reserved word.
    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Ident && !is_keyword(self.text)
    }

    /// Human readable form used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "EOF".to_string(),
            TokenKind::Semicolon if self.text.is_empty() => "newline".to_string(),
            TokenKind::Ident if !is_keyword(self.text) => format!("identifier '{}'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

/// A `//` or `/* */` comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'a> {
    pub text: &'a str,
    pub span: Span,
    pub start_line: usize,
    pub end_line: usize,
}

/// Lexer failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Result of tokenizing one file.
#[derive(Debug)]
pub struct Lexed<'a> {
    pub tokens: Vec<Token<'a>>,
    pub comments: Vec<Comment<'a>>,
}

const KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

// Longest operators first so greedy matching picks them.
const OPERATORS: [&str; 48] = [
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&",
    "|", "^", "<", ">", "=", "!", "~", "(", ")", "[", "]", "{", "}", ",", ";", ".", ":",
];

/// Tokenize Go source text.
pub fn tokenize(src: &str) -> Result<Lexed<'_>, LexError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token<'a>>,
    comments: Vec<Comment<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Lexed<'a>, LexError> {
        while let Some(c) = self.peek_char() {
            match c {
                '\n' => {
                    self.insert_semicolon(self.pos);
                    self.pos += 1;
                    self.line += 1;
                }
                ' ' | '\t' | '\r' | '\u{feff}' => self.pos += c.len_utf8(),
                '/' if self.rest().starts_with("//") => self.line_comment(),
                '/' if self.rest().starts_with("/*") => self.block_comment()?,
                '"' => self.interpreted_string('"', TokenKind::String)?,
                '\'' => self.interpreted_string('\'', TokenKind::Char)?,
                '`' => self.raw_string()?,
                c if c.is_alphabetic() || c == '_' => self.identifier(),
                c if c.is_ascii_digit() => self.number(),
                '.' if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                    self.number()
                }
                _ => self.operator()?,
            }
        }

        self.insert_semicolon(self.pos);
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: "",
            span: Span::new(self.src.len(), 0),
            line: self.line,
        });

        Ok(Lexed {
            tokens: self.tokens,
            comments: self.comments,
        })
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.tokens.push(Token {
            kind,
            text: &self.src[start..self.pos],
            span: Span::new(start, self.pos - start),
            line,
        });
    }

    /// Insert a semicolon if the previous token may end a statement.
    fn insert_semicolon(&mut self, at: usize) {
        let needed = self.tokens.last().is_some_and(|last| match last.kind {
            TokenKind::Ident => {
                !is_keyword(last.text)
                    || matches!(last.text, "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String => true,
            TokenKind::Op => matches!(last.text, ")" | "]" | "}" | "++" | "--"),
            TokenKind::Semicolon | TokenKind::Eof => false,
        });

        if needed {
            self.tokens.push(Token {
                kind: TokenKind::Semicolon,
                text: "",
                span: Span::new(at, 0),
                line: self.line,
            });
        }
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let len = self.rest().find('\n').unwrap_or(self.rest().len());
        self.pos += len;
        let text = self.src[start..self.pos].trim_end_matches('\r');
        self.comments.push(Comment {
            text,
            span: Span::new(start, self.pos - start),
            start_line: self.line,
            end_line: self.line,
        });
    }

    fn block_comment(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let Some(close) = self.rest()[2..].find("*/") else {
            return Err(LexError {
                message: "comment not terminated".to_string(),
                span: Span::new(start, 2),
            });
        };
        let end = start + 2 + close + 2;
        let text = &self.src[start..end];
        let newlines = text.matches('\n').count();

        // A comment spanning lines acts like a newline.
        if newlines > 0 {
            self.insert_semicolon(start);
        }

        self.comments.push(Comment {
            text,
            span: Span::new(start, end - start),
            start_line: self.line,
            end_line: self.line + newlines,
        });
        self.line += newlines;
        self.pos = end;
        Ok(())
    }

    fn interpreted_string(&mut self, quote: char, kind: TokenKind) -> Result<(), LexError> {
        let start = self.pos;
        let line = self.line;
        self.pos += 1;

        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    let what = if kind == TokenKind::Char {
                        "rune literal"
                    } else {
                        "string literal"
                    };
                    return Err(LexError {
                        message: format!("{what} not terminated"),
                        span: Span::new(start, self.pos - start),
                    });
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char()
                        && escaped != '\n'
                    {
                        self.pos += escaped.len_utf8();
                    }
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }

        self.push(kind, start, line);
        Ok(())
    }

    fn raw_string(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let line = self.line;
        let Some(close) = self.rest()[1..].find('`') else {
            return Err(LexError {
                message: "raw string literal not terminated".to_string(),
                span: Span::new(start, 1),
            });
        };
        self.pos = start + 1 + close + 1;
        self.line += self.src[start..self.pos].matches('\n').count();
        self.push(TokenKind::String, start, line);
        Ok(())
    }

    fn identifier(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek_char()
            && (c.is_alphanumeric() || c == '_')
        {
            self.pos += c.len_utf8();
        }
        self.push(TokenKind::Ident, start, self.line);
    }

    fn number(&mut self) {
        let start = self.pos;
        let hex = self.rest().starts_with("0x") || self.rest().starts_with("0X");
        let mut kind = TokenKind::Int;
        let mut prev = '\0';

        while let Some(c) = self.peek_char() {
            let exponent_sign = (c == '+' || c == '-')
                && if hex {
                    matches!(prev, 'p' | 'P')
                } else {
                    matches!(prev, 'e' | 'E')
                };

            if c == '.' {
                kind = TokenKind::Float;
            } else if !(c.is_ascii_alphanumeric() || c == '_' || exponent_sign) {
                break;
            }
            prev = c;
            self.pos += 1;
        }

        let text = &self.src[start..self.pos];
        if text.ends_with('i') {
            kind = TokenKind::Imag;
        } else if !hex && text.contains(['e', 'E']) || hex && text.contains(['p', 'P']) {
            kind = TokenKind::Float;
        }
        self.push(kind, start, self.line);
    }

    fn operator(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let Some(op) = OPERATORS.iter().find(|op| self.rest().starts_with(**op)) else {
            let c = self.peek_char().unwrap_or_default();
            return Err(LexError {
                message: format!("invalid character {c:?}"),
                span: Span::new(start, c.len_utf8()),
            });
        };
        let kind = if *op == ";" {
            TokenKind::Semicolon
        } else {
            TokenKind::Op
        };
        self.pos += op.len();
        self.push(kind, start, self.line);
        Ok(())
    }
}
