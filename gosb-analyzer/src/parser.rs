//! Declaration-level parser for the subset of Go the analyzer needs.
//!
//! Understands the package clause, import declarations and type
//! declarations. Function, variable and constant declarations are skipped by
//! balancing brackets up to the terminating semicolon.

use crate::{
    lexer::{self, Comment, LexError, Lexed, Span, Token, TokenKind},
    types::TypeExpr,
};

/// Syntax error with the offending source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self::new(err.message, err.span)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parsed compilation unit, reduced to what generation needs.
#[derive(Debug)]
pub struct SourceFile<'a> {
    pub package: &'a str,
    pub imports: Vec<ImportSpec<'a>>,
    pub types: Vec<TypeSpec<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec<'a> {
    /// Explicit package name, `.` or `_`.
    pub name: Option<&'a str>,
    /// Import path literal including its quotes.
    pub path: &'a str,
}

#[derive(Debug)]
pub struct TypeSpec<'a> {
    pub name: &'a str,
    pub span: Span,
    /// Range of the type parameter list, for generic types.
    pub type_params: Option<Span>,
    pub ty: TypeExpr,
    /// The spec's own doc comments.
    pub doc: Vec<&'a str>,
    /// Doc comments of the enclosing `type (...)` group.
    pub group_doc: Vec<&'a str>,
    /// Ordinal of the enclosing `type (...)` group among all groups.
    pub group: Option<usize>,
}

/// Parse Go source text.
pub fn parse(src: &str) -> ParseResult<SourceFile<'_>> {
    let lexed = lexer::tokenize(src)?;
    Parser::new(lexed).parse_file()
}

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    comments: Vec<Comment<'a>>,
    pos: usize,
    type_groups: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexed: Lexed<'a>) -> Self {
        Self {
            tokens: lexed.tokens,
            comments: lexed.comments,
            pos: 0,
            type_groups: 0,
        }
    }

    pub fn parse_file(mut self) -> ParseResult<SourceFile<'a>> {
        self.expect_keyword("package")?;
        let package = self.expect_name()?.text;
        self.expect_semicolon()?;

        let mut imports = Vec::new();
        while self.peek().is_keyword("import") {
            self.parse_import_decl(&mut imports)?;
        }

        let mut types = Vec::new();
        loop {
            let tok = *self.peek();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::Ident if tok.text == "type" => self.parse_type_decl(&mut types)?,
                TokenKind::Ident if matches!(tok.text, "func" | "var" | "const") => {
                    self.skip_decl()?
                }
                TokenKind::Ident if tok.text == "import" => {
                    return Err(ParseError::new(
                        "imports must appear before other declarations",
                        tok.span,
                    ));
                }
                _ => {
                    return Err(ParseError::new(
                        "non-declaration statement outside function body",
                        tok.span,
                    ));
                }
            }
        }

        Ok(SourceFile {
            package,
            imports,
            types,
        })
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_import_decl(&mut self, imports: &mut Vec<ImportSpec<'a>>) -> ParseResult<()> {
        self.expect_keyword("import")?;

        if self.peek().is_op("(") {
            self.advance();
            loop {
                match *self.peek() {
                    tok if tok.kind == TokenKind::Semicolon => {
                        self.advance();
                    }
                    tok if tok.is_op(")") => break,
                    _ => {
                        imports.push(self.parse_import_spec()?);
                        self.expect_semicolon()?;
                    }
                }
            }
            self.expect_op(")")?;
        } else {
            imports.push(self.parse_import_spec()?);
        }

        self.expect_semicolon()
    }

    fn parse_import_spec(&mut self) -> ParseResult<ImportSpec<'a>> {
        let name = if self.peek().is_name() || self.peek().is_op(".") {
            Some(self.advance().text)
        } else {
            None
        };

        if self.peek().kind != TokenKind::String {
            return Err(self.error_expected("import path"));
        }
        let path = self.advance().text;

        Ok(ImportSpec { name, path })
    }

    fn parse_type_decl(&mut self, types: &mut Vec<TypeSpec<'a>>) -> ParseResult<()> {
        let doc = self.lead_doc(self.pos);
        self.expect_keyword("type")?;

        if self.peek().is_op("(") {
            self.advance();
            let group = self.type_groups;
            self.type_groups += 1;
            loop {
                match *self.peek() {
                    tok if tok.kind == TokenKind::Semicolon => {
                        self.advance();
                    }
                    tok if tok.is_op(")") => break,
                    _ => {
                        let spec_doc = self.lead_doc(self.pos);
                        let mut spec = self.parse_type_spec(spec_doc)?;
                        spec.group_doc = doc.clone();
                        spec.group = Some(group);
                        types.push(spec);
                        self.expect_semicolon()?;
                    }
                }
            }
            self.expect_op(")")?;
        } else {
            types.push(self.parse_type_spec(doc)?);
        }

        self.expect_semicolon()
    }

    fn parse_type_spec(&mut self, doc: Vec<&'a str>) -> ParseResult<TypeSpec<'a>> {
        let name = self.expect_name()?;

        let mut type_params = None;
        if self.peek().is_op("[") && self.starts_type_params() {
            let open = self.pos;
            let close = self
                .matching_close(open)
                .ok_or_else(|| self.error_expected("']'"))?;
            type_params = Some(self.tokens[open].span.to(self.tokens[close].span));
            self.pos = close + 1;
        }

        // Alias declarations (`type A = B`) are treated like definitions.
        if self.peek().is_op("=") {
            self.advance();
        }

        let ty = self.parse_type()?;

        Ok(TypeSpec {
            name: name.text,
            span: name.span,
            type_params,
            ty,
            doc,
            group_doc: Vec::new(),
            group: None,
        })
    }

    /// `[T any]` opens a type parameter list, `[]T` and `[N]T` do not.
    fn starts_type_params(&self) -> bool {
        self.peek_at(1).is_name() && !self.peek_at(2).is_op("]")
    }

    fn skip_decl(&mut self) -> ParseResult<()> {
        let start = self.advance();
        let mut depth = 0usize;

        loop {
            let tok = *self.peek();
            match tok.kind {
                TokenKind::Eof if depth > 0 => {
                    return Err(ParseError::new("unexpected EOF", tok.span));
                }
                TokenKind::Eof => return Ok(()),
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Op if matches!(tok.text, "(" | "[" | "{") => depth += 1,
                TokenKind::Op if matches!(tok.text, ")" | "]" | "}") => {
                    if depth == 0 {
                        return Err(ParseError::new(
                            format!("unexpected {} in {} declaration", tok.describe(), start.text),
                            tok.span,
                        ));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // =========================================================================
    // Doc comments
    // =========================================================================

    /// Comment texts of the lead comment group before token `index`.
    ///
    /// The group must end on the line directly above the token. Comments on
    /// the same line as the previous token belong to that token instead.
    fn lead_doc(&self, index: usize) -> Vec<&'a str> {
        let tok = &self.tokens[index];
        let (prev_end, prev_line) = match index.checked_sub(1).map(|i| &self.tokens[i]) {
            Some(prev) => (prev.span.end(), Some(prev.line)),
            None => (0, None),
        };

        let candidates: Vec<&Comment<'a>> = self
            .comments
            .iter()
            .filter(|c| c.span.offset >= prev_end && c.span.end() <= tok.span.offset)
            .skip_while(|c| Some(c.start_line) == prev_line)
            .collect();

        let Some(last) = candidates.last() else {
            return Vec::new();
        };
        if last.end_line + 1 != tok.line {
            return Vec::new();
        }

        // Walk back while comments are on adjacent lines.
        let mut first = candidates.len() - 1;
        while first > 0 && candidates[first].start_line <= candidates[first - 1].end_line + 1 {
            first -= 1;
        }

        candidates[first..].iter().map(|c| c.text).collect()
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    pub(crate) fn peek(&self) -> &Token<'a> {
        &self.tokens[self.pos]
    }

    pub(crate) fn peek_at(&self, n: usize) -> &Token<'a> {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn token(&self, index: usize) -> &Token<'a> {
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    pub(crate) fn advance(&mut self) -> Token<'a> {
        let tok = self.tokens[self.pos];
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .map(|i| self.tokens[i].span)
            .unwrap_or_default()
    }

    pub(crate) fn expect_op(&mut self, op: &str) -> ParseResult<Token<'a>> {
        if self.peek().is_op(op) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(&format!("'{op}'")))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Token<'a>> {
        if self.peek().is_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(&format!("'{keyword}'")))
        }
    }

    pub(crate) fn expect_name(&mut self) -> ParseResult<Token<'a>> {
        if self.peek().is_name() {
            Ok(self.advance())
        } else {
            Err(self.error_expected("identifier"))
        }
    }

    /// Consume a statement terminator. It may be omitted before a closing
    /// `)` or `}` and at the end of the file.
    pub(crate) fn expect_semicolon(&mut self) -> ParseResult<()> {
        let tok = self.peek();
        if tok.kind == TokenKind::Semicolon {
            self.advance();
            Ok(())
        } else if tok.is_op(")") || tok.is_op("}") || tok.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.error_expected("';'"))
        }
    }

    pub(crate) fn error_expected(&self, what: &str) -> ParseError {
        let tok = self.peek();
        ParseError::new(format!("expected {what}, found {}", tok.describe()), tok.span)
    }

    /// Index of the bracket closing the one at `open`.
    pub(crate) fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, tok) in self.tokens.iter().enumerate().skip(open) {
            if tok.kind != TokenKind::Op {
                continue;
            }
            match tok.text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }
}
