//! Go type expressions.
//!
//! Types are kept as a small syntax tree and rendered back to text the way
//! `go/types.ExprString` does, so field type text in the generated code
//! matches what a Go programmer would write.

use std::fmt;

use crate::{
    lexer::{Span, Token, TokenKind},
    parser::{ParseError, ParseResult, Parser},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Name(String),
    Qualified { package: String, name: String },
    Generic { base: Box<TypeExpr>, args: Vec<TypeExpr> },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: String, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Func(Signature),
    Struct(Vec<FieldDecl>),
    Interface(Vec<InterfaceElem>),
    Paren(Box<TypeExpr>),
    Ellipsis(Box<TypeExpr>),
    /// `~T` in a constraint.
    Tilde(Box<TypeExpr>),
    /// `A | B` in a constraint.
    Union(Vec<TypeExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Raw literal including quotes.
    pub literal: String,
    pub span: Span,
}

/// One line of a struct body. Embedded fields have no names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub span: Span,
    pub tag: Option<Tag>,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    Method { name: String, sig: Signature },
    Type(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGroup {
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<ParamGroup>,
    pub results: Vec<ParamGroup>,
}

// =============================================================================
// Rendering
// =============================================================================

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => f.write_str(name),
            TypeExpr::Qualified { package, name } => write!(f, "{package}.{name}"),
            TypeExpr::Generic { base, args } => {
                write!(f, "{base}[")?;
                write_joined(f, args, ", ")?;
                f.write_str("]")
            }
            TypeExpr::Pointer(elem) => write!(f, "*{elem}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Func(sig) => write!(f, "func{sig}"),
            TypeExpr::Struct(fields) => {
                f.write_str("struct{")?;
                write_joined(f, fields, "; ")?;
                f.write_str("}")
            }
            TypeExpr::Interface(elems) => {
                f.write_str("interface{")?;
                write_joined(f, elems, "; ")?;
                f.write_str("}")
            }
            TypeExpr::Paren(inner) => write!(f, "({inner})"),
            TypeExpr::Ellipsis(elem) => write!(f, "...{elem}"),
            TypeExpr::Tilde(inner) => write!(f, "~{inner}"),
            TypeExpr::Union(terms) => write_joined(f, terms, " | "),
        }
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            return write!(f, "{}", self.ty);
        }
        let names: Vec<&str> = self.names.iter().map(|n| n.name.as_str()).collect();
        write!(f, "{} {}", names.join(", "), self.ty)
    }
}

impl fmt::Display for InterfaceElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceElem::Method { name, sig } => write!(f, "{name}{sig}"),
            InterfaceElem::Type(ty) => write!(f, "{ty}"),
        }
    }
}

impl fmt::Display for ParamGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} {}", self.names.join(", "), self.ty)
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_joined(f, &self.params, ", ")?;
        f.write_str(")")?;

        match self.results.as_slice() {
            [] => Ok(()),
            [single] if single.names.is_empty() => write!(f, " {}", single.ty),
            results => {
                f.write_str(" (")?;
                write_joined(f, results, ", ")?;
                f.write_str(")")
            }
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

const BINARY_OPS: [&str; 19] = [
    "+", "-", "*", "/", "%", "&", "|", "^", "<<", ">>", "&^", "&&", "||", "==", "!=", "<", "<=",
    ">", ">=",
];

/// Constant expression text with `ExprString` spacing: binary operators get a
/// space on each side, commas are followed by one, everything else is joined.
fn expr_text(tokens: &[Token<'_>]) -> String {
    let mut text = String::new();
    let mut prev: Option<&Token<'_>> = None;

    for tok in tokens {
        if tok.kind == TokenKind::Op
            && BINARY_OPS.contains(&tok.text)
            && prev.is_some_and(ends_operand)
        {
            text.push(' ');
            text.push_str(tok.text);
            text.push(' ');
        } else if tok.is_op(",") {
            text.push_str(", ");
        } else {
            text.push_str(tok.text);
        }
        prev = Some(tok);
    }

    text
}

fn ends_operand(tok: &Token<'_>) -> bool {
    match tok.kind {
        TokenKind::Op => matches!(tok.text, ")" | "]" | "}"),
        TokenKind::Semicolon | TokenKind::Eof => false,
        _ => true,
    }
}

enum ParamItem {
    Named(String, TypeExpr),
    Bare(TypeExpr),
}

impl Parser<'_> {
    pub fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let tok = *self.peek();
        match tok.kind {
            TokenKind::Ident => match tok.text {
                "map" => {
                    self.advance();
                    self.expect_op("[")?;
                    let key = self.parse_type()?;
                    self.expect_op("]")?;
                    let value = self.parse_type()?;
                    Ok(TypeExpr::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    })
                }
                "chan" => {
                    self.advance();
                    let dir = if self.peek().is_op("<-") {
                        self.advance();
                        ChanDir::Send
                    } else {
                        ChanDir::Both
                    };
                    let elem = self.parse_type()?;
                    Ok(TypeExpr::Chan {
                        dir,
                        elem: Box::new(elem),
                    })
                }
                "func" => {
                    self.advance();
                    Ok(TypeExpr::Func(self.parse_signature()?))
                }
                "struct" => {
                    self.advance();
                    Ok(TypeExpr::Struct(self.parse_struct_body()?))
                }
                "interface" => {
                    self.advance();
                    Ok(TypeExpr::Interface(self.parse_interface_body()?))
                }
                _ if tok.is_name() => self.parse_type_name(),
                _ => Err(self.error_expected("type")),
            },
            TokenKind::Op => match tok.text {
                "*" => {
                    self.advance();
                    Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
                }
                "[" => {
                    self.advance();
                    if self.peek().is_op("]") {
                        self.advance();
                        return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                    }
                    let len = self.collect_until_close("]")?;
                    let elem = self.parse_type()?;
                    Ok(TypeExpr::Array {
                        len,
                        elem: Box::new(elem),
                    })
                }
                "<-" => {
                    self.advance();
                    self.expect_keyword("chan")?;
                    let elem = self.parse_type()?;
                    Ok(TypeExpr::Chan {
                        dir: ChanDir::Recv,
                        elem: Box::new(elem),
                    })
                }
                "(" => {
                    self.advance();
                    let inner = self.parse_type()?;
                    self.expect_op(")")?;
                    Ok(TypeExpr::Paren(Box::new(inner)))
                }
                "..." => {
                    self.advance();
                    Ok(TypeExpr::Ellipsis(Box::new(self.parse_type()?)))
                }
                _ => Err(self.error_expected("type")),
            },
            _ => Err(self.error_expected("type")),
        }
    }

    fn parse_type_name(&mut self) -> ParseResult<TypeExpr> {
        let first = self.expect_name()?;
        let mut ty = if self.peek().is_op(".") {
            self.advance();
            let name = self.expect_name()?;
            TypeExpr::Qualified {
                package: first.text.to_string(),
                name: name.text.to_string(),
            }
        } else {
            TypeExpr::Name(first.text.to_string())
        };

        if self.peek().is_op("[") {
            self.advance();
            let mut args = Vec::new();
            while !self.peek().is_op("]") {
                args.push(self.parse_type()?);
                if !self.peek().is_op(",") {
                    break;
                }
                self.advance();
            }
            self.expect_op("]")?;
            ty = TypeExpr::Generic {
                base: Box::new(ty),
                args,
            };
        }

        Ok(ty)
    }

    /// Expression text up to the closing bracket, which is consumed.
    fn collect_until_close(&mut self, close: &str) -> ParseResult<String> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
            let tok = *self.peek();
            if tok.kind == TokenKind::Eof {
                return Err(self.error_expected(&format!("'{close}'")));
            }
            if tok.kind == TokenKind::Op {
                match tok.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" if depth == 0 => {
                        self.expect_op(close)?;
                        return Ok(expr_text(&tokens));
                    }
                    ")" | "]" | "}" => depth -= 1,
                    _ => {}
                }
            }
            tokens.push(tok);
            self.advance();
        }
    }

    // =========================================================================
    // Structs
    // =========================================================================

    pub fn parse_struct_body(&mut self) -> ParseResult<Vec<FieldDecl>> {
        self.expect_op("{")?;
        let mut fields = Vec::new();

        loop {
            let tok = *self.peek();
            if tok.kind == TokenKind::Semicolon {
                self.advance();
                continue;
            }
            if tok.is_op("}") {
                break;
            }
            fields.push(self.parse_field_decl()?);
            self.expect_semicolon()?;
        }

        self.expect_op("}")?;
        Ok(fields)
    }

    fn parse_field_decl(&mut self) -> ParseResult<FieldDecl> {
        let start = self.peek().span;

        let names = if self.peek().is_op("*") {
            Vec::new()
        } else if self.peek().is_name() {
            if self.is_embedded_field() {
                Vec::new()
            } else {
                self.parse_field_names()?
            }
        } else {
            return Err(self.error_expected("field name or embedded type"));
        };

        let ty = self.parse_type()?;
        let mut span = start.to(self.previous_span());

        let tag = if self.peek().kind == TokenKind::String {
            let tok = self.advance();
            span = start.to(tok.span);
            Some(Tag {
                literal: tok.text.to_string(),
                span: tok.span,
            })
        } else {
            None
        };

        Ok(FieldDecl {
            names,
            ty,
            span,
            tag,
        })
    }

    /// Decide from the tokens after a leading identifier whether the field
    /// is embedded (`T`, `pkg.T`, `T[int]`) or named (`F T`, `A, B T`).
    fn is_embedded_field(&self) -> bool {
        let next = self.peek_at(1);
        if next.is_op(".") || next.is_op("}") || next.kind == TokenKind::Semicolon {
            return true;
        }
        if next.kind == TokenKind::String {
            return true;
        }
        if next.is_op("[") {
            if self.peek_at(2).is_op("]") {
                return false;
            }
            let open = self.position() + 1;
            return match self.matching_close(open) {
                Some(close) => {
                    let after = self.token(close + 1);
                    after.kind == TokenKind::Semicolon
                        || after.is_op("}")
                        || after.kind == TokenKind::String
                }
                None => false,
            };
        }
        false
    }

    fn parse_field_names(&mut self) -> ParseResult<Vec<Ident>> {
        let mut names = Vec::new();
        loop {
            let tok = self.expect_name()?;
            names.push(Ident {
                name: tok.text.to_string(),
                span: tok.span,
            });
            if !self.peek().is_op(",") {
                return Ok(names);
            }
            self.advance();
        }
    }

    // =========================================================================
    // Interfaces
    // =========================================================================

    fn parse_interface_body(&mut self) -> ParseResult<Vec<InterfaceElem>> {
        self.expect_op("{")?;
        let mut elems = Vec::new();

        loop {
            let tok = *self.peek();
            if tok.kind == TokenKind::Semicolon {
                self.advance();
                continue;
            }
            if tok.is_op("}") {
                break;
            }

            if tok.is_name() && self.peek_at(1).is_op("(") {
                self.advance();
                let sig = self.parse_signature()?;
                elems.push(InterfaceElem::Method {
                    name: tok.text.to_string(),
                    sig,
                });
            } else {
                elems.push(InterfaceElem::Type(self.parse_union()?));
            }
            self.expect_semicolon()?;
        }

        self.expect_op("}")?;
        Ok(elems)
    }

    fn parse_union(&mut self) -> ParseResult<TypeExpr> {
        let mut terms = vec![self.parse_term()?];
        while self.peek().is_op("|") {
            self.advance();
            terms.push(self.parse_term()?);
        }
        if terms.len() == 1 {
            Ok(terms.remove(0))
        } else {
            Ok(TypeExpr::Union(terms))
        }
    }

    fn parse_term(&mut self) -> ParseResult<TypeExpr> {
        if self.peek().is_op("~") {
            self.advance();
            return Ok(TypeExpr::Tilde(Box::new(self.parse_type()?)));
        }
        self.parse_type()
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    fn parse_signature(&mut self) -> ParseResult<Signature> {
        let params = self.parse_params()?;
        let results = if self.peek().is_op("(") {
            self.parse_params()?
        } else if self.starts_type() {
            vec![ParamGroup {
                names: Vec::new(),
                ty: self.parse_type()?,
            }]
        } else {
            Vec::new()
        };
        Ok(Signature { params, results })
    }

    fn starts_type(&self) -> bool {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Ident => {
                tok.is_name() || matches!(tok.text, "func" | "map" | "chan" | "struct" | "interface")
            }
            TokenKind::Op => matches!(tok.text, "*" | "[" | "(" | "<-"),
            _ => false,
        }
    }

    fn parse_params(&mut self) -> ParseResult<Vec<ParamGroup>> {
        let open = self.expect_op("(")?;
        let mut items = Vec::new();

        while !self.peek().is_op(")") {
            items.push(self.parse_param_item()?);
            if !self.peek().is_op(",") {
                break;
            }
            self.advance();
        }
        self.expect_op(")")?;

        group_params(items).map_err(|message| ParseError::new(message, open.span))
    }

    fn parse_param_item(&mut self) -> ParseResult<ParamItem> {
        if self.peek().is_name() && self.param_name_follows() {
            let name = self.advance().text.to_string();
            return Ok(ParamItem::Named(name, self.parse_type()?));
        }
        Ok(ParamItem::Bare(self.parse_type()?))
    }

    /// A parameter name is followed by its type.
    fn param_name_follows(&self) -> bool {
        let next = self.peek_at(1);
        match next.kind {
            TokenKind::Ident => true,
            TokenKind::Op => match next.text {
                "*" | "(" | "<-" | "..." => true,
                "[" => {
                    if self.peek_at(2).is_op("]") {
                        return true;
                    }
                    // `a [4]T` has a type after the bracket, `T[int]` does not.
                    match self.matching_close(self.position() + 1) {
                        Some(close) => {
                            let after = self.token(close + 1);
                            !(after.is_op(",") || after.is_op(")"))
                        }
                        None => false,
                    }
                }
                _ => false,
            },
            _ => false,
        }
    }
}

fn group_params(items: Vec<ParamItem>) -> Result<Vec<ParamGroup>, String> {
    let any_named = items.iter().any(|item| matches!(item, ParamItem::Named(..)));
    if !any_named {
        return Ok(items
            .into_iter()
            .map(|item| match item {
                ParamItem::Bare(ty) | ParamItem::Named(_, ty) => ParamGroup {
                    names: Vec::new(),
                    ty,
                },
            })
            .collect());
    }

    let mut groups = Vec::new();
    let mut pending = Vec::new();
    for item in items {
        match item {
            ParamItem::Bare(TypeExpr::Name(name)) => pending.push(name),
            ParamItem::Bare(_) => return Err("mixed named and unnamed parameters".to_string()),
            ParamItem::Named(name, ty) => {
                pending.push(name);
                groups.push(ParamGroup {
                    names: std::mem::take(&mut pending),
                    ty,
                });
            }
        }
    }
    if !pending.is_empty() {
        return Err("mixed named and unnamed parameters".to_string());
    }
    Ok(groups)
}
