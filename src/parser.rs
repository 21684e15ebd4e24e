//! Expression front end: lexer and recursive descent parser
//!
//! Covers the expression grammar only: numbers with units, quoted strings,
//! identifiers (including hex colors and `!important`), `$variables`,
//! `namespace.property` access, unary and binary operators with the usual
//! precedence, parenthesised groups, function calls with keyword and `...`
//! spread arguments, comma/space lists, bracketed lists and `(key: value)`
//! maps. Binary nodes record whether they were parenthesised; the
//! division/separator heuristic downstream depends on that flag.
//!
//! A leading `-` attaches to an identifier when it is directly followed by
//! a letter (`-webkit-mask`), so subtraction between bare words needs
//! surrounding spaces, as in the language this grammar serves.

use crate::ast::{Arg, BinaryOp, Expr, UnaryOp};
use crate::error::{CompilerError, Result};
use crate::value::Separator;

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Number { value: f64, unit: Option<String> },
    Str(String),
    Ident(String),
    Variable(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Ellipsis,
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    line: usize,
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.line;
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                            None => {
                                return Err(CompilerError::parse(start, "Unterminated comment"))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut out = Vec::new();
        loop {
            self.skip_trivia()?;
            let line = self.line;
            let c = match self.peek() {
                Some(c) => c,
                None => break,
            };
            let tok = match c {
                b'0'..=b'9' => self.lex_number()?,
                b'.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => {
                    self.lex_number()?
                }
                b'.' if self.peek_at(1) == Some(b'.') && self.peek_at(2) == Some(b'.') => {
                    self.pos += 3;
                    Tok::Ellipsis
                }
                b'.' => {
                    self.bump();
                    Tok::Dot
                }
                b'"' | b'\'' => self.lex_string()?,
                b'$' => {
                    self.bump();
                    Tok::Variable(self.lex_name())
                }
                b'#' | b'!' => {
                    self.bump();
                    let mut name = String::from(c as char);
                    name.push_str(&self.lex_name());
                    Tok::Ident(name)
                }
                b'-' if self.peek_at(1).is_some_and(|d| d.is_ascii_alphabetic() || d == b'-') => {
                    Tok::Ident(self.lex_name())
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => Tok::Ident(self.lex_name()),
                b'(' => {
                    self.bump();
                    Tok::LParen
                }
                b')' => {
                    self.bump();
                    Tok::RParen
                }
                b'[' => {
                    self.bump();
                    Tok::LBracket
                }
                b']' => {
                    self.bump();
                    Tok::RBracket
                }
                b',' => {
                    self.bump();
                    Tok::Comma
                }
                b':' => {
                    self.bump();
                    Tok::Colon
                }
                b'+' => {
                    self.bump();
                    Tok::Plus
                }
                b'-' => {
                    self.bump();
                    Tok::Minus
                }
                b'*' => {
                    self.bump();
                    Tok::Star
                }
                b'/' => {
                    self.bump();
                    Tok::Slash
                }
                b'%' => {
                    self.bump();
                    Tok::Percent
                }
                b'=' if self.peek_at(1) == Some(b'=') => {
                    self.pos += 2;
                    Tok::EqEq
                }
                b'<' => {
                    self.bump();
                    if self.peek() == Some(b'=') {
                        self.bump();
                        Tok::Le
                    } else {
                        Tok::Lt
                    }
                }
                b'>' => {
                    self.bump();
                    if self.peek() == Some(b'=') {
                        self.bump();
                        Tok::Ge
                    } else {
                        Tok::Gt
                    }
                }
                other => {
                    return Err(CompilerError::parse(
                        line,
                        format!("Unexpected character '{}'", other as char),
                    ))
                }
            };
            // `!=` needs a second look because bare `!name` lexed as ident
            let tok = match tok {
                Tok::Ident(ref name) if name == "!" && self.peek() == Some(b'=') => {
                    self.bump();
                    Tok::NotEq
                }
                other => other,
            };
            out.push(Token { tok, line });
        }
        Ok(out)
    }

    fn lex_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'-' || c == b'_' {
                self.bump();
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    fn lex_number(&mut self) -> Result<Tok> {
        let start = self.pos;
        let line = self.line;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        let value: f64 = text
            .parse()
            .map_err(|_| CompilerError::parse(line, format!("Invalid number '{}'", text)))?;

        let unit_start = self.pos;
        if self.peek() == Some(b'%') {
            self.bump();
        } else {
            while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                self.bump();
            }
        }
        let unit = if self.pos > unit_start {
            Some(String::from_utf8_lossy(&self.src[unit_start..self.pos]).into_owned())
        } else {
            None
        };
        Ok(Tok::Number { value, unit })
    }

    fn lex_string(&mut self) -> Result<Tok> {
        let line = self.line;
        let quote = self.bump().unwrap();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some(b'\\') => match self.bump() {
                    Some(escaped) => text.push(escaped as char),
                    None => return Err(CompilerError::parse(line, "Unterminated string")),
                },
                Some(c) => text.push(c as char),
                None => return Err(CompilerError::parse(line, "Unterminated string")),
            }
        }
        Ok(Tok::Str(text))
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parse a complete expression; trailing input is an error.
pub fn parse_expression(src: &str) -> Result<Expr> {
    let mut parser = Parser::new(src)?;
    let expr = parser.parse_full()?;
    if let Some(token) = parser.peek_token() {
        return Err(CompilerError::parse(
            token.line,
            format!("Unexpected trailing input at '{}'", describe(&token.tok)),
        ));
    }
    Ok(expr)
}

impl Parser {
    fn new(src: &str) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(src).tokenize()?,
            pos: 0,
        })
    }

    fn peek_token(&self) -> Option<Token> {
        self.tokens.get(self.pos).cloned()
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|t| &t.tok)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Tok) -> Result<()> {
        let line = self.line();
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(CompilerError::parse(
                line,
                format!("Expected '{}'", describe(&tok)),
            ))
        }
    }

    /// Full expression: comma list of space lists.
    fn parse_full(&mut self) -> Result<Expr> {
        let line = self.line();
        let first = self.parse_space_list()?;
        if self.peek() != Some(&Tok::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&Tok::Comma) {
            if !self.starts_operand() {
                break; // trailing comma
            }
            items.push(self.parse_space_list()?);
        }
        Ok(Expr::List {
            items,
            separator: Separator::Comma,
            bracketed: false,
            line,
        })
    }

    /// One comma-list element: adjacent operands form a space list.
    fn parse_space_list(&mut self) -> Result<Expr> {
        let line = self.line();
        let first = self.parse_or()?;
        if !self.starts_operand() {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.starts_operand() {
            items.push(self.parse_or()?);
        }
        Ok(Expr::List {
            items,
            separator: Separator::Space,
            bracketed: false,
            line,
        })
    }

    /// Whether the next token begins a new operand rather than continuing
    /// the current one.
    fn starts_operand(&self) -> bool {
        match self.peek() {
            Some(Tok::Number { .. })
            | Some(Tok::Str(_))
            | Some(Tok::Variable(_))
            | Some(Tok::LParen)
            | Some(Tok::LBracket) => true,
            Some(Tok::Ident(name)) => name != "and" && name != "or",
            _ => false,
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let line = left.line();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right, line);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat_keyword("and") {
            let line = left.line();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right, line);
        }
        Ok(left)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Tok::Ident(name)) if name == keyword => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Some(Tok::EqEq) => BinaryOp::Equal,
                Some(Tok::NotEq) => BinaryOp::NotEqual,
                _ => break,
            };
            self.pos += 1;
            let line = left.line();
            let right = self.parse_relational()?;
            left = binary(op, left, right, line);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Lt) => BinaryOp::LessThan,
                Some(Tok::Gt) => BinaryOp::GreaterThan,
                Some(Tok::Le) => BinaryOp::LessThanOrEqual,
                Some(Tok::Ge) => BinaryOp::GreaterThanOrEqual,
                _ => break,
            };
            self.pos += 1;
            let line = left.line();
            let right = self.parse_additive()?;
            left = binary(op, left, right, line);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Plus) => BinaryOp::Add,
                Some(Tok::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.pos += 1;
            let line = left.line();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right, line);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Star) => BinaryOp::Multiply,
                Some(Tok::Slash) => BinaryOp::Divide,
                Some(Tok::Percent) => BinaryOp::Modulo,
                _ => break,
            };
            self.pos += 1;
            let line = left.line();
            let right = self.parse_unary()?;
            left = binary(op, left, right, line);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let line = self.line();
        if self.eat(&Tok::Plus) {
            return Ok(Expr::Unary {
                op: UnaryOp::Plus,
                operand: Box::new(self.parse_unary()?),
                line,
            });
        }
        if self.eat(&Tok::Minus) {
            return Ok(Expr::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(self.parse_unary()?),
                line,
            });
        }
        if self.eat_keyword("not") {
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(self.parse_unary()?),
                line,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self
            .bump()
            .ok_or_else(|| CompilerError::parse(self.line(), "Unexpected end of expression"))?;
        let line = token.line;
        match token.tok {
            Tok::Number { value, unit } => Ok(Expr::Number { value, unit, line }),
            Tok::Str(value) => Ok(Expr::Str {
                value,
                quoted: true,
                line,
            }),
            Tok::Variable(name) => Ok(Expr::Variable { name, line }),
            Tok::Ident(name) => {
                if self.peek() == Some(&Tok::LParen) {
                    self.pos += 1;
                    let args = self.parse_args()?;
                    return Ok(Expr::FunctionCall { name, args, line });
                }
                if self.peek() == Some(&Tok::Dot) {
                    if let Some(Tok::Ident(property)) = self.peek_at(1).cloned() {
                        self.pos += 2;
                        return Ok(Expr::PropertyAccess {
                            namespace: name,
                            property,
                            line,
                        });
                    }
                }
                Ok(Expr::Identifier { name, line })
            }
            Tok::LParen => self.parse_paren(line),
            Tok::LBracket => self.parse_bracketed(line),
            other => Err(CompilerError::parse(
                line,
                format!("Unexpected '{}'", describe(&other)),
            )),
        }
    }

    /// Parenthesised group: a map when a top-level `:` follows the first
    /// element, otherwise a grouped expression or comma list.
    fn parse_paren(&mut self, line: usize) -> Result<Expr> {
        if self.eat(&Tok::RParen) {
            // `()` is the empty map
            return Ok(Expr::Map {
                entries: Vec::new(),
                line,
            });
        }
        let first = self.parse_space_list()?;

        if self.eat(&Tok::Colon) {
            let value = self.parse_space_list()?;
            let mut entries = vec![(first, value)];
            while self.eat(&Tok::Comma) {
                if self.peek() == Some(&Tok::RParen) {
                    break;
                }
                let key = self.parse_space_list()?;
                self.expect(Tok::Colon)?;
                entries.push((key, self.parse_space_list()?));
            }
            self.expect(Tok::RParen)?;
            return Ok(Expr::Map { entries, line });
        }

        if self.peek() == Some(&Tok::Comma) {
            let mut items = vec![first];
            while self.eat(&Tok::Comma) {
                if self.peek() == Some(&Tok::RParen) {
                    break;
                }
                items.push(self.parse_space_list()?);
            }
            self.expect(Tok::RParen)?;
            return Ok(Expr::List {
                items,
                separator: Separator::Comma,
                bracketed: false,
                line,
            });
        }

        self.expect(Tok::RParen)?;
        Ok(mark_parenthesized(first))
    }

    fn parse_bracketed(&mut self, line: usize) -> Result<Expr> {
        let mut items = Vec::new();
        let mut separator = Separator::Space;
        while self.peek() != Some(&Tok::RBracket) {
            items.push(self.parse_space_list()?);
            if self.eat(&Tok::Comma) {
                separator = Separator::Comma;
            }
        }
        self.expect(Tok::RBracket)?;
        // a bracketed single space-list flattens into the outer list
        let items = match items.as_slice() {
            [Expr::List {
                items: inner,
                separator: Separator::Space,
                bracketed: false,
                ..
            }] if separator == Separator::Space => inner.clone(),
            _ => items,
        };
        Ok(Expr::List {
            items,
            separator,
            bracketed: true,
            line,
        })
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>> {
        let mut args = Vec::new();
        if self.eat(&Tok::RParen) {
            return Ok(args);
        }
        loop {
            // `$name: value` keyword argument
            if let (Some(Tok::Variable(name)), Some(Tok::Colon)) =
                (self.peek(), self.peek_at(1))
            {
                let name = name.clone();
                self.pos += 2;
                args.push(Arg::Keyword(name, self.parse_space_list()?));
            } else {
                let expr = self.parse_space_list()?;
                if self.eat(&Tok::Ellipsis) {
                    args.push(Arg::Spread(expr));
                } else {
                    args.push(Arg::Positional(expr));
                }
            }
            if !self.eat(&Tok::Comma) {
                break;
            }
            if self.peek() == Some(&Tok::RParen) {
                break;
            }
        }
        self.expect(Tok::RParen)?;
        Ok(args)
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr, line: usize) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        parenthesized: false,
        line,
    }
}

fn mark_parenthesized(expr: Expr) -> Expr {
    match expr {
        Expr::Binary {
            op,
            left,
            right,
            line,
            ..
        } => Expr::Binary {
            op,
            left,
            right,
            parenthesized: true,
            line,
        },
        other => other,
    }
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Number { value, unit } => match unit {
            Some(u) => format!("{}{}", value, u),
            None => value.to_string(),
        },
        Tok::Str(s) => format!("\"{}\"", s),
        Tok::Ident(name) => name.clone(),
        Tok::Variable(name) => format!("${}", name),
        Tok::LParen => "(".to_string(),
        Tok::RParen => ")".to_string(),
        Tok::LBracket => "[".to_string(),
        Tok::RBracket => "]".to_string(),
        Tok::Comma => ",".to_string(),
        Tok::Colon => ":".to_string(),
        Tok::Dot => ".".to_string(),
        Tok::Plus => "+".to_string(),
        Tok::Minus => "-".to_string(),
        Tok::Star => "*".to_string(),
        Tok::Slash => "/".to_string(),
        Tok::Percent => "%".to_string(),
        Tok::EqEq => "==".to_string(),
        Tok::NotEq => "!=".to_string(),
        Tok::Lt => "<".to_string(),
        Tok::Gt => ">".to_string(),
        Tok::Le => "<=".to_string(),
        Tok::Ge => ">=".to_string(),
        Tok::Ellipsis => "...".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_with_unit() {
        let expr = parse_expression("10.5px").unwrap();
        assert_eq!(
            expr,
            Expr::Number {
                value: 10.5,
                unit: Some("px".to_string()),
                line: 1
            }
        );
        assert_eq!(parse_expression(".5em").unwrap().to_css_string(), ".5em");
        assert_eq!(parse_expression("50%").unwrap().to_css_string(), "50%");
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary {
                op: BinaryOp::Add,
                right,
                ..
            } => assert!(matches!(
                *right,
                Expr::Binary {
                    op: BinaryOp::Multiply,
                    ..
                }
            )),
            other => panic!("expected addition at the top, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_flag() {
        let expr = parse_expression("16px/2").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                parenthesized: false,
                ..
            }
        ));

        let expr = parse_expression("(16px/2)").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                parenthesized: true,
                ..
            }
        ));
    }

    #[test]
    fn test_variables_and_property_access() {
        assert_eq!(
            parse_expression("$accent-color").unwrap(),
            Expr::Variable {
                name: "accent-color".to_string(),
                line: 1
            }
        );
        assert_eq!(
            parse_expression("theme.accent").unwrap(),
            Expr::PropertyAccess {
                namespace: "theme".to_string(),
                property: "accent".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_function_call_arguments() {
        let expr = parse_expression("rgb(255, 0, 0)").unwrap();
        match expr {
            Expr::FunctionCall { name, args, .. } => {
                assert_eq!(name, "rgb");
                assert_eq!(args.len(), 3);
                assert!(matches!(args[0], Arg::Positional(_)));
            }
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_and_spread_arguments() {
        let expr = parse_expression("adjust-color(#ff0000, $blue: 50)").unwrap();
        match expr {
            Expr::FunctionCall { args, .. } => {
                assert!(matches!(&args[1], Arg::Keyword(name, _) if name == "blue"));
            }
            other => panic!("expected a call, got {:?}", other),
        }

        let expr = parse_expression("rgb($channels...)").unwrap();
        match expr {
            Expr::FunctionCall { args, .. } => {
                assert!(matches!(&args[0], Arg::Spread(_)));
            }
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn test_space_and_comma_lists() {
        let expr = parse_expression("1px solid red").unwrap();
        match &expr {
            Expr::List {
                items, separator, ..
            } => {
                assert_eq!(items.len(), 3);
                assert_eq!(*separator, Separator::Space);
            }
            other => panic!("expected a list, got {:?}", other),
        }

        let expr = parse_expression("1px 2px, 3px 4px").unwrap();
        match &expr {
            Expr::List {
                items, separator, ..
            } => {
                assert_eq!(items.len(), 2);
                assert_eq!(*separator, Separator::Comma);
                assert!(matches!(items[0], Expr::List { .. }));
            }
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn test_bracketed_list() {
        let expr = parse_expression("[row1 row2]").unwrap();
        match expr {
            Expr::List {
                items, bracketed, ..
            } => {
                assert!(bracketed);
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn test_map_literal() {
        let expr = parse_expression("(small: 4px, large: 16px)").unwrap();
        match expr {
            Expr::Map { entries, .. } => {
                assert_eq!(entries.len(), 2);
                assert!(matches!(&entries[0].0, Expr::Identifier { name, .. } if name == "small"));
            }
            other => panic!("expected a map, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_and_logic() {
        let expr = parse_expression("1 < 2 and true").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));

        let expr = parse_expression("not null").unwrap();
        assert!(matches!(
            expr,
            Expr::Unary {
                op: UnaryOp::Not,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_numbers_and_hyphen_identifiers() {
        let expr = parse_expression("-5px").unwrap();
        assert!(matches!(
            expr,
            Expr::Unary {
                op: UnaryOp::Minus,
                ..
            }
        ));

        assert_eq!(
            parse_expression("-webkit-mask").unwrap(),
            Expr::Identifier {
                name: "-webkit-mask".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_hex_colors_and_important() {
        assert_eq!(
            parse_expression("#ff0000").unwrap(),
            Expr::Identifier {
                name: "#ff0000".to_string(),
                line: 1
            }
        );
        let expr = parse_expression("center !important").unwrap();
        assert!(matches!(expr, Expr::List { .. }));
    }

    #[test]
    fn test_quoted_strings() {
        let expr = parse_expression("\"Helvetica Neue\"").unwrap();
        assert_eq!(
            expr,
            Expr::Str {
                value: "Helvetica Neue".to_string(),
                quoted: true,
                line: 1
            }
        );
        assert_eq!(
            parse_expression("'single'").unwrap().to_css_string(),
            "\"single\""
        );
    }

    #[test]
    fn test_error_reporting() {
        let err = parse_expression("1 +").unwrap_err();
        assert!(err.to_string().contains("Parse error"));
        let err = parse_expression("rgb(1, 2").unwrap_err();
        assert!(err.to_string().contains("Expected ')'"));
    }
}
