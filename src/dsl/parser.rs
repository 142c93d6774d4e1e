//! Parser for the netlist DSL.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::components::ElementKind;
use crate::error::{PhyError, Result};

/// Parser for the netlist DSL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier if self.current.text.eq_ignore_ascii_case("wire") => {
                    let wire = self.parse_wire()?;
                    ast.wires.push(wire);
                }
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(PhyError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            self.end_of_line()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(PhyError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(PhyError::parse(
                self.current.line,
                format!("unexpected trailing token: {:?}", self.current.text),
            )),
        }
    }

    fn parse_directive(&mut self, ast: &mut CircuitAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".analysis" => {
                let kind = self.expect(TokenKind::Identifier)?;
                ast.analysis = Some(kind.text);
            }
            _ => {
                return Err(PhyError::parse(line, format!("unknown directive: {}", directive)));
            }
        }

        Ok(())
    }

    fn parse_pin(&mut self) -> Result<PinSpec> {
        let component = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::Colon)?;
        let pin = self.expect(TokenKind::Identifier)?.text;
        Ok(PinSpec { component, pin })
    }

    fn parse_wire(&mut self) -> Result<WireDef> {
        let line = self.current.line;
        self.advance()?;
        let a = self.parse_pin()?;
        let b = self.parse_pin()?;
        Ok(WireDef { a, b, line })
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = ElementKind::from_keyword(&keyword).ok_or_else(|| PhyError::UnknownElementType {
            element_type: keyword.clone(),
            line,
        })?;
        let name = self.expect(TokenKind::Identifier)?.text;

        let mut params = HashMap::new();
        while self.current.kind == TokenKind::Identifier {
            let param = self.current.text.to_lowercase();
            self.advance()?;
            self.expect(TokenKind::Equals)?;

            let value = match self.current.kind {
                TokenKind::Number => parse_value(&self.current.text),
                TokenKind::Identifier => match self.current.text.to_lowercase().as_str() {
                    "true" | "on" => Some(1.0),
                    "false" | "off" => Some(0.0),
                    _ => None,
                },
                _ => None,
            }
            .ok_or_else(|| {
                PhyError::invalid_component(
                    &name,
                    line,
                    format!("invalid value {:?} for '{}'", self.current.text, param),
                )
            })?;
            self.advance()?;

            if params.insert(param.clone(), value).is_some() {
                return Err(PhyError::invalid_component(
                    &name,
                    line,
                    format!("parameter '{}' given twice", param),
                ));
            }
        }

        Ok(ComponentDef {
            kind,
            name,
            params,
            line,
        })
    }
}
