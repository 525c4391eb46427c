//! Recursive-descent tree builder.
//!
//! Consumes the token stream and builds a `Document`. Parsing is
//! all-or-nothing: the first error (lexical or structural) aborts and no
//! partial tree escapes.
//!
//! Top-level elements become children of the document's anonymous root,
//! so input with multiple top-level elements is accepted. Processing
//! instructions are parsed into detached nodes, inspected (the `xml`
//! declaration gets a version and encoding check), and never attached.
//! A `<!DOCTYPE ...>` declaration contributes only the doctype name.

use std::io::Read;

use crate::error::Error;
use crate::parser::tokenizer::{Token, Tokenizer};
use crate::parser::ParseOptions;
use crate::tree::{Document, NodeId};

pub(crate) struct TreeBuilder<R: Read> {
    tokens: Tokenizer<R>,
    options: ParseOptions,
}

impl<R: Read> TreeBuilder<R> {
    pub(crate) fn new(tokens: Tokenizer<R>, options: &ParseOptions) -> Self {
        Self {
            tokens,
            options: options.clone(),
        }
    }

    pub(crate) fn parse(mut self) -> Result<Document, Error> {
        let mut doc = Document::new();
        let root = match doc.root() {
            Some(root) => root,
            None => unreachable!("a fresh document always has a root"),
        };
        self.parse_content(&mut doc, root, 0)?;
        Ok(doc)
    }

    /// Parses the content of `cur` until its end tag (or, for the
    /// anonymous root, end of input).
    fn parse_content(&mut self, doc: &mut Document, cur: NodeId, depth: u32) -> Result<(), Error> {
        loop {
            match self.tokens.next_token()? {
                Token::EndOfInput => {
                    if doc.parent(cur).is_some() {
                        let name = doc.name(cur).unwrap_or("").to_string();
                        return Err(self
                            .tokens
                            .fatal(format!("unexpected end of input inside element '{name}'"))
                            .into());
                    }
                    return Ok(());
                }
                Token::Text(text) => doc.set_text(cur, text),
                Token::TagOpen => {
                    let name = self.expect_identifier("element name after '<'")?;
                    if depth >= self.options.max_depth {
                        return Err(self
                            .tokens
                            .fatal(format!(
                                "element '{name}' exceeds maximum nesting depth {}",
                                self.options.max_depth
                            ))
                            .into());
                    }
                    log::trace!("open element '{name}' at {}", self.tokens.location());
                    let child = doc.create_element(cur, &name);
                    match self.parse_attributes(doc, child)? {
                        Token::TagClose => self.parse_content(doc, child, depth + 1)?,
                        Token::SelfCloseClose => {}
                        tok => {
                            return Err(self
                                .tokens
                                .fatal(format!(
                                    "unexpected {} closing element '{name}'",
                                    tok.describe()
                                ))
                                .into());
                        }
                    }
                }
                Token::EndTagOpen => {
                    let name = self.expect_identifier("element name after '</'")?;
                    self.expect_tag_close(&name)?;
                    if doc.parent(cur).is_none() {
                        return Err(self
                            .tokens
                            .fatal(format!("stray end tag '</{name}>'"))
                            .into());
                    }
                    let open = doc.name(cur).unwrap_or("").to_string();
                    if open != name {
                        return Err(self
                            .tokens
                            .fatal(format!(
                                "mismatched end tag '</{name}>', element '{open}' is open"
                            ))
                            .into());
                    }
                    log::trace!("close element '{name}'");
                    return Ok(());
                }
                Token::DeclOpen => self.parse_doctype(doc)?,
                Token::PiOpen => self.parse_pi(doc)?,
                tok => {
                    return Err(self
                        .tokens
                        .fatal(format!("unexpected {}", tok.describe()))
                        .into());
                }
            }
        }
    }

    /// Parses an attribute list. Returns the terminator token (`>`,
    /// `/>`, or `?>`); validating the terminator is the caller's job.
    ///
    /// Duplicate names overwrite: the last occurrence wins.
    fn parse_attributes(&mut self, doc: &mut Document, node: NodeId) -> Result<Token, Error> {
        let mut pending: Option<Token> = None;
        loop {
            let tok = match pending.take() {
                Some(tok) => tok,
                None => self.tokens.next_token()?,
            };
            match tok {
                Token::TagClose | Token::SelfCloseClose | Token::PiClose => return Ok(tok),
                Token::Identifier(name) => match self.tokens.next_token()? {
                    Token::Equals => match self.tokens.next_token()? {
                        Token::QuotedString(value) => {
                            doc.set_attribute(node, &name, Some(&value));
                        }
                        tok => {
                            return Err(self
                                .tokens
                                .fatal(format!(
                                    "expected quoted value for attribute '{name}', found {}",
                                    tok.describe()
                                ))
                                .into());
                        }
                    },
                    // valueless attribute; the token belongs to the next round
                    tok => {
                        doc.set_attribute(node, &name, None);
                        pending = Some(tok);
                    }
                },
                tok => {
                    return Err(self
                        .tokens
                        .fatal(format!("unexpected {} in attribute list", tok.describe()))
                        .into());
                }
            }
        }
    }

    /// Parses `<!DOCTYPE name ...>`. The first identifier after the
    /// keyword becomes the document's doctype, unless one is already
    /// set. Until the closing `>`, only identifiers and quoted strings
    /// are accepted.
    fn parse_doctype(&mut self, doc: &mut Document) -> Result<(), Error> {
        match self.tokens.next_token()? {
            Token::Identifier(kw) if kw == "DOCTYPE" => {}
            tok => {
                return Err(self
                    .tokens
                    .fatal(format!("expected DOCTYPE keyword, found {}", tok.describe()))
                    .into());
            }
        }
        loop {
            match self.tokens.next_token()? {
                Token::TagClose => return Ok(()),
                Token::Identifier(name) => {
                    if doc.doctype().is_none() {
                        doc.set_doctype(name);
                    }
                }
                Token::QuotedString(_) => {}
                tok => {
                    return Err(self
                        .tokens
                        .fatal(format!(
                            "unexpected {} in DOCTYPE declaration",
                            tok.describe()
                        ))
                        .into());
                }
            }
        }
    }

    /// Parses a processing instruction into a detached node and hands it
    /// to the PI hook. The node is never attached to the tree.
    fn parse_pi(&mut self, doc: &mut Document) -> Result<(), Error> {
        let target = self.expect_identifier("processing instruction target")?;
        let pi = doc.create_node(Some(&target));
        match self.parse_attributes(doc, pi)? {
            Token::PiClose => {}
            tok => {
                return Err(self
                    .tokens
                    .fatal(format!(
                        "unexpected {} closing processing instruction '{target}'",
                        tok.describe()
                    ))
                    .into());
            }
        }
        self.process_pi(doc, pi, &target);
        Ok(())
    }

    /// PI hook. The `xml` declaration gets its pseudo-attributes
    /// checked; problems are warnings, never errors.
    fn process_pi(&self, doc: &Document, pi: NodeId, target: &str) {
        if !target.eq_ignore_ascii_case("xml") {
            return;
        }
        if let Some(version) = doc.attribute_value(pi, "version") {
            if version != "1.0" {
                log::warn!(
                    "{}: unsupported document version \"{version}\"",
                    self.tokens.location()
                );
            }
        }
        if let Some(encoding) = doc.attribute_value(pi, "encoding") {
            let utf8 =
                encoding.eq_ignore_ascii_case("utf8") || encoding.eq_ignore_ascii_case("utf-8");
            if !utf8 {
                log::warn!(
                    "{}: document encoding \"{encoding}\" is not UTF-8, \
                     invalid sequences are replaced",
                    self.tokens.location()
                );
            }
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, Error> {
        match self.tokens.next_token()? {
            Token::Identifier(name) => Ok(name),
            tok => Err(self
                .tokens
                .fatal(format!("expected {what}, found {}", tok.describe()))
                .into()),
        }
    }

    fn expect_tag_close(&mut self, name: &str) -> Result<(), Error> {
        match self.tokens.next_token()? {
            Token::TagClose => Ok(()),
            tok => Err(self
                .tokens
                .fatal(format!(
                    "expected '>' after end tag '</{name}', found {}",
                    tok.describe()
                ))
                .into()),
        }
    }
}
