//! Tag-level tokenizer.
//!
//! A three-state machine over the character source:
//!
//! - `Initial` — between tags. Produces `Text` tokens (with entities
//!   expanded and blank lines collapsed) and dispatches the `<` family
//!   into Tag state. Comments are consumed here and never surfaced;
//!   CDATA sections come back as verbatim `Text` tokens.
//! - `Tag` — inside `<...>`. Produces the structural tokens plus
//!   identifiers and quoted strings. Whitespace separates tokens and is
//!   discarded.
//! - `Error` — terminal. Entered on the first lexical error; every
//!   subsequent request fails immediately.
//!
//! Whitespace ahead of a tag is buffered and dropped once the `<` is
//! seen, so indentation between elements never turns into text. The same
//! whitespace is kept when real character data follows it.

use std::io::Read;

use crate::error::{Error, ParseError, SourceLocation};
use crate::parser::entities::{self, MAX_ENTITY_LENGTH};
use crate::parser::reader::CharReader;

/// A lexical token. Comments never appear here; they are consumed by the
/// tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    EndOfInput,
    /// `<`
    TagOpen,
    /// `>`
    TagClose,
    /// `</`
    EndTagOpen,
    /// `/>`
    SelfCloseClose,
    /// `<?`
    PiOpen,
    /// `?>`
    PiClose,
    /// `<!`
    DeclOpen,
    Identifier(String),
    /// `=`
    Equals,
    QuotedString(String),
    /// Character data, entity-expanded and blank-line-collapsed.
    /// CDATA sections arrive here verbatim.
    Text(String),
}

impl Token {
    /// Short description for error messages.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::EndOfInput => "end of input",
            Self::TagOpen => "'<'",
            Self::TagClose => "'>'",
            Self::EndTagOpen => "'</'",
            Self::SelfCloseClose => "'/>'",
            Self::PiOpen => "'<?'",
            Self::PiClose => "'?>'",
            Self::DeclOpen => "'<!'",
            Self::Identifier(_) => "identifier",
            Self::Equals => "'='",
            Self::QuotedString(_) => "quoted string",
            Self::Text(_) => "character data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Tag,
    Error,
}

pub(crate) struct Tokenizer<R: Read> {
    reader: CharReader<R>,
    state: State,
}

impl<R: Read> Tokenizer<R> {
    pub(crate) fn new(reader: CharReader<R>) -> Self {
        Self {
            reader,
            state: State::Initial,
        }
    }

    pub(crate) fn location(&self) -> SourceLocation {
        self.reader.location()
    }

    /// Builds a `ParseError` at the current location without touching
    /// tokenizer state. Used by the tree builder for structural errors.
    pub(crate) fn fatal(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.reader.location(),
        }
    }

    /// Builds a lexical error and enters the terminal Error state.
    fn err(&mut self, message: impl Into<String>) -> ParseError {
        self.state = State::Error;
        ParseError {
            message: message.into(),
            location: self.reader.location(),
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<Token, Error> {
        match self.state {
            State::Error => Err(self.err("tokenizer halted by earlier error").into()),
            State::Initial => self.token_initial(),
            State::Tag => self.token_tag(),
        }
    }

    // --- Initial state ---

    fn token_initial(&mut self) -> Result<Token, Error> {
        let mut text: Vec<u8> = Vec::new();
        loop {
            match self.reader.next_byte()? {
                None => break,
                Some(b) if b.is_ascii_whitespace() => text.push(b),
                Some(b) => {
                    self.reader.unread(b);
                    break;
                }
            }
        }
        match self.reader.next_byte()? {
            // whitespace-only tail: dropped
            None => return Ok(Token::EndOfInput),
            // whitespace ahead of a tag: dropped
            Some(b'<') => return self.dispatch_angle(),
            Some(b) => self.reader.unread(b),
        }
        loop {
            match self.reader.next_byte()? {
                None => break,
                Some(b'<') => {
                    self.reader.unread(b'<');
                    break;
                }
                Some(b'&') => {
                    let c = self.expand_entity()?;
                    let mut buf = [0u8; 4];
                    text.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
                Some(b) => text.push(b),
            }
        }
        collapse_blank_lines(&mut text);
        Ok(Token::Text(into_string(text)))
    }

    /// Dispatches the `<` family. The leading `<` has been consumed.
    fn dispatch_angle(&mut self) -> Result<Token, Error> {
        self.state = State::Tag;
        match self.reader.next_byte()? {
            None => Err(self.err("unexpected end of input after '<'").into()),
            Some(b'/') => Ok(Token::EndTagOpen),
            Some(b'?') => Ok(Token::PiOpen),
            Some(b'!') => match self.reader.next_byte()? {
                Some(b'[') => self.scan_cdata(),
                Some(b'-') => {
                    self.skip_comment()?;
                    self.token_initial()
                }
                Some(b) => {
                    self.reader.unread(b);
                    Ok(Token::DeclOpen)
                }
                None => Err(self.err("unexpected end of input after '<!'").into()),
            },
            Some(b) => {
                self.reader.unread(b);
                Ok(Token::TagOpen)
            }
        }
    }

    /// Scans a CDATA section. `<![` has been consumed; expects the
    /// `CDATA` keyword, a `[`, then copies everything verbatim up to the
    /// matching `]]>`.
    fn scan_cdata(&mut self) -> Result<Token, Error> {
        match self.token_tag()? {
            Token::Identifier(kw) if kw == "CDATA" => {}
            _ => return Err(self.err("expected CDATA keyword after '<!['").into()),
        }
        match self.reader.next_byte()? {
            Some(b'[') => {}
            _ => return Err(self.err("expected '[' after CDATA keyword").into()),
        }
        let mut content: Vec<u8> = Vec::new();
        // ']' bytes are held back until we know they are not part of ']]>'
        let mut pending = 0usize;
        loop {
            match self.reader.next_byte()? {
                None => {
                    return Err(self.err("unexpected end of input in CDATA section").into());
                }
                Some(b']') => {
                    if pending == 2 {
                        content.push(b']');
                    } else {
                        pending += 1;
                    }
                }
                Some(b'>') if pending >= 2 => break,
                Some(b) => {
                    for _ in 0..pending {
                        content.push(b']');
                    }
                    pending = 0;
                    content.push(b);
                }
            }
        }
        self.state = State::Initial;
        Ok(Token::Text(into_string(content)))
    }

    /// Skips a comment. `<!-` has been consumed; expects the second `-`,
    /// then discards everything through `-->`.
    fn skip_comment(&mut self) -> Result<(), Error> {
        match self.reader.next_byte()? {
            Some(b'-') => {}
            _ => return Err(self.err("malformed comment").into()),
        }
        let mut dashes = 0usize;
        loop {
            match self.reader.next_byte()? {
                None => return Err(self.err("unexpected end of input in comment").into()),
                Some(b'-') => dashes += 1,
                Some(b'>') if dashes >= 2 => break,
                Some(_) => dashes = 0,
            }
        }
        self.state = State::Initial;
        Ok(())
    }

    /// Expands an entity reference. The `&` has been consumed; reads the
    /// body up to `;` (interior whitespace skipped) and resolves it.
    fn expand_entity(&mut self) -> Result<char, Error> {
        let mut body: Vec<u8> = Vec::new();
        loop {
            match self.reader.next_byte()? {
                None => {
                    return Err(self.err("unexpected end of input in entity reference").into());
                }
                Some(b';') => break,
                Some(b) if b.is_ascii_whitespace() => continue,
                Some(b) => {
                    if body.len() >= MAX_ENTITY_LENGTH {
                        return Err(self.err("entity reference too long").into());
                    }
                    body.push(b);
                }
            }
        }
        if body.is_empty() {
            return Err(self.err("empty entity reference").into());
        }
        let body = into_string(body);
        match entities::resolve(&body) {
            Some(c) => Ok(c),
            None => Err(self.err(format!("unknown entity \"&{body};\"")).into()),
        }
    }

    // --- Tag state ---

    fn token_tag(&mut self) -> Result<Token, Error> {
        let byte = loop {
            match self.reader.next_byte()? {
                None => {
                    return Err(self.err("unexpected end of input inside tag").into());
                }
                Some(b) if b.is_ascii_whitespace() => continue,
                Some(b) => break b,
            }
        };
        match byte {
            b'>' => {
                self.state = State::Initial;
                Ok(Token::TagClose)
            }
            b'/' => match self.reader.next_byte()? {
                Some(b'>') => {
                    self.state = State::Initial;
                    Ok(Token::SelfCloseClose)
                }
                _ => Err(self.err("expected '>' after '/'").into()),
            },
            b'?' => match self.reader.next_byte()? {
                Some(b'>') => {
                    self.state = State::Initial;
                    Ok(Token::PiClose)
                }
                _ => Err(self.err("expected '>' after '?'").into()),
            },
            b'=' => Ok(Token::Equals),
            b'"' | b'\'' => self.scan_quoted(byte),
            b'<' => Err(self.err("unexpected '<' inside tag").into()),
            b if b.is_ascii_alphabetic() || b == b'_' || b == b'!' => self.scan_identifier(b),
            other => Err(self
                .err(format!("unexpected character '{}' inside tag", other as char))
                .into()),
        }
    }

    fn scan_identifier(&mut self, first: u8) -> Result<Token, Error> {
        let mut name = vec![first];
        loop {
            match self.reader.next_byte()? {
                None => break,
                Some(b)
                    if b.is_ascii_alphanumeric()
                        || b == b'_'
                        || b == b':'
                        || b == b'!'
                        || b == b'-' =>
                {
                    name.push(b);
                }
                Some(b) => {
                    self.reader.unread(b);
                    break;
                }
            }
        }
        Ok(Token::Identifier(into_string(name)))
    }

    /// Scans a quoted string. Backslash escapes are honored inside double
    /// quotes only; single-quoted strings are taken raw. No entity
    /// expansion either way.
    fn scan_quoted(&mut self, delim: u8) -> Result<Token, Error> {
        let mut value: Vec<u8> = Vec::new();
        loop {
            match self.reader.next_byte()? {
                None => {
                    return Err(self.err("unexpected end of input in quoted string").into());
                }
                Some(b) if b == delim => break,
                Some(b'\\') if delim == b'"' => match self.reader.next_byte()? {
                    None => {
                        return Err(self.err("unexpected end of input in quoted string").into());
                    }
                    Some(esc) => value.push(esc),
                },
                Some(b) => value.push(b),
            }
        }
        Ok(Token::QuotedString(into_string(value)))
    }
}

/// Collapses runs of consecutive newlines down to a single newline,
/// in place.
fn collapse_blank_lines(text: &mut Vec<u8>) {
    let mut w = 0;
    for r in 0..text.len() {
        let b = text[r];
        if b == b'\n' && w > 0 && text[w - 1] == b'\n' {
            continue;
        }
        text[w] = b;
        w += 1;
    }
    text.truncate(w);
}

fn into_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tokenizer(input: &str) -> Tokenizer<Cursor<Vec<u8>>> {
        Tokenizer::new(CharReader::new(
            Cursor::new(input.as_bytes().to_vec()),
            "<test>",
        ))
    }

    fn all_tokens(input: &str) -> Vec<Token> {
        let mut tk = tokenizer(input);
        let mut out = Vec::new();
        loop {
            let tok = tk.next_token().unwrap();
            let done = tok == Token::EndOfInput;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            all_tokens("<note>hi</note>"),
            vec![
                Token::TagOpen,
                Token::Identifier("note".to_string()),
                Token::TagClose,
                Token::Text("hi".to_string()),
                Token::EndTagOpen,
                Token::Identifier("note".to_string()),
                Token::TagClose,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_self_closing_and_attributes() {
        assert_eq!(
            all_tokens(r#"<a href="x" hidden/>"#),
            vec![
                Token::TagOpen,
                Token::Identifier("a".to_string()),
                Token::Identifier("href".to_string()),
                Token::Equals,
                Token::QuotedString("x".to_string()),
                Token::Identifier("hidden".to_string()),
                Token::SelfCloseClose,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_whitespace_before_tag_is_discarded() {
        assert_eq!(
            all_tokens("  \n  <a/>\n"),
            vec![
                Token::TagOpen,
                Token::Identifier("a".to_string()),
                Token::SelfCloseClose,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_text_keeps_leading_whitespace() {
        let toks = all_tokens("<a>  x</a>");
        assert_eq!(toks[3], Token::Text("  x".to_string()));
    }

    #[test]
    fn test_entities_in_text() {
        let toks = all_tokens("<a>1 &lt; 2 &amp;&amp; 3 &GT; 0</a>");
        assert_eq!(toks[3], Token::Text("1 < 2 && 3 > 0".to_string()));
    }

    #[test]
    fn test_decimal_reference_in_text() {
        let toks = all_tokens("<a>&#65;&#66;</a>");
        assert_eq!(toks[3], Token::Text("AB".to_string()));
    }

    #[test]
    fn test_unknown_entity_is_fatal() {
        let mut tk = tokenizer("<a>&bogus;</a>");
        tk.next_token().unwrap(); // <
        tk.next_token().unwrap(); // a
        tk.next_token().unwrap(); // >
        let err = tk.next_token().unwrap_err();
        assert!(err.to_string().contains("unknown entity"));
        // terminal state
        assert!(tk.next_token().is_err());
    }

    #[test]
    fn test_blank_lines_collapse() {
        let toks = all_tokens("<a>one\n\n\ntwo</a>");
        assert_eq!(toks[3], Token::Text("one\ntwo".to_string()));
    }

    #[test]
    fn test_comment_is_skipped() {
        assert_eq!(
            all_tokens("<a><!-- ignore -- me --></a>"),
            vec![
                Token::TagOpen,
                Token::Identifier("a".to_string()),
                Token::TagClose,
                Token::EndTagOpen,
                Token::Identifier("a".to_string()),
                Token::TagClose,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let mut tk = tokenizer("<a><!-- never ends");
        tk.next_token().unwrap();
        tk.next_token().unwrap();
        tk.next_token().unwrap();
        assert!(tk.next_token().is_err());
    }

    #[test]
    fn test_cdata_is_verbatim() {
        let toks = all_tokens("<a><![CDATA[1 < 2 & x\n\n\ny]]></a>");
        assert_eq!(toks[3], Token::Text("1 < 2 & x\n\n\ny".to_string()));
    }

    #[test]
    fn test_cdata_with_stray_brackets() {
        let toks = all_tokens("<a><![CDATA[a]b]]c]]]></a>");
        assert_eq!(toks[3], Token::Text("a]b]]c]".to_string()));
    }

    #[test]
    fn test_quoted_string_escapes() {
        let toks = all_tokens(r#"<a b="say \"hi\" \\ done"/>"#);
        assert_eq!(
            toks[4],
            Token::QuotedString(r#"say "hi" \ done"#.to_string())
        );
    }

    #[test]
    fn test_single_quotes_take_backslash_raw() {
        let toks = all_tokens(r"<a b='c:\path'/>");
        assert_eq!(toks[4], Token::QuotedString(r"c:\path".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let mut tk = tokenizer("<a b=\"oops");
        tk.next_token().unwrap();
        tk.next_token().unwrap();
        tk.next_token().unwrap();
        tk.next_token().unwrap(); // =
        assert!(tk.next_token().is_err());
    }

    #[test]
    fn test_pi_tokens() {
        assert_eq!(
            all_tokens(r#"<?xml version="1.0"?>"#),
            vec![
                Token::PiOpen,
                Token::Identifier("xml".to_string()),
                Token::Identifier("version".to_string()),
                Token::Equals,
                Token::QuotedString("1.0".to_string()),
                Token::PiClose,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_doctype_tokens() {
        assert_eq!(
            all_tokens("<!DOCTYPE suite>"),
            vec![
                Token::DeclOpen,
                Token::Identifier("DOCTYPE".to_string()),
                Token::Identifier("suite".to_string()),
                Token::TagClose,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_stray_character_in_tag() {
        let mut tk = tokenizer("<a @>");
        tk.next_token().unwrap();
        tk.next_token().unwrap();
        let err = tk.next_token().unwrap_err();
        assert!(err.to_string().contains("unexpected character"));
    }

    #[test]
    fn test_error_location_has_line() {
        let mut tk = tokenizer("<a>\n\n<b @/></a>");
        for _ in 0..5 {
            let _ = tk.next_token().unwrap();
        }
        let err = tk.next_token().unwrap_err();
        assert!(err.to_string().contains(":3"), "{err}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(all_tokens(""), vec![Token::EndOfInput]);
        assert_eq!(all_tokens("   \n  "), vec![Token::EndOfInput]);
    }
}
