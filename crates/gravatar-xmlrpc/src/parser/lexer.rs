//! XML lexer covering the subset of XML used by XML-RPC documents.
//!
//! Produces element and text tokens. Processing instructions, comments and
//! doctype declarations are skipped; attributes are ignored.

use crate::{Error, Result};

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Opening tag `<name ...>`.
    Start(&'a str),
    /// Closing tag `</name>`.
    End(&'a str),
    /// Self-closing tag `<name/>`.
    Empty(&'a str),
    /// Character data with entities already decoded.
    Text(String),
    /// End of input.
    Eof,
}

impl Token<'_> {
    /// Returns true if this is text made of whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(t) if t.trim().is_empty())
    }
}

/// XML lexer state.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the current position in the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Reads the next token.
    ///
    /// # Errors
    ///
    /// Returns an error on unterminated markup or unknown entities.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Ok(Token::Eof);
            }

            if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if let Some(after) = rest.strip_prefix("<![CDATA[") {
                let end = after
                    .find("]]>")
                    .ok_or_else(|| self.error("Unterminated CDATA section"))?;
                let text = after[..end].to_string();
                self.pos += "<![CDATA[".len() + end + "]]>".len();
                return Ok(Token::Text(text));
            } else if rest.starts_with("<!") {
                self.skip_past(">")?;
            } else if rest.starts_with('<') {
                return self.read_tag();
            } else {
                return self.read_text();
            }
        }
    }

    /// Reads the next token that is not whitespace-only text.
    ///
    /// # Errors
    ///
    /// Propagates lexing errors.
    pub fn next_significant(&mut self) -> Result<Token<'a>> {
        loop {
            let token = self.next_token()?;
            if !token.is_blank() {
                return Ok(token);
            }
        }
    }

    fn skip_past(&mut self, terminator: &str) -> Result<()> {
        let end = self
            .rest()
            .find(terminator)
            .ok_or_else(|| self.error(&format!("Expected {terminator}")))?;
        self.pos += end + terminator.len();
        Ok(())
    }

    fn read_tag(&mut self) -> Result<Token<'a>> {
        let rest = self.rest();
        let end = rest
            .find('>')
            .ok_or_else(|| self.error("Unterminated tag"))?;
        let inner = &rest[1..end];
        self.pos += end + 1;

        if let Some(name) = inner.strip_prefix('/') {
            let name = name.trim();
            if name.is_empty() {
                return Err(self.error("Empty closing tag"));
            }
            return Ok(Token::End(name));
        }

        let (inner, empty) = inner
            .strip_suffix('/')
            .map_or((inner, false), |stripped| (stripped, true));
        let name = inner.split_whitespace().next().unwrap_or_default();
        if name.is_empty() {
            return Err(self.error("Empty tag name"));
        }

        Ok(if empty {
            Token::Empty(name)
        } else {
            Token::Start(name)
        })
    }

    fn read_text(&mut self) -> Result<Token<'a>> {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        let raw = &rest[..end];
        let start = self.pos;
        self.pos += end;
        decode_entities(raw)
            .map(Token::Text)
            .map_err(|message| Error::parse(start, message))
    }

    fn error(&self, message: &str) -> Error {
        Error::parse(self.pos, message)
    }
}

/// Decodes predefined entities and character references.
fn decode_entities(raw: &str) -> std::result::Result<String, String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| "Unterminated entity reference".to_string())?;
        let entity = &after[..semi];
        let ch = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => decode_char_ref(entity).ok_or_else(|| format!("Unknown entity: &{entity};"))?,
        };
        out.push(ch);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn decode_char_ref(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn test_tags_and_text() {
        assert_eq!(
            tokens("<value><int>42</int></value>"),
            vec![
                Token::Start("value"),
                Token::Start("int"),
                Token::Text("42".to_string()),
                Token::End("int"),
                Token::End("value"),
            ]
        );
    }

    #[test]
    fn test_skips_prolog_and_comments() {
        assert_eq!(
            tokens("<?xml version=\"1.0\"?><!-- hi --><a/>"),
            vec![Token::Empty("a")]
        );
    }

    #[test]
    fn test_attributes_ignored() {
        assert_eq!(
            tokens("<a x=\"1\"><b y='2' /></a>"),
            vec![Token::Start("a"), Token::Empty("b"), Token::End("a")]
        );
    }

    #[test]
    fn test_entities() {
        assert_eq!(
            tokens("a &amp; b &lt;c&gt; &quot;&apos; &#65;&#x42;"),
            vec![Token::Text("a & b <c> \"' AB".to_string())]
        );
    }

    #[test]
    fn test_cdata() {
        assert_eq!(
            tokens("<![CDATA[<raw> & stuff]]>"),
            vec![Token::Text("<raw> & stuff".to_string())]
        );
    }

    #[test]
    fn test_unknown_entity() {
        let mut lexer = Lexer::new("&bogus;");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_unterminated_tag() {
        let mut lexer = Lexer::new("<value");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_next_significant_skips_whitespace() {
        let mut lexer = Lexer::new("\n  <a>");
        assert_eq!(lexer.next_significant().unwrap(), Token::Start("a"));
    }
}
