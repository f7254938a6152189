//! `<methodResponse>` parser.

mod lexer;

pub use lexer::{Lexer, Token};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;

use crate::value::{DATETIME_FORMAT, Members, Value};
use crate::{Error, Result};

/// Fault reported by the remote procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Numeric fault code.
    pub code: i64,
    /// Fault description.
    pub message: String,
}

/// Decoded XML-RPC response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Successful call with its return value.
    Success(Value),
    /// The call failed remotely.
    Fault(Fault),
}

impl Response {
    /// Converts a fault into [`Error::Fault`].
    ///
    /// # Errors
    ///
    /// Returns the fault as an error.
    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Fault(fault) => Err(Error::fault(fault.code, fault.message)),
        }
    }
}

/// Parses a complete `<methodResponse>` document.
///
/// # Errors
///
/// Returns an error if the document is malformed.
pub fn parse_response(input: &str) -> Result<Response> {
    let mut parser = Parser::new(input);

    parser.expect_start("methodResponse")?;
    let response = match parser.next()? {
        Token::Start("params") => {
            parser.expect_start("param")?;
            let value = parser.parse_value()?;
            parser.expect_end("param")?;
            parser.expect_end("params")?;
            Response::Success(value)
        }
        Token::Start("fault") => {
            let value = parser.parse_value()?;
            parser.expect_end("fault")?;
            Response::Fault(parser.fault_from(value)?)
        }
        token => return Err(parser.unexpected("<params> or <fault>", &token)),
    };
    parser.expect_end("methodResponse")?;

    match parser.next()? {
        Token::Eof => Ok(response),
        token => Err(parser.unexpected("end of document", &token)),
    }
}

/// Parses a single `<value>` element.
///
/// # Errors
///
/// Returns an error if the value is malformed.
pub fn parse_value(input: &str) -> Result<Value> {
    Parser::new(input).parse_value()
}

/// Maximum nesting of `<value>` elements accepted in one document.
const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            depth: 0,
        }
    }

    fn next(&mut self) -> Result<Token<'a>> {
        self.lexer.next_significant()
    }

    fn expect_start(&mut self, name: &str) -> Result<()> {
        match self.next()? {
            Token::Start(found) if found == name => Ok(()),
            token => Err(self.unexpected(&format!("<{name}>"), &token)),
        }
    }

    fn expect_end(&mut self, name: &str) -> Result<()> {
        match self.next()? {
            Token::End(found) if found == name => Ok(()),
            token => Err(self.unexpected(&format!("</{name}>"), &token)),
        }
    }

    fn unexpected(&self, expected: &str, found: &Token<'_>) -> Error {
        Error::parse(
            self.lexer.position(),
            format!("Expected {expected}, got {found:?}"),
        )
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(self.lexer.position(), message)
    }

    /// Reads character data up to `</name>`.
    fn read_text(&mut self, name: &str) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.lexer.next_token()? {
                Token::Text(t) => text.push_str(&t),
                Token::End(found) if found == name => return Ok(text),
                token => return Err(self.unexpected(&format!("</{name}>"), &token)),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.next()? {
            Token::Start("value") => self.parse_value_body(),
            Token::Empty("value") => Ok(Value::String(String::new())),
            token => Err(self.unexpected("<value>", &token)),
        }
    }

    fn parse_empty(&self, kind: &str) -> Result<Value> {
        match kind {
            "nil" => Ok(Value::Nil),
            "string" => Ok(Value::String(String::new())),
            "base64" => Ok(Value::Base64(Vec::new())),
            "struct" => Ok(Value::Struct(Members::new())),
            "array" => Ok(Value::Array(Vec::new())),
            _ => Err(self.error(format!("Empty <{kind}/> is not a value"))),
        }
    }

    fn parse_typed(&mut self, kind: &str) -> Result<Value> {
        match kind {
            "int" | "i4" | "i8" => {
                let text = self.read_text(kind)?;
                text.trim()
                    .parse()
                    .map(Value::Int)
                    .map_err(|_| self.error(format!("Invalid integer: {text}")))
            }
            "boolean" => match self.read_text(kind)?.trim() {
                "1" | "true" => Ok(Value::Boolean(true)),
                "0" | "false" => Ok(Value::Boolean(false)),
                other => Err(self.error(format!("Invalid boolean: {other}"))),
            },
            "string" => self.read_text(kind).map(Value::String),
            "double" => {
                let text = self.read_text(kind)?;
                text.trim()
                    .parse()
                    .map(Value::Double)
                    .map_err(|_| self.error(format!("Invalid double: {text}")))
            }
            "dateTime.iso8601" => {
                let text = self.read_text(kind)?;
                parse_datetime(text.trim())
                    .map(Value::DateTime)
                    .ok_or_else(|| self.error(format!("Invalid dateTime: {text}")))
            }
            "base64" => {
                let text = self.read_text(kind)?;
                let compact: String = text.split_whitespace().collect();
                STANDARD
                    .decode(compact)
                    .map(Value::Base64)
                    .map_err(|e| self.error(format!("Invalid base64: {e}")))
            }
            "nil" => {
                self.expect_end("nil")?;
                Ok(Value::Nil)
            }
            "struct" => self.parse_struct(),
            "array" => self.parse_array(),
            _ => Err(self.error(format!("Unknown value type: {kind}"))),
        }
    }

    fn parse_struct(&mut self) -> Result<Value> {
        let mut members = Members::new();
        loop {
            match self.next()? {
                Token::End("struct") => return Ok(Value::Struct(members)),
                Token::Start("member") => {
                    self.expect_start("name")?;
                    let name = self.read_text("name")?;
                    let value = self.parse_value()?;
                    self.expect_end("member")?;
                    members.insert(name, value);
                }
                token => return Err(self.unexpected("<member> or </struct>", &token)),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        match self.next()? {
            Token::Empty("data") => {}
            Token::Start("data") => loop {
                match self.next()? {
                    Token::End("data") => break,
                    Token::Start("value") => {
                        items.push(self.parse_value_body()?);
                    }
                    Token::Empty("value") => items.push(Value::String(String::new())),
                    token => return Err(self.unexpected("<value> or </data>", &token)),
                }
            },
            token => return Err(self.unexpected("<data>", &token)),
        }
        self.expect_end("array")?;
        Ok(Value::Array(items))
    }

    /// Parses the remainder of a value whose `<value>` tag was already read.
    fn parse_value_body(&mut self) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("Value nesting too deep"));
        }
        self.depth += 1;
        let value = self.parse_value_content();
        self.depth -= 1;
        value
    }

    fn parse_value_content(&mut self) -> Result<Value> {
        // Untyped content is a string; whitespace before a type tag is not.
        let mut untyped = String::new();
        let value = loop {
            match self.lexer.next_token()? {
                Token::Text(t) => untyped.push_str(&t),
                Token::End("value") => return Ok(Value::String(untyped)),
                Token::Empty(kind) => break self.parse_empty(kind)?,
                Token::Start(kind) => break self.parse_typed(kind)?,
                token => return Err(self.unexpected("value content", &token)),
            }
        };
        if !untyped.trim().is_empty() {
            return Err(self.error("Text mixed with typed value"));
        }
        self.expect_end("value")?;
        Ok(value)
    }

    fn fault_from(&self, value: Value) -> Result<Fault> {
        let members = value
            .into_struct()
            .ok_or_else(|| self.error("Fault value is not a struct"))?;
        let code = members
            .get("faultCode")
            .and_then(Value::as_int)
            .ok_or_else(|| self.error("Fault without integer faultCode"))?;
        let message = members
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Fault { code, message })
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
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
    use chrono::NaiveDate;

    fn success(body: &str) -> Value {
        let doc = format!(
            "<?xml version=\"1.0\"?>\n<methodResponse><params><param>{body}</param></params></methodResponse>"
        );
        match parse_response(&doc).unwrap() {
            Response::Success(value) => value,
            Response::Fault(fault) => panic!("unexpected fault: {fault:?}"),
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(success("<value><int>7</int></value>"), Value::Int(7));
        assert_eq!(success("<value><i4>-3</i4></value>"), Value::Int(-3));
        assert_eq!(
            success("<value><i8>5000000000</i8></value>"),
            Value::Int(5_000_000_000)
        );
        assert_eq!(
            success("<value><boolean>1</boolean></value>"),
            Value::Boolean(true)
        );
        assert_eq!(
            success("<value><double>1.5</double></value>"),
            Value::Double(1.5)
        );
        assert_eq!(
            success("<value><string>a &amp; b</string></value>"),
            Value::from("a & b")
        );
        assert_eq!(success("<value>bare</value>"), Value::from("bare"));
        assert_eq!(success("<value></value>"), Value::from(""));
        assert_eq!(success("<value><string/></value>"), Value::from(""));
        assert_eq!(success("<value><nil/></value>"), Value::Nil);
        assert_eq!(
            success("<value><base64>aGVs\nbG8=</base64></value>"),
            Value::Base64(b"hello".to_vec())
        );
    }

    #[test]
    fn test_datetime() {
        let expected = NaiveDate::from_ymd_opt(2011, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(
            success("<value><dateTime.iso8601>20110304T05:06:07</dateTime.iso8601></value>"),
            Value::DateTime(expected)
        );
    }

    #[test]
    fn test_struct_with_whitespace() {
        let value = success(
            "<value>\n  <struct>\n    <member>\n      <name>userimage</name>\n      \
             <value><string>abc</string></value>\n    </member>\n    <member>\
             <name>rating</name><value><int>2</int></value></member>\n  </struct>\n</value>",
        );
        let members = value.as_struct().unwrap();
        assert_eq!(members["userimage"], Value::from("abc"));
        assert_eq!(members["rating"], Value::Int(2));
    }

    #[test]
    fn test_array() {
        let value = success(
            "<value><array><data><value><int>0</int></value>\
             <value><string>http://x/y.jpg</string></value></data></array></value>",
        );
        assert_eq!(
            value,
            Value::Array(vec![Value::Int(0), Value::from("http://x/y.jpg")])
        );
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(
            success("<value><array><data/></array></value>"),
            Value::Array(Vec::new())
        );
        assert_eq!(
            success("<value><array><data>\n</data></array></value>"),
            Value::Array(Vec::new())
        );
    }

    #[test]
    fn test_fault() {
        let doc = "<?xml version=\"1.0\"?><methodResponse><fault><value><struct>\
                   <member><name>faultCode</name><value><int>-9</int></value></member>\
                   <member><name>faultString</name><value><string>Authentication error</string></value></member>\
                   </struct></value></fault></methodResponse>";
        let response = parse_response(doc).unwrap();
        assert_eq!(
            response,
            Response::Fault(Fault {
                code: -9,
                message: "Authentication error".to_string(),
            })
        );

        let err = response.into_result().unwrap_err();
        assert_eq!(err.fault_code(), Some(-9));
    }

    #[test]
    fn test_fault_without_code() {
        let doc = "<methodResponse><fault><value><struct></struct></value></fault></methodResponse>";
        assert!(matches!(parse_response(doc), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_response("").is_err());
        assert!(parse_response("<html><body>502</body></html>").is_err());
        assert!(
            parse_response("<methodResponse><params><param><value><int>x</int></value></param></params></methodResponse>")
                .is_err()
        );
        assert!(
            parse_response("<methodResponse><params><param><value><int>1</int></value></param></params></methodResponse><extra/>")
                .is_err()
        );
    }

    fn nested_arrays(levels: usize) -> String {
        let mut doc = String::from("<methodResponse><params><param>");
        doc.push_str(&"<value><array><data>".repeat(levels - 1));
        doc.push_str("<value><int>1</int></value>");
        doc.push_str(&"</data></array></value>".repeat(levels - 1));
        doc.push_str("</param></params></methodResponse>");
        doc
    }

    #[test]
    fn test_nesting_limit() {
        assert!(parse_response(&nested_arrays(MAX_DEPTH)).is_ok());
        assert!(matches!(
            parse_response(&nested_arrays(MAX_DEPTH + 1)),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            parse_response(&nested_arrays(200_000)),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_unknown_type() {
        assert!(parse_value("<value><blob>1</blob></value>").is_err());
    }
}
