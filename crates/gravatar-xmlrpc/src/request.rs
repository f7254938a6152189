//! `<methodCall>` serialization.

use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::value::{DATETIME_FORMAT, Value};

/// An outgoing remote procedure call.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Fully qualified method name (e.g. `grav.test`).
    pub method: String,
    /// Positional parameters.
    pub params: Vec<Value>,
}

impl MethodCall {
    /// Creates a call with no parameters.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
        }
    }

    /// Appends a positional parameter.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Serializes the call as an XML-RPC request document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
        escape_into(&mut out, &self.method);
        out.push_str("</methodName><params>");
        for param in &self.params {
            out.push_str("<param>");
            write_value(&mut out, param);
            out.push_str("</param>");
        }
        out.push_str("</params></methodCall>\n");
        out
    }
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(i) => {
            // Values beyond 32 bits need the i8 extension.
            if i32::try_from(*i).is_ok() {
                let _ = write!(out, "<int>{i}</int>");
            } else {
                let _ = write!(out, "<i8>{i}</i8>");
            }
        }
        Value::Boolean(b) => {
            let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
        }
        Value::String(s) => {
            out.push_str("<string>");
            escape_into(out, s);
            out.push_str("</string>");
        }
        Value::Double(d) => {
            let _ = write!(out, "<double>{d}</double>");
        }
        Value::DateTime(dt) => {
            let _ = write!(
                out,
                "<dateTime.iso8601>{}</dateTime.iso8601>",
                dt.format(DATETIME_FORMAT)
            );
        }
        Value::Base64(data) => {
            let _ = write!(out, "<base64>{}</base64>", STANDARD.encode(data));
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                escape_into(out, name);
                out.push_str("</name>");
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

/// Escapes XML markup characters in text content.
fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
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
    use crate::value::Members;

    #[test]
    fn test_empty_call() {
        let xml = MethodCall::new("grav.test").to_xml();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\"?>\n<methodCall><methodName>grav.test</methodName>\
             <params></params></methodCall>\n"
        );
    }

    #[test]
    fn test_struct_param() {
        let mut members = Members::new();
        members.insert("password".to_string(), Value::from("s3cret"));
        members.insert("rating".to_string(), Value::from(1));
        let xml = MethodCall::new("grav.saveUrl").arg(members).to_xml();

        assert!(xml.contains(
            "<member><name>password</name><value><string>s3cret</string></value></member>"
        ));
        assert!(xml.contains("<member><name>rating</name><value><int>1</int></value></member>"));
    }

    #[test]
    fn test_escaping() {
        let xml = MethodCall::new("m").arg("a<b & c>d").to_xml();
        assert!(xml.contains("<string>a&lt;b &amp; c&gt;d</string>"));
    }

    #[test]
    fn test_array_and_scalars() {
        let xml = MethodCall::new("m")
            .arg(vec!["x", "y"])
            .arg(true)
            .arg(Value::Nil)
            .arg(Value::Base64(b"hi".to_vec()))
            .to_xml();
        assert!(xml.contains(
            "<array><data><value><string>x</string></value>\
             <value><string>y</string></value></data></array>"
        ));
        assert!(xml.contains("<boolean>1</boolean>"));
        assert!(xml.contains("<nil/>"));
        assert!(xml.contains("<base64>aGk=</base64>"));
    }

    #[test]
    fn test_wide_int_uses_i8() {
        let xml = MethodCall::new("m").arg(5_000_000_000_i64).to_xml();
        assert!(xml.contains("<i8>5000000000</i8>"));
    }
}
