//! Property tests for the request serializer against the response parser.

#![allow(clippy::unwrap_used)]

use gravatar_xmlrpc::parser::parse_value;
use gravatar_xmlrpc::{MethodCall, Value};
use proptest::prelude::*;

/// Extracts the first `<value>` element from a serialized call.
fn first_param(xml: &str) -> &str {
    let start = xml.find("<param>").map_or(0, |i| i + "<param>".len());
    let end = xml.rfind("</param>").unwrap_or(xml.len());
    &xml[start..end]
}

proptest! {
    #[test]
    fn string_params_survive_escaping(s in "\\PC*") {
        let xml = MethodCall::new("m").arg(s.as_str()).to_xml();
        let parsed = parse_value(first_param(&xml)).unwrap();
        prop_assert_eq!(parsed, Value::String(s));
    }

    #[test]
    fn int_params_survive(i in any::<i64>()) {
        let xml = MethodCall::new("m").arg(i).to_xml();
        let parsed = parse_value(first_param(&xml)).unwrap();
        prop_assert_eq!(parsed, Value::Int(i));
    }

    #[test]
    fn string_arrays_survive(items in proptest::collection::vec("[a-z@.&<>]{0,12}", 0..8)) {
        let xml = MethodCall::new("m").arg(items.clone()).to_xml();
        let parsed = parse_value(first_param(&xml)).unwrap();
        prop_assert_eq!(parsed, Value::from(items));
    }
}
