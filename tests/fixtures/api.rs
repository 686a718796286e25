use autoesc::context::{
    AttrType, Chunk, Context, ContextMachine, Delim, Element, State, UrlPart,
};
use autoesc::errors::WriterError;
use autoesc::{
    EscapingWriter, IoSink, ScriptLiteralSerializer, ScriptObject, Settings, UrlSchemes, Value,
    ValueSerializer,
};
use serde_json::{Map, Number};
use static_assertions::{assert_impl_all, assert_not_impl_any};
use std::borrow::Cow;
use std::fmt;

assert_impl_all!(EscapingWriter<IoSink<Vec<u8>>>: Send);
assert_impl_all!(WriterError: std::error::Error, Send, Sync);
assert_impl_all!(Settings: Clone, Default, Send, Sync);
assert_impl_all!(Context: Copy, Eq, std::hash::Hash, Send, Sync);
assert_not_impl_any!(Value<'static>: Send, Sync);

struct User {
    name: &'static str,
    age: u32,
    tags: Vec<&'static str>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.age)
    }
}

impl ScriptObject for User {
    fn fields(&self) -> Vec<(Cow<'_, str>, Value<'_>)> {
        vec![
            ("name".into(), self.name.into()),
            ("age".into(), self.age.into()),
            ("tags".into(), self.tags.clone().into()),
        ]
    }

    fn type_name(&self) -> Option<Cow<'_, str>> {
        Some("User".into())
    }
}

fn user() -> User {
    User {
        name: "</script>",
        age: 42,
        tags: vec!["a", "b"],
    }
}

fn render_with<S: ValueSerializer>(
    serializer: S,
    f: impl FnOnce(&mut EscapingWriter<IoSink<Vec<u8>>, S>) -> Result<(), WriterError>,
) -> String {
    let mut writer =
        EscapingWriter::with_serializer(Settings::default(), IoSink::new(Vec::new()), serializer);

    f(&mut writer).unwrap();
    writer.close().unwrap();

    String::from_utf8(writer.sink().get_ref().clone()).unwrap()
}

/// Writes values in JS code as JSON.
struct JsonSerializer;

fn to_json(value: &Value<'_>) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(v) => (*v).into(),
        Value::Int(v) => (*v).into(),
        Value::UInt(v) => (*v).into(),
        Value::Float(v) => Number::from_f64(*v).map_or(serde_json::Value::Null, Into::into),
        Value::Char(v) => v.to_string().into(),
        Value::Str(v) => v.as_ref().into(),
        Value::List(items) => items.iter().map(to_json).collect(),
        Value::Object(obj) => obj
            .fields()
            .iter()
            .map(|(name, value)| (name.to_string(), to_json(value)))
            .collect::<Map<_, _>>()
            .into(),
    }
}

impl ValueSerializer for JsonSerializer {
    fn serialize(&self, value: &Value<'_>, out: &mut String) {
        ScriptLiteralSerializer.serialize(value, out);
    }

    fn serialize_for_script(&self, value: &Value<'_>, out: &mut String) {
        let json = to_json(value).to_string();

        // NOTE: these only occur inside JSON strings, where the escapes mean the same.
        for ch in json.chars() {
            match ch {
                '<' => out.push_str("\\u003c"),
                '>' => out.push_str("\\u003e"),
                '&' => out.push_str("\\u0026"),
                '\'' => out.push_str("\\u0027"),
                '\u{2028}' => out.push_str("\\u2028"),
                '\u{2029}' => out.push_str("\\u2029"),
                _ => out.push(ch),
            }
        }
    }
}

#[test]
fn default_serializer() {
    let user = user();

    let output = render_with(ScriptLiteralSerializer, |w| {
        w.write_trusted("<script>var u = ")?;
        w.write_value(&user)?;
        w.write_trusted(", n = ")?;
        w.write_value(-1)?;
        w.write_trusted(";</script><p title=\"")?;
        w.write_value(&user)?;
        w.write_trusted("\">")
    });

    assert_eq!(
        output,
        concat!(
            r"<script>var u = {'age':42,'class':'User','name':'\x3c\/script\x3e','tags':['a','b']}",
            r", n =  -1;</script>",
            r#"<p title="&lt;/script&gt; (42)">"#
        )
    );
}

#[test]
fn custom_serializer() {
    let user = user();

    let output = render_with(JsonSerializer, |w| {
        w.write_trusted("<script>var u = ")?;
        w.write_value(&user)?;
        w.write_trusted(";</script><a onclick=\"f(")?;
        w.write_value("a<b")?;
        w.write_trusted(")\">")?;
        w.write_value("a<b")
    });

    assert_eq!(
        output,
        concat!(
            r#"<script>var u = {"age":42,"name":"\u003c/script\u003e","tags":["a","b"]};</script>"#,
            r#"<a onclick="f(&#34;a\u003cb&#34;)">a&lt;b"#
        )
    );
}

#[test]
fn context_inspection() {
    let mut writer = EscapingWriter::new(Settings::default(), IoSink::new(Vec::new()));

    assert_eq!(writer.context(), Context::new());

    writer.write_trusted("<a href='/x?").unwrap();

    let ctx = writer.context();

    assert_eq!(ctx.state(), State::Url);
    assert_eq!(ctx.attr(), AttrType::Url);
    assert_eq!(ctx.delim(), Delim::SingleQuote);
    assert_eq!(ctx.url_part(), UrlPart::QueryOrFrag);
    assert!(ctx.in_attr_value());

    writer.write_trusted("'></a><textarea>").unwrap();

    assert_eq!(writer.context().state(), State::Rcdata);
    assert_eq!(writer.context().element(), Element::Textarea);
}

#[test]
fn closed_writer() {
    let mut writer = EscapingWriter::new(Settings::default(), IoSink::new(Vec::new()));

    writer.close().unwrap();

    let err = writer.write_value("x").unwrap_err();

    assert!(err.is_closed());
    assert_eq!(err.to_string(), "The writer has been closed.");
}

#[test]
fn url_schemes() {
    assert_eq!(UrlSchemes::from_scheme("HTTPS"), Some(UrlSchemes::HTTPS));
    assert_eq!(UrlSchemes::from_scheme("tel"), Some(UrlSchemes::TEL));
    assert_eq!(UrlSchemes::from_scheme("javascript"), None);

    let settings = Settings {
        allowed_url_schemes: UrlSchemes::HTTPS,
        ..Settings::default()
    };

    let mut writer = EscapingWriter::new(settings, IoSink::new(Vec::new()));

    writer.write_trusted("<a href=\"").unwrap();
    writer.write_value("http://example.com").unwrap();
    writer.write_trusted("\"><a href=\"").unwrap();
    writer.write_value("https://example.com").unwrap();
    writer.write_trusted("\">").unwrap();
    writer.close().unwrap();

    assert_eq!(
        writer.sink().get_ref(),
        b"<a href=\"#ZautoescZ\"><a href=\"https://example.com\">"
    );
}

#[test]
fn standalone_context_machine() {
    let mut machine = ContextMachine::new();
    let mut out = String::new();

    assert_eq!(machine.advance(&Chunk::new("<p><scr"), &mut out), 4);
    assert_eq!(out, "<p>");

    let blocked = machine.advance(&Chunk::new("<script>var a = &"), &mut out);

    assert_eq!(blocked, 0);
    assert_eq!(machine.context().state(), State::Js);
    assert_eq!(machine.context().element(), Element::Script);

    machine.advance(&Chunk::last("</script><a href='&"), &mut out);

    let ctx = machine.context();

    assert_eq!(ctx.state(), State::Url);
    assert_eq!(ctx.delim(), Delim::SingleQuote);
    assert_eq!(ctx.url_part(), UrlPart::PreQuery);
    assert_eq!(out, "<p><script>var a = &</script><a href='&");
}
