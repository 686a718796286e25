use super::{Value, ValueSerializer};
use crate::escape::escape_js_string;
use std::borrow::Cow;
use std::fmt::Write;

/// Objects and lists nested deeper than this are written as `null` in JS.
const MAX_SCRIPT_DEPTH: usize = 32;

/// The default [`ValueSerializer`].
///
/// In JS code, values become literals: strings are single-quoted, objects become object
/// literals with their fields sorted by name, e.g. `{'bar':42,'baz':true,'foo':'foo'}`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScriptLiteralSerializer;

// NOTE: writing to a `String` can't fail, so results of `write!` are ignored below.

fn write_float(value: f64, out: &mut String) {
    if value.is_nan() {
        out.push_str("NaN");
    } else if value.is_infinite() {
        out.push_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
    } else {
        let _ = write!(out, "{value}");
    }
}

impl ScriptLiteralSerializer {
    fn write_text(&self, value: &Value<'_>, out: &mut String) {
        match value {
            Value::Null => (),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Value::UInt(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Float(v) => write_float(*v, out),
            Value::Char(v) => out.push(*v),
            Value::Str(v) => out.push_str(v),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }

                    self.write_text(item, out);
                }
            }
            Value::Object(obj) => {
                let _ = write!(out, "{obj}");
            }
        }
    }

    fn write_script(&self, value: &Value<'_>, depth: usize, out: &mut String) {
        if depth > MAX_SCRIPT_DEPTH {
            trace!(@recover "value nested too deep for JS");

            out.push_str("null");
            return;
        }

        match value {
            Value::Null => out.push_str("null"),
            // NOTE: a leading space keeps a minus sign from joining a preceding
            // operator into `--` or a comment.
            Value::Int(v) if *v < 0 => {
                let _ = write!(out, " {v}");
            }
            Value::Float(v) if v.is_sign_negative() && !v.is_nan() => {
                out.push(' ');
                write_float(*v, out);
            }
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Float(_) => {
                self.write_text(value, out);
            }
            Value::Char(v) => {
                let mut buf = [0; 4];

                write_js_string(v.encode_utf8(&mut buf), out);
            }
            Value::Str(v) => write_js_string(v, out),
            Value::List(items) => {
                out.push('[');

                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }

                    self.write_script(item, depth + 1, out);
                }

                out.push(']');
            }
            Value::Object(obj) => {
                let mut fields = obj.fields();

                if let Some(type_name) = obj.type_name() {
                    fields.push((Cow::Borrowed("class"), Value::Str(type_name)));
                }

                fields.sort_by(|(a, _), (b, _)| a.cmp(b));

                out.push('{');

                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }

                    write_js_string(name, out);
                    out.push(':');
                    self.write_script(value, depth + 1, out);
                }

                out.push('}');
            }
        }
    }
}

fn write_js_string(value: &str, out: &mut String) {
    out.push('\'');
    escape_js_string(value, out);
    out.push('\'');
}

impl ValueSerializer for ScriptLiteralSerializer {
    /// `Null` becomes empty text, lists are comma-separated, objects use their
    /// `Display` form.
    #[inline]
    fn serialize(&self, value: &Value<'_>, out: &mut String) {
        self.write_text(value, out);
    }

    #[inline]
    fn serialize_for_script(&self, value: &Value<'_>, out: &mut String) {
        self.write_script(value, 0, out);
    }
}
