//! Untrusted values and their conversion to text.

mod script;

use std::borrow::Cow;
use std::fmt;

pub use self::script::ScriptLiteralSerializer;

/// An object that can be embedded in a page.
///
/// In JS code an object is written as an object literal built from [`fields`], so
/// what gets exposed to the page is decided here rather than discovered at runtime.
/// Everywhere else it's written as its [`Display`](fmt::Display) form.
///
/// [`fields`]: ScriptObject::fields
pub trait ScriptObject: fmt::Display {
    /// The fields to expose in JS. The order doesn't matter: fields are sorted by name
    /// when serialized.
    fn fields(&self) -> Vec<(Cow<'_, str>, Value<'_>)>;

    /// If set, the object literal gets an extra `class` field with this name.
    fn type_name(&self) -> Option<Cow<'_, str>> {
        None
    }
}

/// An untrusted value to be written to the page.
#[derive(Clone)]
pub enum Value<'v> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(Cow<'v, str>),
    List(Vec<Value<'v>>),
    Object(&'v dyn ScriptObject),
}

impl Value<'_> {
    /// Returns `true` for values that JS code gets as an object or array.
    #[inline]
    pub fn is_structured(&self) -> bool {
        matches!(self, Value::List(_) | Value::Object(_))
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Object(v) => f.debug_tuple("Object").field(&v.to_string()).finish(),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),+) => {
        $(
            impl From<$ty> for Value<'_> {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )+
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    char => Char,
    String => Str
}

impl From<isize> for Value<'_> {
    #[inline]
    fn from(value: isize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<usize> for Value<'_> {
    #[inline]
    fn from(value: usize) -> Self {
        Value::UInt(value as u64)
    }
}

impl<'v> From<&'v str> for Value<'v> {
    #[inline]
    fn from(value: &'v str) -> Self {
        Value::Str(Cow::Borrowed(value))
    }
}

impl<'v> From<Cow<'v, str>> for Value<'v> {
    #[inline]
    fn from(value: Cow<'v, str>) -> Self {
        Value::Str(value)
    }
}

impl<'v, T: ScriptObject> From<&'v T> for Value<'v> {
    #[inline]
    fn from(value: &'v T) -> Self {
        Value::Object(value)
    }
}

impl<'v, T: Into<Value<'v>>> From<Option<T>> for Value<'v> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<'v, T: Into<Value<'v>>> From<Vec<T>> for Value<'v> {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// Converts values to text before they are escaped.
pub trait ValueSerializer {
    /// Writes the text form of `value`, used in HTML, URL and CSS contexts and
    /// inside JS strings.
    fn serialize(&self, value: &Value<'_>, out: &mut String);

    /// Writes `value` as a JS expression.
    ///
    /// The output is written to JS code as is, so it must be a single self-contained
    /// expression that can't end the surrounding `<script>` element or attribute:
    /// string contents must be escaped with [`escape_js_string`](crate::escape::escape_js_string).
    fn serialize_for_script(&self, value: &Value<'_>, out: &mut String);
}

impl<S: ValueSerializer + ?Sized> ValueSerializer for &S {
    #[inline]
    fn serialize(&self, value: &Value<'_>, out: &mut String) {
        (**self).serialize(value, out);
    }

    #[inline]
    fn serialize_for_script(&self, value: &Value<'_>, out: &mut String) {
        (**self).serialize_for_script(value, out);
    }
}
