use autoesc::errors::WriterError;
use autoesc::{EscapingWriter, Settings};
use rand::{thread_rng, Rng};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use std::env;
use std::fmt::{self, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Trusted(String),
    Value(String),
}

/// Template text where `{{...}}` marks an untrusted value.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        let mut pieces = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            let end = rest[start..].find("}}").map_or(rest.len(), |len| start + len);

            if start > 0 {
                pieces.push(Piece::Trusted(rest[..start].to_owned()));
            }

            pieces.push(Piece::Value(rest[start + 2..end].to_owned()));
            rest = rest.get(end + 2..).unwrap_or("");
        }

        if !rest.is_empty() {
            pieces.push(Piece::Trusted(rest.to_owned()));
        }

        Template {
            source: source.to_owned(),
            pieces,
        }
    }
}

impl Template {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Replaces every value with `value`.
    pub fn with_values(&self, value: &str) -> Self {
        Template {
            source: self.source.clone(),
            pieces: self
                .pieces
                .iter()
                .map(|piece| match piece {
                    Piece::Value(_) => Piece::Value(value.to_owned()),
                    trusted => trusted.clone(),
                })
                .collect(),
        }
    }

    /// Renders the template, writing each trusted piece in the chunks `split` makes of it.
    pub fn render_with<'t>(
        &'t self,
        settings: Settings,
        mut split: impl FnMut(&'t str) -> Vec<&'t str>,
    ) -> Result<Vec<u8>, WriterError> {
        let mut output = Vec::new();

        {
            let mut writer =
                EscapingWriter::new(settings, |chunk: &[u8]| output.extend_from_slice(chunk));

            for piece in &self.pieces {
                match piece {
                    Piece::Trusted(text) => {
                        for chunk in split(text) {
                            writer.write_trusted(chunk)?;
                        }
                    }
                    Piece::Value(value) => writer.write_value(value.as_str())?,
                }
            }

            writer.close()?;
        }

        Ok(output)
    }

    pub fn render(&self, settings: Settings, chunk_size: usize) -> Result<Vec<u8>, WriterError> {
        self.render_with(settings, |text| split_into_chunks(text, chunk_size))
    }

    /// Renders the template to a string, with every trusted piece written at once.
    pub fn render_to_string(&self, settings: Settings) -> String {
        let output = self.render_with(settings, |text| vec![text]).unwrap();

        String::from_utf8(output).unwrap()
    }
}

/// Splits `text` into chunks of `chunk_size` bytes, moving each cut forward to the
/// next char boundary.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let mut end = chunk_size.clamp(1, rest.len());

        while !rest.is_char_boundary(end) {
            end += 1;
        }

        let (chunk, tail) = rest.split_at(end);

        chunks.push(chunk);
        rest = tail;
    }

    chunks
}

/// The chunk size for trusted text of the given length: `CHUNK_SIZE` from the
/// environment, or a random one.
pub fn chunk_size(len: usize) -> usize {
    match env::var("CHUNK_SIZE") {
        Ok(val) => val.parse().unwrap(),
        Err(_) => {
            if len > 1 {
                thread_rng().gen_range(1..len)
            } else {
                1
            }
        }
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TemplateVisitor;

        impl Visitor<'_> for TemplateVisitor {
            type Value = Template;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("a template string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.into())
            }
        }

        deserializer.deserialize_str(TemplateVisitor)
    }
}

#[test]
fn template_pieces() {
    let template = Template::from("<a href={{x}}>{{}}</a>{{y");

    assert_eq!(
        template.pieces(),
        [
            Piece::Trusted("<a href=".into()),
            Piece::Value("x".into()),
            Piece::Trusted(">".into()),
            Piece::Value("".into()),
            Piece::Trusted("</a>".into()),
            Piece::Value("y".into()),
        ]
    );
}
