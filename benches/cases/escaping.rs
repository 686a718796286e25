use crate::{Input, Piece};
use autoesc::escape::{escape_css, escape_html, escape_js_string, filter_url, UrlSchemes};
use criterion::Bencher;
use std::hint::black_box;

fn create_runner(escape: fn(&str, &mut String)) -> impl FnMut(&mut Bencher<'_>, &Input) {
    move |b, input: &Input| {
        let mut out = String::new();

        b.iter(|| {
            for piece in &input.pieces {
                // NOTE: trusted text is escaped too, to get more input.
                let (Piece::Trusted(text) | Piece::Value(text)) = piece;

                out.clear();
                escape(text, &mut out);
                black_box(&out);
            }
        })
    }
}

define_group!(
    "Escaping",
    [
        ("HTML", create_runner(|text, out| escape_html(text, false, out))),
        ("JS string", create_runner(escape_js_string)),
        ("CSS", create_runner(escape_css)),
        (
            "URL",
            create_runner(|text, out| filter_url(text, UrlSchemes::default(), out))
        )
    ]
);
