use crate::{Input, Piece};
use autoesc::{EscapingWriter, Settings};
use criterion::Bencher;
use std::hint::black_box;

fn create_runner(settings: Settings) -> impl FnMut(&mut Bencher<'_>, &Input) {
    move |b, input: &Input| {
        b.iter(|| {
            let mut writer = EscapingWriter::new(settings.clone(), |c: &[u8]| {
                black_box(c);
            });

            for piece in &input.pieces {
                match piece {
                    Piece::Trusted(text) => writer.write_trusted(text).unwrap(),
                    Piece::Value(value) => writer.write_value(value.as_str()).unwrap(),
                }
            }

            writer.close().unwrap();
        })
    }
}

/// Writes the trusted text of `input` in chunks of the benchmark's parameter.
pub fn chunked_runner(input: &Input) -> impl FnMut(&mut Bencher<'_>, &usize) + '_ {
    move |b, &chunk_size| {
        b.iter(|| {
            let mut writer = EscapingWriter::new(Settings::default(), |c: &[u8]| {
                black_box(c);
            });

            for piece in &input.pieces {
                match piece {
                    Piece::Trusted(text) => {
                        // NOTE: the inputs are ASCII, so any byte offset is a char boundary.
                        for chunk in text.as_bytes().chunks(chunk_size) {
                            writer
                                .write_trusted(std::str::from_utf8(chunk).unwrap())
                                .unwrap();
                        }
                    }
                    Piece::Value(value) => writer.write_value(value.as_str()).unwrap(),
                }
            }

            writer.close().unwrap();
        })
    }
}

define_group!(
    "Writing",
    [
        ("UTF-8", create_runner(Settings::default())),
        (
            "Soft mode",
            create_runner(Settings {
                soft: true,
                ..Settings::default()
            })
        ),
        (
            // NOTE: measures transcoding on top of escaping.
            "windows-1251",
            create_runner(Settings {
                encoding: autoesc::AsciiCompatibleEncoding::new(encoding_rs::WINDOWS_1251).unwrap(),
                ..Settings::default()
            })
        )
    ]
);
