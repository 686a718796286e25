use autoesc::{AsciiCompatibleEncoding, EscapingWriter, Settings};
use getopts::{Matches, Options};
use std::env::args;
use std::io::{self, Write};

fn parse_options() -> Option<Matches> {
    let mut opts = Options::new();

    opts.optopt("c", "chunk_size", "Chunk size of trusted text", "-c");
    opts.optopt("e", "encoding", "Output encoding label", "-e windows-1252");
    opts.optflag("s", "soft", "Start in soft mode");
    opts.optflag("h", "help", "Show this help");

    let matches = match opts.parse(args().skip(1)) {
        Ok(matches) => {
            if matches.free.is_empty() {
                eprintln!("Missing template input");
                None
            } else if matches.opt_present("h") {
                None
            } else {
                Some(matches)
            }
        }
        Err(e) => {
            eprintln!("{e}");
            None
        }
    };

    if matches.is_none() {
        eprintln!(
            "{}",
            opts.usage(
                "Usage: ./scripts/context_trace.sh -- [options] TEMPLATE\n\n\
                 Untrusted values are marked with {{...}} in the template."
            )
        );
    }

    matches
}

/// Splits a template into trusted text and untrusted values, in turn.
fn split_template(template: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let end = rest[start..].find("}}").map_or(rest.len(), |len| start + len);

        pieces.push(&rest[..start]);
        pieces.push(&rest[start + 2..end]);
        rest = rest.get(end + 2..).unwrap_or("");
    }

    pieces.push(rest);
    pieces
}

fn main() {
    let matches = match parse_options() {
        Some(m) => m,
        None => return,
    };

    let template = matches.free.first().unwrap();

    let encoding = match matches.opt_str("e") {
        Some(label) => AsciiCompatibleEncoding::from_label(&label).unwrap(),
        None => AsciiCompatibleEncoding::utf_8(),
    };

    let settings = Settings {
        encoding,
        soft: matches.opt_present("s"),
        ..Settings::default()
    };

    let mut output = Vec::new();

    {
        let mut writer = EscapingWriter::new(settings, |c: &[u8]| output.extend_from_slice(c));

        for (i, piece) in split_template(template).into_iter().enumerate() {
            if i % 2 == 1 {
                writer.write_value(piece).unwrap();
                continue;
            }

            let chunks = if let Some(chunk_size) = matches.opt_get("c").unwrap() {
                piece.as_bytes().chunks(chunk_size).collect()
            } else {
                vec![piece.as_bytes()]
            };

            for chunk in chunks {
                // NOTE: chunks are cut at byte offsets, so non-ASCII templates need
                // a chunk size that keeps characters whole.
                writer.write_trusted(std::str::from_utf8(chunk).unwrap()).unwrap();
            }
        }

        writer.close().unwrap();
    }

    println!("\nOutput:");
    io::stdout().write_all(&output).unwrap();
    println!();
}
