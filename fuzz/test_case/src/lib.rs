use autoesc::{AsciiCompatibleEncoding, EscapingWriter, Settings};
use encoding_rs::*;
use rand::Rng;

static ASCII_COMPATIBLE_ENCODINGS: [&Encoding; 36] = [
    BIG5,
    EUC_JP,
    EUC_KR,
    GB18030,
    GBK,
    IBM866,
    ISO_8859_2,
    ISO_8859_3,
    ISO_8859_4,
    ISO_8859_5,
    ISO_8859_6,
    ISO_8859_7,
    ISO_8859_8,
    ISO_8859_8_I,
    ISO_8859_10,
    ISO_8859_13,
    ISO_8859_14,
    ISO_8859_15,
    ISO_8859_16,
    KOI8_R,
    KOI8_U,
    MACINTOSH,
    SHIFT_JIS,
    UTF_8,
    WINDOWS_874,
    WINDOWS_1250,
    WINDOWS_1251,
    WINDOWS_1252,
    WINDOWS_1253,
    WINDOWS_1254,
    WINDOWS_1255,
    WINDOWS_1256,
    WINDOWS_1257,
    WINDOWS_1258,
    X_MAC_CYRILLIC,
    X_USER_DEFINED,
];

/// Separates trusted text from untrusted values in the fuzzer input.
const VALUE_DELIMITER: char = '\u{1}';

fn get_random_encoding() -> &'static Encoding {
    let random_encoding_index = rand::thread_rng().gen_range(0..ASCII_COMPATIBLE_ENCODINGS.len());

    ASCII_COMPATIBLE_ENCODINGS[random_encoding_index]
}

/// Writes the pieces, trusted and untrusted in turn, cutting trusted text into
/// chunks of `chunk_size` bytes.
fn render(pieces: &[&str], settings: Settings, chunk_size: usize) -> Vec<u8> {
    let mut output = Vec::new();

    {
        let mut writer = EscapingWriter::new(settings, |c: &[u8]| output.extend_from_slice(c));

        for (i, piece) in pieces.iter().enumerate() {
            if i % 2 == 1 {
                writer.write_value(*piece).unwrap();
                continue;
            }

            let mut rest = *piece;

            while !rest.is_empty() {
                let mut end = chunk_size.min(rest.len());

                while !rest.is_char_boundary(end) {
                    end += 1;
                }

                writer.write_trusted(&rest[..end]).unwrap();
                rest = &rest[end..];
            }
        }

        writer.close().unwrap();
    }

    output
}

pub fn run_writer(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    let pieces: Vec<&str> = input.split(VALUE_DELIMITER).collect();

    // fuzzing with a randomly picked encoding and chunk size works much
    // faster than iterating over all of them per single run
    let settings = Settings {
        encoding: AsciiCompatibleEncoding::new(get_random_encoding()).unwrap(),
        soft: data.first().is_some_and(|b| b & 1 == 1),
        ..Settings::default()
    };

    let chunk_size = rand::thread_rng().gen_range(1..=input.len().max(1));
    let whole = render(&pieces, settings.clone(), usize::MAX);
    let chunked = render(&pieces, settings, chunk_size);

    assert_eq!(whole, chunked, "output depends on how trusted text is chunked");
}
