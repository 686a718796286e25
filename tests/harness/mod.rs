use encoding_rs::*;

mod template;
pub mod tokens;

pub use self::suite::{get_tests, TestCase};
pub use self::template::{chunk_size, split_into_chunks, Piece, Template};

pub static ASCII_COMPATIBLE_ENCODINGS: [&Encoding; 36] = [
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

// NOTE: compares raw output bytes, but prints them as text.
macro_rules! assert_eql {
    ($actual:expr, $expected:expr, $template:expr, $chunk_size:expr, $msg:expr) => {
        assert!(
            $actual == $expected,
            "{}\n\
             template: {:?}\n\
             chunk size: {}\n\
             actual: {:?}\n\
             expected: {:?}",
            $msg,
            $template,
            $chunk_size,
            String::from_utf8_lossy(&$actual),
            String::from_utf8_lossy(&$expected)
        );
    };
}
