use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::io;

use crate::JsonError;

/// How encoded text is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Layout {
    /// One line, `", "` between items and `": "` after keys.
    #[default]
    Compact,
    /// One item per line, indented by the given number of spaces.
    Indented(usize),
}

/// Single-line output with a space after every separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

pub(crate) fn write<T>(value: &T, layout: Layout) -> Result<String, JsonError>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    match layout {
        Layout::Compact => {
            let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
            value.serialize(&mut ser)?;
        }
        Layout::Indented(width) => {
            let indent = " ".repeat(width);
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
        }
    }
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_keeps_multibyte_text_intact() {
        let v = json!({"note": "räksmörgås", "ids": [1, 2]});
        assert_eq!(
            write(&v, Layout::Compact).unwrap(),
            r#"{"ids": [1, 2], "note": "räksmörgås"}"#
        );
    }

    #[test]
    fn indented_uses_requested_width() {
        let v = json!({"a": [1]});
        assert_eq!(
            write(&v, Layout::Indented(4)).unwrap(),
            "{\n    \"a\": [\n        1\n    ]\n}"
        );
    }
}
