//! Output formatting utilities for CLI operations.
//!
//! Results are written to stdout as pretty-printed JSON so they can be piped
//! into other tools.

use std::io::{self, Write};

use ghnotes::NoteError;
use serde::Serialize;

/// Writes `value` to stdout as JSON.
pub fn write_json<T: Serialize>(value: &T) -> Result<(), NoteError> {
    let mut stdout = io::stdout().lock();
    write_json_to(&mut stdout, value)
}

/// Writes `value` to the given writer as JSON followed by a newline.
pub fn write_json_to<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<(), NoteError> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(|error| NoteError::Io {
        message: error.to_string(),
    })?;
    writeln!(writer).map_err(|error| io_error(&error))
}

fn io_error(error: &io::Error) -> NoteError {
    NoteError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use ghnotes::NoteError;
    use serde_json::json;

    use super::write_json_to;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn json_is_written_with_trailing_newline() {
        let mut buffer = Vec::new();

        write_json_to(&mut buffer, &json!({"deleted": "abc"})).expect("write should succeed");

        let text = String::from_utf8(buffer).expect("output should be UTF-8");
        assert!(text.ends_with("}\n"), "unexpected output: {text:?}");
        let parsed: serde_json::Value =
            serde_json::from_str(&text).expect("output should be valid JSON");
        assert_eq!(parsed, json!({"deleted": "abc"}));
    }

    #[test]
    fn write_failures_map_to_io_errors() {
        let result = write_json_to(&mut FailingWriter, &json!({"a": 1}));

        assert!(
            matches!(result, Err(NoteError::Io { ref message }) if message.contains("pipe closed")),
            "expected Io error, got {result:?}"
        );
    }
}
