use std::io::{self, Write};

use serde_json::Value;

/// Line-oriented writer for CLI results.
/// A closed downstream pipe ends the process with exit code 0.
pub struct LineWriter<W: Write> {
    writer: W,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        LineWriter { writer }
    }

    pub fn writeln(&mut self, content: &str) -> io::Result<()> {
        let result = writeln!(self.writer, "{}", content).and_then(|_| self.writer.flush());
        match result {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => std::process::exit(0),
            other => other,
        }
    }

    /// Write one compact JSON document per line
    pub fn write_record(&mut self, record: &Value) -> io::Result<()> {
        self.writeln(&record.to_string())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

pub fn stdout_lines() -> LineWriter<io::Stdout> {
    LineWriter::new(io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lines() {
        let mut out = LineWriter::new(Vec::new());
        out.writeln("age gt 21").unwrap();
        out.writeln("").unwrap();
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "age gt 21\n\n");
    }

    #[test]
    fn test_records_are_compact() {
        let mut out = LineWriter::new(Vec::new());
        out.write_record(&json!({"a": [1, 2], "b": "x"})).unwrap();
        out.write_record(&json!(null)).unwrap();
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "{\"a\":[1,2],\"b\":\"x\"}\nnull\n"
        );
    }
}
