//! JSON rendering and persistence for aggregated course sections.
//!
//! Documents are pretty-printed with two-space indentation. Characters
//! outside printable ASCII are written as `\uXXXX` escapes so output matches
//! earlier exports byte for byte.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::aggregation::types::CourseSection;

/// Two-space pretty formatter that escapes everything outside `' '..='~'`.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl AsciiFormatter<'_> {
    fn new() -> Self {
        AsciiFormatter(PrettyFormatter::with_indent(b"  "))
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serializes `value` into `writer` in the export JSON format.
pub fn write_json<W: Write>(writer: W, value: &impl Serialize) -> Result<()> {
    let mut ser = Serializer::with_formatter(writer, AsciiFormatter::new());
    value.serialize(&mut ser)?;
    Ok(())
}

/// Renders sections to a JSON string.
pub fn render_sections(sections: &[CourseSection]) -> Result<String> {
    let mut buf = Vec::new();
    write_json(&mut buf, &sections)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes sections as a JSON array to `path`, replacing any existing file.
///
/// The parent directory is created if it does not exist.
pub fn write_sections(path: &Path, sections: &[CourseSection]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, &sections)?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;

    debug!(path = %path.display(), sections = sections.len(), "Wrote sections");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(render_sections(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_two_space_indent() {
        let json = render_sections(&[CourseSection::new("WQ2023")]).unwrap();
        assert!(json.starts_with("[\n  {\n    \"enrollment\": [],\n    \"_id\": \"\",\n"));
        assert!(json.ends_with("\n  }\n]"));
        assert!(json.contains("\n    \"aplus\": 0,\n"));
        assert!(json.contains("\n    \"quarter\": \"WQ2023\",\n"));
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let mut section = CourseSection::new("WQ2023");
        section.instructor = "José Núñez".into();
        section.name = "Music 🎵".into();
        let json = render_sections(&[section]).unwrap();

        assert!(json.is_ascii());
        assert!(json.contains("\"Jos\\u00e9 N\\u00fa\\u00f1ez\""));
        assert!(json.contains("\"Music \\ud83c\\udfb5\""));
    }

    #[test]
    fn test_escaped_output_parses_back() {
        let mut section = CourseSection::new("WQ2023");
        section.name = "Éléments \"quoted\"\tdel\u{7f}".into();
        let json = render_sections(&[section]).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "Éléments \"quoted\"\tdel\u{7f}");
    }

    #[test]
    fn test_write_sections_creates_file() {
        let dir = temp_path("grade_report_converter_test_output");
        let path = dir.join("courses_Winter_2023.json");
        let _ = fs::remove_dir_all(&dir);

        write_sections(&path, &[CourseSection::new("WQ2023")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, render_sections(&[CourseSection::new("WQ2023")]).unwrap());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_sections_overwrites() {
        let path = temp_path("grade_report_converter_test_overwrite.json");
        let _ = fs::remove_file(&path);

        let sections = [CourseSection::new("WQ2023"), CourseSection::new("WQ2023")];
        write_sections(&path, &sections).unwrap();
        write_sections(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        fs::remove_file(&path).unwrap();
    }
}
