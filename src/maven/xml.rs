use crate::Result;
use core::fmt::Write;

/// Escape text for embedding in XML element content or attribute values.
#[must_use]
pub fn xml_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

/// Write `<name>value</name>` on its own line, indented by `depth` levels of two spaces.
pub fn write_element<W: Write>(writer: &mut W, depth: usize, name: &str, value: &str) -> Result<()> {
    writeln!(writer, "{:indent$}<{name}>{}</{name}>", "", xml_escape(value), indent = depth * 2)?;
    Ok(())
}
