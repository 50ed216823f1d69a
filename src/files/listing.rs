//! HTML directory listings.

use std::fmt::Write;
use std::fs;
use std::io;
use std::path::Path;

use crate::files::overrides::SENTINEL;
use crate::http::urlencoded::percent_encode_segment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// Reads the entries of `dir`, sorted by name, without the sentinel file.
pub fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == SENTINEL {
            continue;
        }
        let metadata = entry.metadata()?;
        entries.push(Entry {
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Renders a listing page for the directory served at `url_path`.
pub fn render(url_path: &str, entries: &[Entry]) -> String {
    let title = escape_html(url_path);
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Index of {title}</title></head>\n\
         <body><h1>Index of {title}</h1>\n<ul>\n"
    );
    if url_path != "/" {
        page.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        let size = if entry.is_dir { String::new() } else { format!(" ({})", byte_count_decimal(entry.size)) };
        let _ = writeln!(
            page,
            "<li><a href=\"{}{suffix}\">{}{suffix}</a>{size}</li>",
            percent_encode_segment(&entry.name),
            escape_html(&entry.name),
        );
    }
    page.push_str("</ul>\n</body></html>\n");
    page
}

/// Formats a size with SI prefixes, one decimal above 999 bytes.
pub fn byte_count_decimal(bytes: u64) -> String {
    const UNIT: u64 = 1000;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let prefix = ['k', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {}B", bytes as f64 / div as f64, prefix)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
