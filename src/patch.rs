// Timezone label localizer, (c) 2022-2024 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Line-based patching of resource array files.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use anyhow::{Context, Result};
use elementtree::Element;
use tempfile::NamedTempFile;
use crate::util::{xml_escape, ElementExt};

/// The new item goes after this many lines, counting the marker line.
pub const OFFSET: usize = 22;

/// A line to insert at `OFFSET` lines after a marker line.  The line is
/// stored without line ending; the file's own ending is used.
#[derive(Debug, Clone)]
pub struct Insertion {
    pub marker: String,
    pub line: String,
}

impl Insertion {
    /// An `<item>` with quoted text, in the usual array indentation.
    pub fn item(marker: &str, text: &str) -> Self {
        Self {
            marker: marker.into(),
            line: item_line(text),
        }
    }
}

pub fn item_line(text: &str) -> String {
    format!("    <item>\"{}\"</item>", xml_escape(text))
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Copy `input` to `out`, inserting lines as requested.  Every occurrence
/// of a marker restarts its count.  Returns the number of inserted lines.
///
/// Inserted lines get the ending of the line they follow.  After a last
/// line without ending, the new line is put on its own line and becomes the
/// new unterminated last line.
pub fn insert_lines(mut input: impl BufRead, mut out: impl Write,
                    insertions: &[Insertion]) -> Result<usize> {
    let mut counters = vec![None; insertions.len()];
    let mut inserted = 0;
    let mut eol = "\n";
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        out.write_all(line.as_bytes())?;
        let ending = line_ending(&line);
        if !ending.is_empty() {
            eol = ending;
        }
        for (ins, counter) in insertions.iter().zip(&mut counters) {
            if line.contains(&ins.marker) {
                *counter = Some(0);
            }
            if let Some(n) = counter {
                *n += 1;
                if *n == OFFSET {
                    if ending.is_empty() {
                        out.write_all(eol.as_bytes())?;
                        out.write_all(ins.line.as_bytes())?;
                    } else {
                        out.write_all(ins.line.as_bytes())?;
                        out.write_all(ending.as_bytes())?;
                    }
                    inserted += 1;
                }
            }
        }
    }
    Ok(inserted)
}

/// Patch the file in place.  The result is written to a temporary file
/// next to it, which then replaces the original.
pub fn patch(path: &Path, insertions: &[Insertion]) -> Result<usize> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let input = BufReader::new(File::open(path)
                               .with_context(|| format!("opening {}", path.display()))?);
    let tmp = NamedTempFile::new_in(dir).context("creating temporary file")?;

    let mut out = BufWriter::new(tmp.as_file());
    let inserted = insert_lines(input, &mut out, insertions)
        .with_context(|| format!("copying {}", path.display()))?;
    out.flush()?;
    drop(out);

    let perms = fs::metadata(path)?.permissions();
    tmp.as_file().set_permissions(perms)?;
    tmp.persist(path).map_err(|e| e.error)
       .with_context(|| format!("replacing {}", path.display()))?;
    Ok(inserted)
}

/// Check if the file already has one of the given lines (ignoring
/// indentation).
pub fn has_line(path: &Path, lines: &[&str]) -> Result<bool> {
    let input = BufReader::new(File::open(path)
                               .with_context(|| format!("opening {}", path.display()))?);
    for existing in input.lines() {
        let existing = existing?;
        if lines.iter().any(|line| line.trim() == existing.trim()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Extract the array name from a marker like `name="timezone_labels"`.
pub fn marker_name(marker: &str) -> &str {
    marker.strip_prefix("name=\"").and_then(|m| m.strip_suffix('"')).unwrap_or(marker)
}

/// Count the items of the two named arrays.  Returns `None` if one of
/// them does not exist.
pub fn array_sizes(path: &Path, first: &str, second: &str) -> Result<Option<(usize, usize)>> {
    let root = Element::from_reader(File::open(path)?)
        .with_context(|| format!("parsing {}", path.display()))?;
    let count = |name: &str| {
        root.find_named("string-array", name)
            .or_else(|| root.find_named("array", name))
            .map(|arr| arr.children().filter(|item| item.tag().name() == "item").count())
    };
    Ok(count(first).zip(count(second)))
}
