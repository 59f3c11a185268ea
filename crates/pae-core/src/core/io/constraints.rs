use crate::core::models::domain::{ConstraintDocument, RigidBody};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Terminator written at the end of every constraint document.
pub const TERMINATOR: &str = "return";

/// Writes a constraint document in CHARMM stream syntax.
///
/// The fixed body becomes `define fixed<k>` selections joined by one `cons fix`
/// statement; each mobile body becomes `define rigid<k>` selections joined by a
/// `shape desc dock<m>` statement. Selection numbering restarts for every body,
/// while dock numbering counts mobile bodies from 1.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_constraints(document: &ConstraintDocument, writer: &mut impl Write) -> io::Result<()> {
    if let Some(fixed) = document.fixed_body() {
        write_selections(writer, "fixed", fixed)?;
        writeln!(writer, "cons fix sele {} end", selection_union("fixed", fixed.len()))?;
        writeln!(writer)?;
    }

    for (dock, body) in document.mobile_bodies().iter().enumerate() {
        write_selections(writer, "rigid", body)?;
        writeln!(
            writer,
            "shape desc dock{} rigid sele {} end",
            dock + 1,
            selection_union("rigid", body.len())
        )?;
        writeln!(writer)?;
    }

    writeln!(writer, "{}", TERMINATOR)
}

/// Renders a constraint document to a string.
pub fn render_constraints(document: &ConstraintDocument) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_constraints(document, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes a constraint document to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_constraints_to_path<P: AsRef<Path>>(
    document: &ConstraintDocument,
    path: P,
) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_constraints(document, &mut writer)?;
    writer.flush()
}

fn write_selections(writer: &mut impl Write, prefix: &str, body: &RigidBody) -> io::Result<()> {
    for (k, domain) in body.iter().enumerate() {
        writeln!(
            writer,
            "define {}{} sele ( resid {}:{} .and. segid {} ) end",
            prefix,
            k + 1,
            domain.start,
            domain.end,
            domain.segment_id
        )?;
    }
    Ok(())
}

fn selection_union(prefix: &str, count: usize) -> String {
    (1..=count)
        .map(|k| format!("{}{}", prefix, k))
        .collect::<Vec<_>>()
        .join(" .or. ")
}
