use crate::core::io::traits::InputFile;
use crate::core::models::residue::{ResidueRecord, ResidueTable};
use std::io::{self, BufRead};
use thiserror::Error;

/// Minimum number of whitespace-separated fields on an atom line.
const MIN_ATOM_FIELDS: usize = 10;

const RESIDUE_NUMBER_FIELD: usize = 1;
const SEGMENT_ID_FIELD: usize = 7;
const POSITIONAL_ID_FIELD: usize = 8;
const CONFIDENCE_FIELD: usize = 9;

#[derive(Debug, Error)]
pub enum CrdError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing extended-format header line (second field 'EXT')")]
    MissingHeader,
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: CrdParseErrorKind },
    #[error("No atom records found after the header")]
    NoRecords,
}

#[derive(Debug, Error, PartialEq)]
pub enum CrdParseErrorKind {
    #[error("Invalid integer in field {field} (value: '{value}')")]
    InvalidInt { field: usize, value: String },
    #[error("Invalid float in field {field} (value: '{value}')")]
    InvalidFloat { field: usize, value: String },
}

/// Reader for CHARMM extended-format coordinate files.
///
/// Only the fields needed downstream are kept: residue number, segment id,
/// residue id within the segment, and the weighting column, which carries the
/// per-residue confidence for predicted models.
pub struct CrdFile;

impl InputFile for CrdFile {
    type Output = ResidueTable;
    type Error = CrdError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut records = Vec::new();
        let mut in_header = true;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();

            if fields.first().is_none_or(|f| f.starts_with('*')) {
                continue;
            }
            if in_header {
                if fields.get(1) == Some(&"EXT") {
                    in_header = false;
                }
                continue;
            }
            if fields.len() < MIN_ATOM_FIELDS {
                continue;
            }

            records.push(parse_atom_line(&fields, line_num)?);
        }

        if in_header {
            return Err(CrdError::MissingHeader);
        }
        if records.is_empty() {
            return Err(CrdError::NoRecords);
        }
        Ok(ResidueTable::new(records))
    }
}

fn parse_atom_line(fields: &[&str], line: usize) -> Result<ResidueRecord, CrdError> {
    let parse_int = |field: usize| {
        fields[field].parse::<i64>().map_err(|_| CrdError::Parse {
            line,
            kind: CrdParseErrorKind::InvalidInt {
                field,
                value: fields[field].to_string(),
            },
        })
    };

    let residue_number = parse_int(RESIDUE_NUMBER_FIELD)?;
    let positional_id = parse_int(POSITIONAL_ID_FIELD)?;
    let confidence = fields[CONFIDENCE_FIELD]
        .parse::<f64>()
        .map_err(|_| CrdError::Parse {
            line,
            kind: CrdParseErrorKind::InvalidFloat {
                field: CONFIDENCE_FIELD,
                value: fields[CONFIDENCE_FIELD].to_string(),
            },
        })?;

    Ok(ResidueRecord {
        residue_number,
        segment_id: fields[SEGMENT_ID_FIELD].to_string(),
        positional_id,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::EngineError;
    use std::fs;
    use std::io::Cursor;

    fn parse(content: &str) -> Result<ResidueTable, CrdError> {
        CrdFile::read_from(&mut Cursor::new(content))
    }

    const SAMPLE: &str = "\
* GENERATED FROM MODEL
*
        6  EXT
         1         1  MET       N              -8.1700       10.5210       -7.0950  PROA      1              85.5500
         2         1  MET       CA             -7.2100        9.4440       -6.8150  PROA      1              85.5500
         3         2  LYS       N              -5.9980        9.8420       -6.4450  PROA      2              90.1200
         4         3  GLY       N              -4.1190        8.1570       -4.5640  PROB      1              40.0000
* trailing comment
         5         4  ALA       N              -2.6800        7.1690       -3.2330  PROB      2               0.0000

";

    #[test]
    fn reads_atom_records_after_header() {
        let table = parse(SAMPLE).unwrap();
        assert_eq!(table.records().len(), 5);
        assert_eq!(table.first_residue_number(), Some(1));
        assert_eq!(table.last_residue_number(), Some(4));
        assert_eq!(
            table.records()[3],
            ResidueRecord {
                residue_number: 3,
                segment_id: "PROB".to_string(),
                positional_id: 1,
                confidence: 40.0,
            }
        );
    }

    #[test]
    fn derives_chain_boundaries_from_segment_changes() {
        let table = parse(SAMPLE).unwrap();
        assert_eq!(table.chain_boundaries().into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn short_lines_after_header_are_skipped() {
        let content = "    1  EXT\n  short line here\n 1 7 ALA N 0 0 0 A 7 88.0\n";
        let table = parse(content).unwrap();
        assert_eq!(table.records().len(), 1);
        assert_eq!(table.records()[0].residue_number, 7);
    }

    #[test]
    fn missing_ext_line_is_rejected() {
        let content = "* title\n 1 1 MET N 0 0 0 PROA 1 80.0\n";
        assert!(matches!(parse(content), Err(CrdError::MissingHeader)));
    }

    #[test]
    fn header_without_records_is_rejected() {
        assert!(matches!(parse("* title\n    0  EXT\n"), Err(CrdError::NoRecords)));
    }

    #[test]
    fn bad_numbers_report_line_and_field() {
        let content = "* t\n    1  EXT\n 1 x MET N 0 0 0 PROA 1 80.0\n";
        match parse(content) {
            Err(CrdError::Parse { line, kind }) => {
                assert_eq!(line, 3);
                assert_eq!(
                    kind,
                    CrdParseErrorKind::InvalidInt {
                        field: 1,
                        value: "x".to_string()
                    }
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let content = "    1  EXT\n 1 1 MET N 0 0 0 PROA 1 high\n";
        assert!(matches!(
            parse(content),
            Err(CrdError::Parse {
                line: 2,
                kind: CrdParseErrorKind::InvalidFloat { field: 9, .. }
            })
        ));
    }

    #[test]
    fn loading_a_directory_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CrdFile::load(dir.path()),
            Err(EngineError::MissingInput { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.crd");
        let mut bytes = SAMPLE.as_bytes().to_vec();
        bytes.extend_from_slice(b"         7         4  ALA  \xFF\n");
        fs::write(&path, bytes).unwrap();

        match CrdFile::load(&path) {
            Err(EngineError::InvalidFormat(msg)) => assert!(msg.contains("model.crd")),
            other => panic!("unexpected result: {:?}", other.map(|t| t.residue_count())),
        }
    }

    #[test]
    fn loading_a_well_formed_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.crd");
        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(CrdFile::load(&path).unwrap().records().len(), 5);
    }
}
