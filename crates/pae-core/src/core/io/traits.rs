use crate::engine::error::EngineError;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading one of the pipeline's input formats.
pub trait InputFile {
    /// The in-memory representation produced by the reader.
    type Output;

    /// The error type for parsing and I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads the format from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Reads the format from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Reads the format from a file path, classifying failures for the engine.
    ///
    /// A path that cannot be opened or read, a directory for instance, becomes
    /// [`EngineError::MissingInput`]. Anything wrong with the content,
    /// including bytes that are not valid UTF-8, becomes [`EngineError::InvalidFormat`].
    fn load<P: AsRef<Path>>(path: P) -> Result<Self::Output, EngineError>
    where
        EngineError: From<Self::Error>,
    {
        let path = path.as_ref();
        let unreadable = |source: io::Error| EngineError::MissingInput {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader).map_err(|e| match EngineError::from(e) {
            EngineError::InvalidFormat(msg) => {
                EngineError::InvalidFormat(format!("{}: {}", path.display(), msg))
            }
            EngineError::Io(source) if source.kind() == io::ErrorKind::InvalidData => {
                EngineError::InvalidFormat(format!("{}: {}", path.display(), source))
            }
            EngineError::Io(source) => unreadable(source),
            other => other,
        })
    }
}
