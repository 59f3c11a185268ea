use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes clusters as comma-separated rows of vertex indices.
///
/// Rows shorter than the largest cluster are padded with empty trailing fields so
/// every row has the same width. No clusters produce an empty table.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_cluster_table<W: Write>(clusters: &[Vec<usize>], writer: W) -> Result<(), csv::Error> {
    let width = clusters.iter().map(Vec::len).max().unwrap_or(0);
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for cluster in clusters {
        let row = cluster
            .iter()
            .map(|v| v.to_string())
            .chain(std::iter::repeat_n(String::new(), width - cluster.len()));
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the cluster table to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_cluster_table_to_path<P: AsRef<Path>>(
    clusters: &[Vec<usize>],
    path: P,
) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_cluster_table(clusters, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(clusters: &[Vec<usize>]) -> String {
        let mut buffer = Vec::new();
        write_cluster_table(clusters, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn pads_rows_to_largest_cluster() {
        let clusters = vec![vec![0, 1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]];
        assert_eq!(render(&clusters), "0,1,2,3,4,5\n6,7,8,9,10,\n");
    }

    #[test]
    fn no_clusters_yield_empty_table() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn writes_table_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clusters.csv");
        write_cluster_table_to_path(&[vec![3, 4, 5, 6, 7]], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3,4,5,6,7\n");
    }
}
