use std::fs;
use std::io::{BufReader, Read, Write};

use camino::Utf8Path;
use flate2::read::GzDecoder;

use crate::error::AnnotationError;

/// Reads a UTF-8 text file, decompressing it first when the name ends in `.gz`.
pub fn read_text(path: &Utf8Path) -> Result<String, AnnotationError> {
    let file = fs::File::open(path.as_std_path()).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            AnnotationError::InputNotFound(path.to_string())
        } else {
            AnnotationError::Filesystem(format!("open {path}: {err}"))
        }
    })?;

    let mut text = String::new();
    let reader = BufReader::new(file);
    let result = if path.extension() == Some("gz") {
        GzDecoder::new(reader).read_to_string(&mut text)
    } else {
        let mut reader = reader;
        reader.read_to_string(&mut text)
    };
    result.map_err(|err| AnnotationError::Filesystem(format!("read {path}: {err}")))?;
    Ok(text)
}

/// Writes `content` to a temporary sibling and renames it over `dest`.
pub fn write_atomic(dest: &Utf8Path, content: &[u8]) -> Result<(), AnnotationError> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| AnnotationError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix("kira-as-out")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| AnnotationError::Filesystem(err.to_string()))?;
    temp.write_all(content)
        .map_err(|err| AnnotationError::Filesystem(err.to_string()))?;
    temp.persist(dest.as_std_path())
        .map_err(|err| AnnotationError::Filesystem(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    #[test]
    fn reads_gzipped_text() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("links.txt.gz")).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"ko:K00001\tpath:map00010\n").unwrap();
        fs::write(path.as_std_path(), encoder.finish().unwrap()).unwrap();

        assert_eq!(read_text(&path).unwrap(), "ko:K00001\tpath:map00010\n");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_text(Utf8Path::new("/nonexistent/annotations.tsv")).unwrap_err();
        assert_matches!(err, AnnotationError::InputNotFound(_));
    }

    #[test]
    fn atomic_write_replaces_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("out.tsv")).unwrap();
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(path.as_std_path()).unwrap(), "second");
    }
}
