//! Corpus loading
//!
//! The corpus is read once at startup and handed to the ranker by reference.

use std::path::Path;

use crate::core::Example;
use crate::error::CorpusError;

/// Demonstration corpus compiled into the binary
const BUILTIN_CORPUS: &str = include_str!("../../corpus/examples.json");

/// Load a JSON array of `{description, code}` records
pub fn load_corpus(path: &Path) -> Result<Vec<Example>, CorpusError> {
    let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let examples: Vec<Example> =
        serde_json::from_str(&content).map_err(|source| CorpusError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Loaded {} examples from {:?}", examples.len(), path);
    Ok(examples)
}

/// The bundled corpus used when no corpus path is configured
pub fn builtin_corpus() -> Vec<Example> {
    match serde_json::from_str(BUILTIN_CORPUS) {
        Ok(examples) => examples,
        Err(e) => {
            tracing::warn!("Bundled corpus is malformed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_corpus_is_populated() {
        let corpus = builtin_corpus();
        assert!(!corpus.is_empty());
        assert!(corpus.iter().all(Example::is_complete));
    }

    #[test]
    fn test_load_corpus_tolerates_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"description": "Clock"}}, {{"code": "noLoop();"}}]"#).unwrap();

        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].code, "");
        assert_eq!(corpus[1].description, "");
    }

    #[test]
    fn test_load_corpus_tolerates_null_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"description": "Clock", "code": null}}]"#).unwrap();

        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].description, "Clock");
        assert_eq!(corpus[0].code, "");
    }

    #[test]
    fn test_load_corpus_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_corpus(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Parse { .. }));
    }

    #[test]
    fn test_load_corpus_reports_missing_file() {
        let err = load_corpus(Path::new("/nonexistent/corpus.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
