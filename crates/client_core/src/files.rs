use std::{fs, path::Path};

use shared::{domain::FileCandidate, error::SelectionError};

/// Builds a candidate the way a browser describes a picked file: the file
/// name, its byte length, and a type guessed from the extension.
pub fn candidate_from_path(path: &Path) -> Result<FileCandidate, SelectionError> {
    let bytes = fs::read(path).map_err(|source| SelectionError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(candidate_with_declared_type(name, "", bytes))
}

/// Keeps a declared type when the source supplied one, otherwise guesses it
/// from the name. An unknown extension declares no type.
pub fn candidate_with_declared_type(
    name: impl Into<String>,
    declared_mime: &str,
    bytes: Vec<u8>,
) -> FileCandidate {
    let name = name.into();
    let mime_type = if declared_mime.trim().is_empty() {
        mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or_default()
            .to_string()
    } else {
        declared_mime.trim().to_string()
    };
    FileCandidate::new(name, mime_type, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::PDF_MIME_TYPE;
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    #[test]
    fn guesses_type_from_extension_when_undeclared() {
        let pdf = candidate_with_declared_type("report.pdf", "", vec![1]);
        assert_eq!(pdf.mime_type, PDF_MIME_TYPE);

        let text = candidate_with_declared_type("notes.txt", "", vec![1]);
        assert_eq!(text.mime_type, "text/plain");

        let unknown = candidate_with_declared_type("blob", "", vec![1]);
        assert_eq!(unknown.mime_type, "");
    }

    #[test]
    fn declared_type_wins_over_extension() {
        let candidate = candidate_with_declared_type("report.pdf", "text/plain", vec![1]);
        assert_eq!(candidate.mime_type, "text/plain");
        assert!(!candidate.is_pdf());
    }

    #[test]
    fn reads_candidate_from_disk() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("unmark_candidate_{suffix}.pdf"));
        fs::write(&path, b"%PDF-1.7").expect("write");

        let candidate = candidate_from_path(&path).expect("candidate");
        assert_eq!(candidate.name, format!("unmark_candidate_{suffix}.pdf"));
        assert_eq!(candidate.size_bytes(), 8);
        assert!(candidate.is_pdf());

        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn missing_path_is_unreadable() {
        let err = candidate_from_path(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, SelectionError::Unreadable { .. }));
    }
}
