use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

pub const PDF_MIME_TYPE: &str = "application/pdf";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A file handed to the widget by a drop or the picker, before the MIME gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }
}

/// A candidate that passed the MIME gate. Only the controller holds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn size_label(&self) -> String {
        format_mebibytes(self.size_bytes())
    }
}

impl TryFrom<FileCandidate> for SelectedFile {
    type Error = SelectionError;

    fn try_from(candidate: FileCandidate) -> Result<Self, Self::Error> {
        if !candidate.is_pdf() {
            return Err(SelectionError::NotPdf {
                name: candidate.name,
                mime_type: candidate.mime_type,
            });
        }
        Ok(Self {
            name: candidate.name,
            mime_type: candidate.mime_type,
            bytes: candidate.bytes,
        })
    }
}

/// Size in binary megabytes with exactly two decimals, e.g. `1.50 MB`.
/// Halves round up, so 131072 bytes reads `0.13 MB`.
pub fn format_mebibytes(size_bytes: u64) -> String {
    let hundredths = (size_bytes as f64 / BYTES_PER_MIB * 100.0).round();
    format!("{:.2} MB", hundredths / 100.0)
}

/// Frequency threshold forwarded to the processing service. Opaque to the
/// widget apart from its slider range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Sensitivity(f64);

impl Sensitivity {
    pub const MIN: f64 = 0.10;
    pub const MAX: f64 = 1.00;
    pub const STEP: f64 = 0.05;
    pub const DEFAULT: f64 = 0.80;

    /// Clamps into the slider range and rounds to hundredths.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        let clamped = value.clamp(Self::MIN, Self::MAX);
        Self((clamped * 100.0).round() / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Text sent in the `sensitivity` form field.
    pub fn form_value(self) -> String {
        self.0.to_string()
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f64> for Sensitivity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Sensitivity> for f64 {
    fn from(value: Sensitivity) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mebibyte_label_has_two_decimals() {
        assert_eq!(format_mebibytes(0), "0.00 MB");
        assert_eq!(format_mebibytes(1_572_864), "1.50 MB");
        assert_eq!(format_mebibytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_mebibytes(123_456), "0.12 MB");
    }

    #[test]
    fn mebibyte_label_rounds_halves_up() {
        assert_eq!(format_mebibytes(131_072), "0.13 MB");
        assert_eq!(format_mebibytes(655_360), "0.63 MB");
        assert_eq!(format_mebibytes(1_179_648), "1.13 MB");
        assert_eq!(format_mebibytes(3 * 131_072), "0.38 MB");
    }

    #[test]
    fn selected_file_requires_exact_pdf_mime_type() {
        let pdf = FileCandidate::new("a.pdf", PDF_MIME_TYPE, vec![1, 2, 3]);
        let selected = SelectedFile::try_from(pdf).expect("pdf accepted");
        assert_eq!(selected.name(), "a.pdf");
        assert_eq!(selected.size_bytes(), 3);
        assert_eq!(selected.mime_type(), PDF_MIME_TYPE);

        for mime in ["application/PDF", "application/x-pdf", "text/plain", ""] {
            let candidate = FileCandidate::new("a.pdf", mime, vec![1]);
            assert!(matches!(
                SelectedFile::try_from(candidate),
                Err(SelectionError::NotPdf { .. })
            ));
        }
    }

    #[test]
    fn sensitivity_is_clamped_and_rounded() {
        assert_eq!(Sensitivity::new(0.0).value(), Sensitivity::MIN);
        assert_eq!(Sensitivity::new(3.0).value(), Sensitivity::MAX);
        assert_eq!(Sensitivity::new(0.8500000000000001).form_value(), "0.85");
        assert_eq!(Sensitivity::new(f64::NAN), Sensitivity::default());
        assert_eq!(Sensitivity::default().form_value(), "0.8");
        assert_eq!(Sensitivity::new(1.0).form_value(), "1");
    }
}
