//! Shared domain types: document kinds, creation methods, decisions and the
//! semantic analysis produced upstream of this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Container family of a submitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Image,
    #[serde(other)]
    Unknown,
}

impl FileType {
    /// Guess the file type from a path extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "jpg" | "jpeg" | "png" | "tif" | "tiff" | "webp" | "bmp" | "gif" | "dng" => {
                FileType::Image
            }
            _ => FileType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Image => "image",
            FileType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document type (for PDFs) or image category (for photos).
///
/// Both vocabularies share one closed type because the upstream analysis
/// reports either in the same `document_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    // PDF document types
    OfficialCertificate,
    DamageAct,
    PhotoCollection,
    IdentityDocument,
    PropertyDocument,
    FinancialStatement,
    CourtDecision,
    RegistrationExtract,
    MedicalRecord,
    UtilityBill,
    ApplicationForm,

    // Image categories
    DamagePhoto,
    PropertyExterior,
    PropertyInterior,
    DocumentPhoto,
    IdentityPhoto,
    BeforeAfter,
    Screenshot,

    #[serde(other)]
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::OfficialCertificate => "official_certificate",
            DocumentKind::DamageAct => "damage_act",
            DocumentKind::PhotoCollection => "photo_collection",
            DocumentKind::IdentityDocument => "identity_document",
            DocumentKind::PropertyDocument => "property_document",
            DocumentKind::FinancialStatement => "financial_statement",
            DocumentKind::CourtDecision => "court_decision",
            DocumentKind::RegistrationExtract => "registration_extract",
            DocumentKind::MedicalRecord => "medical_record",
            DocumentKind::UtilityBill => "utility_bill",
            DocumentKind::ApplicationForm => "application_form",
            DocumentKind::DamagePhoto => "damage_photo",
            DocumentKind::PropertyExterior => "property_exterior",
            DocumentKind::PropertyInterior => "property_interior",
            DocumentKind::DocumentPhoto => "document_photo",
            DocumentKind::IdentityPhoto => "identity_photo",
            DocumentKind::BeforeAfter => "before_after",
            DocumentKind::Screenshot => "screenshot",
            DocumentKind::Other => "other",
        }
    }
}

impl Default for DocumentKind {
    fn default() -> Self {
        DocumentKind::Other
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the document was created or captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationMethod {
    Scanned,
    DigitalNative,
    PhotoConverted,
    Screenshot,
    #[serde(other)]
    Unknown,
}

impl CreationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationMethod::Scanned => "scanned",
            CreationMethod::DigitalNative => "digital_native",
            CreationMethod::PhotoConverted => "photo_converted",
            CreationMethod::Screenshot => "screenshot",
            CreationMethod::Unknown => "unknown",
        }
    }
}

impl Default for CreationMethod {
    fn default() -> Self {
        CreationMethod::Unknown
    }
}

impl fmt::Display for CreationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final processing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Accept,
    Review,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "ACCEPT",
            Decision::Review => "REVIEW",
            Decision::Reject => "REJECT",
        }
    }

    /// Only ACCEPT is acceptable.
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic analysis produced by the external classification/extraction stage.
///
/// Immutable input to this crate; only its fields are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Path of the analysed file
    #[serde(default)]
    pub file_path: String,

    /// "pdf" or "image"
    pub file_type: FileType,

    /// Document type (PDF) or image category (photo)
    #[serde(default)]
    pub document_type: DocumentKind,

    /// How the document was produced
    #[serde(default)]
    pub creation_method: CreationMethod,

    /// One-line description from the classifier
    #[serde(default)]
    pub brief_description: String,

    /// Composite confidence (classification × extraction), in [0, 1]
    #[serde(default)]
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_confidence: Option<f64>,

    /// Strong, user-facing fraud/quality signals
    #[serde(default)]
    pub red_flags: Vec<String>,

    /// Weaker observations
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Whether embedded images support the textual claims (None = not assessed)
    #[serde(default)]
    pub images_match_claims: Option<bool>,
}

impl DocumentAnalysis {
    /// Create an analysis with no findings.
    pub fn new(
        file_type: FileType,
        document_type: DocumentKind,
        creation_method: CreationMethod,
        confidence: f64,
    ) -> Self {
        Self {
            file_path: String::new(),
            file_type,
            document_type,
            creation_method,
            brief_description: String::new(),
            confidence: confidence.clamp(0.0, 1.0),
            classification_confidence: None,
            extraction_confidence: None,
            red_flags: Vec::new(),
            warnings: Vec::new(),
            images_match_claims: None,
        }
    }

    /// Build from the two upstream stage confidences; the composite is their product.
    pub fn from_stages(
        file_type: FileType,
        document_type: DocumentKind,
        creation_method: CreationMethod,
        classification_confidence: f64,
        extraction_confidence: Option<f64>,
    ) -> Self {
        let composite = match extraction_confidence {
            Some(extraction) => classification_confidence * extraction,
            None => classification_confidence,
        };
        let mut analysis = Self::new(file_type, document_type, creation_method, composite);
        analysis.classification_confidence = Some(classification_confidence);
        analysis.extraction_confidence = extraction_confidence;
        analysis
    }

    /// Fallback analysis used when the upstream collaborator fails.
    pub fn failed(file_path: impl Into<String>, file_type: FileType, error: impl fmt::Display) -> Self {
        let mut analysis = Self::new(file_type, DocumentKind::Other, CreationMethod::Unknown, 0.0);
        analysis.file_path = file_path.into();
        analysis.brief_description = format!("Analysis error: {}", error);
        analysis.red_flags.push("Analysis failed".to_string());
        analysis
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = path.into();
        self
    }

    pub fn with_red_flag(mut self, flag: impl Into<String>) -> Self {
        self.red_flags.push(flag.into());
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_images_match_claims(mut self, matches: bool) -> Self {
        self.images_match_claims = Some(matches);
        self
    }

    /// True when either the document type or the creation method says screenshot.
    pub fn is_screenshot(&self) -> bool {
        self.document_type == DocumentKind::Screenshot
            || self.creation_method == CreationMethod::Screenshot
    }
}
