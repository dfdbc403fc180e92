//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the analysis client, the session and the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The technique domain being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisCategory {
    Batting,
    Bowling,
}

impl AnalysisCategory {
    pub const ALL: [AnalysisCategory; 2] = [AnalysisCategory::Batting, AnalysisCategory::Bowling];

    /// Wire name sent to the backend (`"batting"` / `"bowling"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisCategory::Batting => "batting",
            AnalysisCategory::Bowling => "bowling",
        }
    }

    /// Capitalized label for headings
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisCategory::Batting => "Batting",
            AnalysisCategory::Bowling => "Bowling",
        }
    }

    /// Heading shown above the analysis screen
    pub fn screen_title(&self) -> String {
        format!("{} Analysis", self.label())
    }
}

impl fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured technical remark with a positive/negative polarity flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyObservation {
    pub area: String,
    pub feedback: String,
    pub is_positive: bool,
}

/// One actionable drill recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementTip {
    pub title: String,
    pub description: String,
}

/// Structured output of one analysis pass.
///
/// Both sequences are required on the wire (an absent list or a `null`
/// string is a schema mismatch), but either may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_summary: String,
    pub key_observations: Vec<KeyObservation>,
    pub improvement_tips: Vec<ImprovementTip>,
}

impl AnalysisResult {
    /// Parse a JSON document into a result, enforcing the required shape
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of observations flagged as strengths
    pub fn strengths(&self) -> usize {
        self.key_observations.iter().filter(|o| o.is_positive).count()
    }
}

/// Video extensions and the MIME type each one declares
pub const VIDEO_MIME_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("ogv", "video/ogg"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("ts", "video/mp2t"),
];

/// Fallback for files whose extension declares nothing useful
const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// A user-supplied file, as picked in the file dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAsset {
    /// Full path to the file on disk
    pub path: PathBuf,
    /// Filename only (e.g., "swing.mp4")
    pub file_name: String,
    /// MIME type declared by the file's extension
    pub mime_type: String,
}

impl VideoAsset {
    /// Describe a picked file; the MIME type comes from its extension
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mime_type = declared_mime_type(&path).to_string();

        Self { path, file_name, mime_type }
    }

    /// True when the declared MIME type is in the `video/` family
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// Look up the MIME type a path declares through its extension
pub fn declared_mime_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension() else {
        return UNKNOWN_MIME_TYPE;
    };
    let ext = ext.to_string_lossy().to_lowercase();

    VIDEO_MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        assert_eq!(serde_json::to_string(&AnalysisCategory::Batting).unwrap(), "\"batting\"");
        assert_eq!(AnalysisCategory::Bowling.as_str(), "bowling");
        assert_eq!(AnalysisCategory::Bowling.screen_title(), "Bowling Analysis");
    }

    #[test]
    fn test_result_parses_camel_case_body() {
        let json = r#"{
            "overallSummary": "Good follow-through",
            "keyObservations": [
                {"area": "Arm Position", "feedback": "Elbow is too low at release", "isPositive": false}
            ],
            "improvementTips": [
                {"title": "Wall Drill", "description": "Practice arm rotation against a wall"}
            ]
        }"#;

        let result = AnalysisResult::from_json(json).unwrap();
        assert_eq!(result.overall_summary, "Good follow-through");
        assert_eq!(result.key_observations.len(), 1);
        assert!(!result.key_observations[0].is_positive);
        assert_eq!(result.improvement_tips[0].title, "Wall Drill");
        assert_eq!(result.strengths(), 0);
    }

    #[test]
    fn test_result_accepts_empty_sequences() {
        let json = r#"{"overallSummary": "", "keyObservations": [], "improvementTips": []}"#;
        let result = AnalysisResult::from_json(json).unwrap();
        assert!(result.key_observations.is_empty());
        assert!(result.improvement_tips.is_empty());
    }

    #[test]
    fn test_result_rejects_missing_sequence() {
        let json = r#"{"overallSummary": "ok", "keyObservations": []}"#;
        assert!(AnalysisResult::from_json(json).is_err());
    }

    #[test]
    fn test_result_rejects_null_strings() {
        let json = r#"{
            "overallSummary": "ok",
            "keyObservations": [{"area": null, "feedback": "x", "isPositive": true}],
            "improvementTips": []
        }"#;
        assert!(AnalysisResult::from_json(json).is_err());
    }

    #[test]
    fn test_declared_mime_types() {
        assert_eq!(VideoAsset::from_path("/clips/swing.mp4").mime_type, "video/mp4");
        assert_eq!(VideoAsset::from_path("/clips/NETS.MOV").mime_type, "video/quicktime");
        assert_eq!(VideoAsset::from_path("/clips/notes.txt").mime_type, UNKNOWN_MIME_TYPE);
        assert_eq!(VideoAsset::from_path("/clips/README").mime_type, UNKNOWN_MIME_TYPE);
    }

    #[test]
    fn test_is_video() {
        let asset = VideoAsset::from_path("/clips/swing.mp4");
        assert!(asset.is_video());
        assert_eq!(asset.file_name, "swing.mp4");
        assert!(!VideoAsset::from_path("/clips/photo.jpg").is_video());
    }
}
