//! SARIF (Static Analysis Results Interchange Format) output support.
//!
//! Lets broken-promise findings flow into CI systems that consume SARIF.
//! Only the subset of SARIF 2.1.0 this analysis needs is modeled.
//!
//! Specification: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use serde::{Deserialize, Serialize};

use super::broken_promise::BrokenPromiseConfig;
use super::report::{BrokenPromiseFinding, BrokenPromiseReport};
use crate::error::Result;
use crate::position::SourcePosition;

/// Rule ID used for every broken-promise result.
pub const RULE_ID: &str = "broken-promise";

// =============================================================================
// SARIF Types (v2.1.0)
// =============================================================================

/// The top-level SARIF log object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

impl SarifLog {
    /// Create a new SARIF log with a single run.
    #[must_use]
    pub fn new(run: SarifRun) -> Self {
        Self {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json".to_string(),
            version: "2.1.0".to_string(),
            runs: vec![run],
        }
    }
}

/// A single analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifTool {
    pub driver: SarifToolComponent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifToolComponent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<SarifReportingDescriptor>,
}

/// A rule descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifReportingDescriptor {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<SarifMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<SarifMessage>,
}

/// SARIF severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SarifLevel {
    Error,
    Warning,
    Note,
    None,
}

/// A plain text message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifMessage {
    pub text: String,
}

impl SarifMessage {
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self { text: s.into() }
    }
}

/// A result (finding).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: SarifLevel,
    pub message: SarifMessage,
    /// Where the promise forks
    pub locations: Vec<SarifLocation>,
    /// The dependent promises
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_locations: Vec<SarifLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    pub region: SarifRegion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactLocation {
    pub uri: String,
}

/// A region within a file. SARIF lines and columns are both 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
    pub start_column: u32,
}

// =============================================================================
// Conversion from BrokenPromiseReport to SARIF
// =============================================================================

impl BrokenPromiseReport {
    /// Convert the report to SARIF. All findings are attributed to the single
    /// analyzed artifact `artifact_uri`.
    #[must_use]
    pub fn to_sarif(&self, artifact_uri: &str, config: &BrokenPromiseConfig) -> SarifLog {
        let rule = SarifReportingDescriptor {
            id: RULE_ID.to_string(),
            short_description: Some(SarifMessage::text("Possible broken promise")),
            full_description: Some(SarifMessage::text(
                "A single asynchronous value is the source of more than one \
                 independent continuation.",
            )),
        };

        let results = self
            .findings
            .iter()
            .map(|finding| finding_to_result(finding, artifact_uri))
            .collect();

        SarifLog::new(SarifRun {
            tool: SarifTool {
                driver: SarifToolComponent {
                    name: config.tool_name.clone(),
                    version: Some(env!("CARGO_PKG_VERSION").to_string()),
                    rules: vec![rule],
                },
            },
            results,
        })
    }

    /// Serialize to SARIF JSON string.
    pub fn to_sarif_json(&self, artifact_uri: &str, config: &BrokenPromiseConfig) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_sarif(artifact_uri, config))?)
    }
}

fn location(uri: &str, position: SourcePosition) -> SarifLocation {
    SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation {
                uri: uri.to_string(),
            },
            region: SarifRegion {
                start_line: position.line,
                start_column: position.column + 1,
            },
        },
    }
}

fn finding_to_result(finding: &BrokenPromiseFinding, uri: &str) -> SarifResult {
    SarifResult {
        rule_id: RULE_ID.to_string(),
        level: SarifLevel::Warning,
        // Display ends with a newline; SARIF messages should not.
        message: SarifMessage::text(finding.to_string().trim_end()),
        locations: vec![location(uri, finding.forked_from)],
        related_locations: finding
            .dependents
            .iter()
            .map(|&position| location(uri, position))
            .collect(),
    }
}

// =============================================================================
// Tests
// =============================================================================
