//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers this tool passes around: the
//! business identifier a report is filtered by, and the Power BI
//! workspace, report, and export job identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker character on an identifier-file line that flags the entry as
/// a concern entity. Stripped from the identifier before use.
pub const CONCERN_MARKER: char = 'k';

/// Business identifier newtype wrapper
///
/// The value a report export is filtered by. Carried verbatim from the
/// identifier file (minus the concern marker) into the report filter
/// and the output file name.
///
/// # Examples
///
/// ```
/// use report_exporter::domain::ids::BusinessId;
/// use std::str::FromStr;
///
/// let id = BusinessId::from_str("1234567-8").unwrap();
/// assert_eq!(id.as_str(), "1234567-8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessId(String);

impl BusinessId {
    /// Creates a new BusinessId from a string
    ///
    /// # Arguments
    ///
    /// * `id` - The business identifier string
    ///
    /// # Returns
    ///
    /// Returns `Ok(BusinessId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Business ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the business ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BusinessId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for BusinessId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A business identifier together with its concern flag
///
/// One entry of the identifier file. A trailing [`CONCERN_MARKER`] on
/// the line sets `concern` and is stripped from the identifier; the
/// flag is carried through the export for reporting but does not change
/// how the report is requested.
///
/// # Examples
///
/// ```
/// use report_exporter::domain::ids::BusinessIdentifier;
///
/// let entry = BusinessIdentifier::parse("321k").unwrap();
/// assert_eq!(entry.id.as_str(), "321");
/// assert!(entry.concern);
///
/// let entry = BusinessIdentifier::parse("123").unwrap();
/// assert_eq!(entry.id.as_str(), "123");
/// assert!(!entry.concern);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessIdentifier {
    /// The identifier with the marker stripped
    pub id: BusinessId,

    /// Whether the source line carried the concern marker
    pub concern: bool,
}

impl BusinessIdentifier {
    /// Parses one identifier-file line (already trimmed)
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, or empty once the
    /// concern marker is stripped.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        let (value, concern) = match raw.strip_suffix(CONCERN_MARKER) {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };
        let id = BusinessId::new(value)
            .map_err(|e| format!("invalid identifier '{raw}': {e}"))?;
        Ok(Self { id, concern })
    }
}

impl fmt::Display for BusinessIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Power BI workspace (group) identifier newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Creates a new WorkspaceId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Workspace ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the workspace ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkspaceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for WorkspaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Power BI report identifier newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(String);

impl ReportId {
    /// Creates a new ReportId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Report ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the report ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ReportId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Export job identifier newtype wrapper
///
/// Returned by the service when an export is accepted; used to poll the
/// job and fetch the produced file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportId(String);

impl ExportId {
    /// Creates a new ExportId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Export ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the export ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ExportId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
