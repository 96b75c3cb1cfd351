//! Credential file loading
//!
//! The service principal and report coordinates live in a flat file of
//! `name,value` lines (one pair per line, comma-separated). The `bearer`
//! entry carries a third field, the token's expiry timestamp, so a token
//! obtained by an earlier run can be reused while it is still valid.
//!
//! The file is only ever read. A token refreshed during a run is cached
//! in memory and not written back.

use crate::config::secret::{secret_string, SecretString};
use crate::domain::errors::ExporterError;
use crate::domain::ids::{ReportId, WorkspaceId};
use crate::domain::result::Result;
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Expiry timestamp format of the `bearer` entry, a naive local time
/// with optional fractional seconds (`2024-05-02 15:33:12.123456`).
const BEARER_EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A bearer token read from the credential file, with its expiry
/// converted to UTC.
#[derive(Debug, Clone)]
pub struct StoredBearer {
    /// The raw token value
    pub token: String,

    /// When the token stops being valid
    pub expires_at: DateTime<Utc>,
}

/// The parsed credential file
///
/// All fields except `bearer` are required; loading fails listing every
/// missing entry at once. The field names follow the keys recognized in
/// the file: `client_id`, `client_secret`, `tenant_id`, `group_id_dev`
/// (workspace), `report_id_pdf_dev` (report), `bearer`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Application (client) id of the service principal
    pub client_id: String,

    /// Client secret, zeroized on drop
    pub client_secret: SecretString,

    /// Directory (tenant) id the token is requested from
    pub tenant_id: String,

    /// Workspace the report lives in
    pub workspace_id: WorkspaceId,

    /// Report to export
    pub report_id: ReportId,

    /// Token left behind by an earlier run, if the file has one
    pub bearer: Option<StoredBearer>,
}

/// Loads and parses the credential file
///
/// # Errors
///
/// Returns `ExporterError::Configuration` if the file is missing, a line
/// is not a `name,value` pair, or a required entry is absent. A `bearer`
/// entry with a missing or unparseable expiry is not an error: the
/// cached token is ignored with a warning, since a stale line must not
/// block a run that can just request a fresh token.
pub fn load_credentials(path: impl AsRef<Path>) -> Result<CredentialStore> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read credential file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut client_id = None;
    let mut client_secret = None;
    let mut tenant_id = None;
    let mut workspace_id = None;
    let mut report_id = None;
    let mut bearer = None;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(',');
        let key = fields.next().unwrap_or_default().trim();
        let value = match fields.next() {
            Some(value) => value.trim(),
            None => {
                return Err(ExporterError::Configuration(format!(
                    "Credential file {}: line {} is not a 'name,value' pair",
                    path.display(),
                    line_no
                )));
            }
        };

        if value.is_empty() {
            warn!(key, line = line_no, "credential entry has an empty value, ignoring");
            continue;
        }

        match key {
            "client_id" => client_id = Some(value.to_string()),
            "client_secret" => client_secret = Some(secret_string(value.to_string())),
            "tenant_id" => tenant_id = Some(value.to_string()),
            "group_id_dev" => match WorkspaceId::new(value) {
                Ok(id) => workspace_id = Some(id),
                Err(e) => {
                    return Err(ExporterError::Configuration(format!(
                        "Credential file {}: line {}: {}",
                        path.display(),
                        line_no,
                        e
                    )));
                }
            },
            "report_id_pdf_dev" => match ReportId::new(value) {
                Ok(id) => report_id = Some(id),
                Err(e) => {
                    return Err(ExporterError::Configuration(format!(
                        "Credential file {}: line {}: {}",
                        path.display(),
                        line_no,
                        e
                    )));
                }
            },
            "bearer" => bearer = parse_bearer(value, fields.next(), line_no),
            other => {
                debug!(key = other, line = line_no, "ignoring unrecognized credential entry");
            }
        }
    }

    let mut missing = Vec::new();
    if client_id.is_none() {
        missing.push("client_id");
    }
    if client_secret.is_none() {
        missing.push("client_secret");
    }
    if tenant_id.is_none() {
        missing.push("tenant_id");
    }
    if workspace_id.is_none() {
        missing.push("group_id_dev");
    }
    if report_id.is_none() {
        missing.push("report_id_pdf_dev");
    }
    if !missing.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Credential file {} is missing required entries: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let (Some(client_id), Some(client_secret), Some(tenant_id), Some(workspace_id), Some(report_id)) =
        (client_id, client_secret, tenant_id, workspace_id, report_id)
    else {
        // Guarded by the missing-entry check above.
        return Err(ExporterError::Configuration(format!(
            "Credential file {} is missing required entries",
            path.display()
        )));
    };

    Ok(CredentialStore {
        client_id,
        client_secret,
        tenant_id,
        workspace_id,
        report_id,
        bearer,
    })
}

/// Interprets the extra fields of a `bearer` line.
///
/// The expiry is a naive timestamp written in the producer's local time;
/// it is interpreted in the local timezone and converted to UTC.
fn parse_bearer(token: &str, expiry_field: Option<&str>, line_no: usize) -> Option<StoredBearer> {
    let expiry_raw = match expiry_field {
        Some(raw) => raw.trim(),
        None => {
            warn!(line = line_no, "bearer entry has no expiry field, ignoring cached token");
            return None;
        }
    };

    let naive = match NaiveDateTime::parse_from_str(expiry_raw, BEARER_EXPIRY_FORMAT) {
        Ok(naive) => naive,
        Err(e) => {
            warn!(
                line = line_no,
                expiry = expiry_raw,
                error = %e,
                "bearer entry has an unparseable expiry, ignoring cached token"
            );
            return None;
        }
    };

    match Local.from_local_datetime(&naive) {
        LocalResult::Single(local) => Some(StoredBearer {
            token: token.to_string(),
            expires_at: local.with_timezone(&Utc),
        }),
        _ => {
            warn!(
                line = line_no,
                expiry = expiry_raw,
                "bearer expiry falls in a DST gap, ignoring cached token"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    const FULL_FILE: &str = "\
client_id,11111111-aaaa-bbbb-cccc-222222222222
client_secret,s3cr3t-value
tenant_id,33333333-dddd-eeee-ffff-444444444444
group_id_dev,55555555-aaaa-bbbb-cccc-666666666666
report_id_pdf_dev,77777777-aaaa-bbbb-cccc-888888888888
bearer,eyJ0eXAiOiJKV1Qi,2099-05-02 15:33:12.123456
";

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_file() {
        let file = write_file(FULL_FILE);
        let store = load_credentials(file.path()).unwrap();

        assert_eq!(store.client_id, "11111111-aaaa-bbbb-cccc-222222222222");
        assert_eq!(store.client_secret.expose_secret(), "s3cr3t-value");
        assert_eq!(store.tenant_id, "33333333-dddd-eeee-ffff-444444444444");
        assert_eq!(
            store.workspace_id.as_str(),
            "55555555-aaaa-bbbb-cccc-666666666666"
        );
        assert_eq!(
            store.report_id.as_str(),
            "77777777-aaaa-bbbb-cccc-888888888888"
        );

        let bearer = store.bearer.unwrap();
        assert_eq!(bearer.token, "eyJ0eXAiOiJKV1Qi");

        let naive =
            NaiveDateTime::parse_from_str("2099-05-02 15:33:12.123456", BEARER_EXPIRY_FORMAT)
                .unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(bearer.expires_at, expected);
    }

    #[test]
    fn test_expiry_without_fraction_parses() {
        let contents = FULL_FILE.replace("2099-05-02 15:33:12.123456", "2099-05-02 15:33:12");
        let file = write_file(&contents);
        let store = load_credentials(file.path()).unwrap();
        assert!(store.bearer.is_some());
    }

    #[test]
    fn test_missing_file() {
        let result = load_credentials("does-not-exist.txt");
        assert!(matches!(result, Err(ExporterError::Configuration(_))));
    }

    #[test_case("client_id")]
    #[test_case("client_secret")]
    #[test_case("tenant_id")]
    #[test_case("group_id_dev")]
    #[test_case("report_id_pdf_dev")]
    fn test_missing_required_entry_is_named(key: &str) {
        let contents: String = FULL_FILE
            .lines()
            .filter(|line| !line.starts_with(key))
            .map(|line| format!("{line}\n"))
            .collect();
        let file = write_file(&contents);

        let err = load_credentials(file.path()).unwrap_err();
        assert!(err.to_string().contains(key), "error was: {err}");
    }

    #[test]
    fn test_line_without_comma_names_line_number() {
        let contents = FULL_FILE.replace(
            "tenant_id,33333333-dddd-eeee-ffff-444444444444",
            "tenant_id 33333333",
        );
        let file = write_file(&contents);

        let err = load_credentials(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "error was: {err}");
    }

    #[test]
    fn test_bearer_without_expiry_is_ignored() {
        let contents = FULL_FILE.replace(
            "bearer,eyJ0eXAiOiJKV1Qi,2099-05-02 15:33:12.123456",
            "bearer,eyJ0eXAiOiJKV1Qi",
        );
        let file = write_file(&contents);

        let store = load_credentials(file.path()).unwrap();
        assert!(store.bearer.is_none());
    }

    #[test]
    fn test_bearer_with_bad_expiry_is_ignored() {
        let contents = FULL_FILE.replace("2099-05-02 15:33:12.123456", "next tuesday");
        let file = write_file(&contents);

        let store = load_credentials(file.path()).unwrap();
        assert!(store.bearer.is_none());
    }

    #[test]
    fn test_unknown_keys_and_blank_lines_ignored() {
        let contents = format!("{FULL_FILE}\nsome_future_key,whatever\n\n");
        let file = write_file(&contents);

        let store = load_credentials(file.path()).unwrap();
        assert_eq!(store.client_id, "11111111-aaaa-bbbb-cccc-222222222222");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let contents = FULL_FILE.replace(
            "tenant_id,33333333-dddd-eeee-ffff-444444444444",
            "tenant_id,",
        );
        let file = write_file(&contents);

        let err = load_credentials(file.path()).unwrap_err();
        assert!(err.to_string().contains("tenant_id"), "error was: {err}");
    }
}
