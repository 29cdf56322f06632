use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One domain record from the CertCentral inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub dcv_method: Option<String>,
    /// Absent for domains that have never been validated.
    #[serde(default)]
    pub dcv_expiration: Option<DcvExpiration>,
}

/// OV/EV DCV expiration dates, `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DcvExpiration {
    pub ov: NaiveDate,
    pub ev: NaiveDate,
}

impl DcvExpiration {
    /// The date the domain's validation effectively lapses.
    pub fn earliest(&self) -> NaiveDate {
        self.ov.min(self.ev)
    }
}

/// Response wrapper for `GET /domain`.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainListResponse {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
    #[serde(default)]
    pub page: Option<PageInfo>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageInfo {
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

impl PageInfo {
    /// Offset of the next page, if the inventory extends past this one.
    pub fn next_offset(&self) -> Option<u32> {
        let consumed = self.offset + self.limit;
        (consumed < self.total).then_some(consumed)
    }
}

/// CNAME token pair issued when a domain is submitted for validation.
#[derive(Debug, Clone, Deserialize)]
pub struct DcvToken {
    pub token: String,
    pub verification_value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DcvTokenResponse {
    #[serde(default)]
    pub dcv_token: Option<DcvToken>,
}

/// One entry of the `validations` array on a domain.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationEntry {
    #[serde(rename = "type")]
    pub validation_type: String,
    pub status: String,
    #[serde(default)]
    pub dcv_status: Option<String>,
}

/// Response for `GET /domain/{id}/validation` and the validation portion of
/// `GET /domain/{id}?include_dcv=true`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub validations: Vec<ValidationEntry>,
    #[serde(default)]
    pub dcv_expiration: Option<DcvExpiration>,
}

impl ValidationDetails {
    fn entry(&self, validation_type: &str) -> Option<&ValidationEntry> {
        self.validations
            .iter()
            .find(|v| v.validation_type.eq_ignore_ascii_case(validation_type))
    }

    /// Both OV and EV validations are active with their DCV complete.
    pub fn dcv_complete(&self) -> bool {
        ["ov", "ev"].into_iter().all(|t| {
            self.entry(t).is_some_and(|v| {
                v.status.eq_ignore_ascii_case("active")
                    && v.dcv_status
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case("complete"))
            })
        })
    }

    /// A terminal CA-side rejection, if any validation reports one.
    pub fn rejection(&self) -> Option<String> {
        self.validations.iter().find_map(|v| {
            let dcv = v.dcv_status.as_deref().unwrap_or_default();
            (v.status.eq_ignore_ascii_case("rejected")
                || dcv.eq_ignore_ascii_case("rejected")
                || dcv.eq_ignore_ascii_case("failed"))
            .then(|| format!("{} validation {}", v.validation_type, v.status))
        })
    }

    /// Status summary in `ov/ev` form, for display.
    pub fn status_summary(&self) -> String {
        let status = |t| {
            self.entry(t)
                .map(|v| v.status.as_str())
                .unwrap_or("unknown")
                .to_string()
        };
        format!("{}/{}", status("ov"), status("ev"))
    }
}

/// Request body for the bulk validation-status endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct BatchStatusRequest<'a> {
    pub domains: &'a [String],
}

/// Per-domain entry of the bulk validation-status response.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchStatusEntry {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub dcv_status: Option<String>,
}

impl BatchStatusEntry {
    /// The validation order is fully valid; no re-validation needed.
    pub fn is_valid(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
            && self
                .dcv_status
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("complete"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BatchStatusResponse {
    #[serde(default)]
    pub domains: Vec<BatchStatusEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earliest_expiration_picks_lower_date() {
        let exp: DcvExpiration =
            serde_json::from_str(r#"{"ov": "2026-10-01", "ev": "2026-09-15"}"#).unwrap();
        assert_eq!(exp.earliest(), NaiveDate::from_ymd_opt(2026, 9, 15).unwrap());
    }

    #[test]
    fn next_offset_stops_at_total() {
        let page = PageInfo {
            total: 85,
            limit: 50,
            offset: 50,
        };
        assert_eq!(page.next_offset(), None);

        let first = PageInfo {
            total: 85,
            limit: 50,
            offset: 0,
        };
        assert_eq!(first.next_offset(), Some(50));
    }

    #[test]
    fn dcv_complete_requires_both_validations() {
        let details: ValidationDetails = serde_json::from_str(
            r#"{"validations": [
                {"type": "ov", "status": "active", "dcv_status": "complete"},
                {"type": "ev", "status": "pending", "dcv_status": "pending"}
            ]}"#,
        )
        .unwrap();
        assert!(!details.dcv_complete());
        assert_eq!(details.status_summary(), "active/pending");

        let done: ValidationDetails = serde_json::from_str(
            r#"{"validations": [
                {"type": "ov", "status": "active", "dcv_status": "complete"},
                {"type": "ev", "status": "active", "dcv_status": "complete"}
            ]}"#,
        )
        .unwrap();
        assert!(done.dcv_complete());
    }

    #[test]
    fn rejection_reported_from_dcv_status() {
        let details: ValidationDetails = serde_json::from_str(
            r#"{"validations": [
                {"type": "ov", "status": "pending", "dcv_status": "failed"}
            ]}"#,
        )
        .unwrap();
        assert!(details.rejection().is_some());
    }
}
