use serde::Serialize;

use crate::flow::ReportStamp;
use crate::model::Record;

const UNKNOWN: &str = "UNKNOWN";
const STATUS_COMPLETED: &str = "completed";

/// Summary row handed to the persistence layer alongside the PDF.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub report_id: String,
    pub registration_number: String,
    pub owner_name: String,
    pub inspector_name: String,
    /// RFC 3339.
    pub created_at: String,
    pub page_count: usize,
    pub status: String,
}

impl ReportMetadata {
    pub fn new(record: &Record, stamp: &ReportStamp, page_count: usize) -> Self {
        let identity = |name: &str| record.field(name).unwrap_or(UNKNOWN).to_string();
        Self {
            report_id: stamp.report_id.clone(),
            registration_number: identity("registrationNumber"),
            owner_name: identity("ownerName"),
            inspector_name: identity("inspectorName"),
            created_at: stamp.generated_at.to_rfc3339(),
            page_count,
            status: STATUS_COMPLETED.to_string(),
        }
    }

    /// Storage key for the rendered PDF.
    pub fn artifact_key(&self) -> String {
        format!("reports/{}.pdf", self.report_id)
    }
}

#[derive(Clone, Debug)]
pub struct Report {
    pub pdf: Vec<u8>,
    pub metadata: ReportMetadata,
}
