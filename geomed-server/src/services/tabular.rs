//! Tabular upload and export handling
//!
//! The batch endpoint accepts a CSV request body. Required-column validation
//! happens here, before the batch runner sees a single row, so a malformed
//! sheet is rejected as a whole rather than row by row. Export renders
//! persisted records back to CSV with human-readable headers.

use geomed_common::{Error, Result};

use crate::models::{BatchRow, PredictionRecord};

/// Columns a batch upload must carry. Extra columns are ignored.
const REQUIRED_COLUMNS: &[&str] = &[
    "Firstname",
    "Lastname",
    "Email ID",
    "Hospital Affiliation",
    "PubMed Article Title",
];

/// Export column headers, one row per persisted record.
const EXPORT_HEADERS: &[&str] = &[
    "Name",
    "Email",
    "Hospital Affiliation",
    "PubMed Topic",
    "Predicted Country",
    "Confidence Score (%)",
    "Is Medical Doctor",
    "Specialty",
    "Public Profile URL",
    "Reasoning",
    "Data Sources",
    "Date",
];

/// Parse an uploaded CSV body into batch rows, validating the header first.
pub fn read_batch_rows(data: &[u8]) -> Result<Vec<BatchRow>> {
    let mut reader = csv::Reader::from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| Error::InvalidInput(format!("Unreadable CSV header: {}", e)))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();

    if !missing.is_empty() {
        return Err(Error::InvalidInput(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<BatchRow>().enumerate() {
        let row = result.map_err(|e| {
            Error::InvalidInput(format!("Unreadable CSV row {}: {}", index + 2, e))
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Render persisted records as a downloadable CSV document.
pub fn render_history_csv(records: &[PredictionRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| Error::Internal(format!("CSV write failed: {}", e)))?;

    for record in records {
        let confidence = record.confidence_score.to_string();
        let is_doctor = if record.is_doctor { "Yes" } else { "No" };
        let specialty = record.specialty.as_deref().unwrap_or("Not specified");
        let profile_url = record
            .public_profile_url
            .as_deref()
            .unwrap_or("Not available");
        let sources = record.sources.join(", ");
        let date = record.timestamp.to_rfc3339();

        writer
            .write_record([
                record.name.as_str(),
                record.email.as_str(),
                record.hospital.as_str(),
                record.pubmed_topic.as_str(),
                record.predicted_country.as_str(),
                confidence.as_str(),
                is_doctor,
                specialty,
                profile_url,
                record.reasoning.as_str(),
                sources.as_str(),
                date.as_str(),
            ])
            .map_err(|e| Error::Internal(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV flush failed: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| Error::Internal(format!("CSV encoding failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PredictedAttributes, SubjectQuery};

    const VALID_CSV: &str = "\
Firstname,Lastname,Email ID,Hospital Affiliation,PubMed Article Title
Jane,Smith,j.smith@nhs.uk,Royal Infirmary,cardiac imaging
John,Doe,jdoe@mayo.edu,Mayo Clinic,oncology outcomes
";

    #[test]
    fn test_read_rows_from_valid_csv() {
        let rows = read_batch_rows(VALID_CSV.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].firstname, "Jane");
        assert_eq!(rows[0].email, "j.smith@nhs.uk");
        assert_eq!(rows[1].hospital, "Mayo Clinic");
        assert_eq!(rows[1].pubmed_topic, "oncology outcomes");
    }

    #[test]
    fn test_missing_columns_rejected_with_names() {
        let csv = "Firstname,Email ID\nJane,j@x.org\n";
        let err = read_batch_rows(csv.as_bytes()).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Missing required columns"));
        assert!(message.contains("Lastname"));
        assert!(message.contains("Hospital Affiliation"));
        assert!(message.contains("PubMed Article Title"));
        assert!(!message.contains("Email ID"));
    }

    #[test]
    fn test_empty_cells_are_preserved_for_row_validation() {
        let csv = "\
Firstname,Lastname,Email ID,Hospital Affiliation,PubMed Article Title
Jane,Smith,j.smith@nhs.uk,,cardiac imaging
";
        let rows = read_batch_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].hospital, "");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv = "\
Firstname,Lastname,Email ID,Hospital Affiliation,PubMed Article Title,Notes
Jane,Smith,j.smith@nhs.uk,Royal Infirmary,cardiac imaging,internal
";
        let rows = read_batch_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].firstname, "Jane");
    }

    fn record() -> PredictionRecord {
        let query = SubjectQuery {
            name: "Jane Smith".to_string(),
            email: "j.smith@nhs.uk".to_string(),
            hospital: "Royal Infirmary".to_string(),
            pubmed_topic: "cardiac imaging".to_string(),
        };
        let attributes = PredictedAttributes {
            country: "Scotland".to_string(),
            city: Some("Edinburgh".to_string()),
            confidence: 85.0,
            reasoning: "Hospital is in Edinburgh.".to_string(),
            is_doctor: true,
            specialty: None,
            profile_url: None,
        };
        PredictionRecord::new(
            &query,
            attributes,
            vec!["AI Analysis".to_string(), "Hospital Name Analysis".to_string()],
        )
    }

    #[test]
    fn test_render_history_headers_and_fallbacks() {
        let output = render_history_csv(&[record()]).unwrap();
        let mut lines = output.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Name,Email,Hospital Affiliation"));
        assert!(header.contains("Confidence Score (%)"));

        let row = lines.next().unwrap();
        assert!(row.contains("Jane Smith"));
        assert!(row.contains("Scotland"));
        assert!(row.contains("Yes"));
        assert!(row.contains("Not specified"));
        assert!(row.contains("Not available"));
        assert!(row.contains("AI Analysis, Hospital Name Analysis"));
    }
}
