use crate::error::{AppError, AppResult};
use crate::models::Response;

const CSV_HEADER: [&str; 11] = [
    "id",
    "first_name",
    "email",
    "question_1",
    "question_2",
    "question_3",
    "question_4",
    "question_5",
    "submitted_at",
    "ip_address",
    "user_agent",
];

/// Serializes the rows into a complete CSV document. Every field is
/// double-quote-enclosed and optional NULL columns render as empty strings.
pub fn responses_to_csv(responses: &[Response]) -> AppResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {e}")))?;

    for response in responses {
        writer
            .write_record([
                response.id.to_string().as_str(),
                &response.first_name,
                &response.email,
                response.question_1.as_deref().unwrap_or(""),
                response.question_2.as_deref().unwrap_or(""),
                response.question_3.as_deref().unwrap_or(""),
                response.question_4.as_deref().unwrap_or(""),
                response.question_5.as_deref().unwrap_or(""),
                &response.submitted_at,
                response.ip_address.as_deref().unwrap_or(""),
                response.user_agent.as_deref().unwrap_or(""),
            ])
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish CSV document: {e}")))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("CSV document is not valid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> Response {
        Response {
            id: 7,
            first_name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            question_1: Some("likes \"quotes\"".to_string()),
            question_2: None,
            question_3: None,
            question_4: None,
            question_5: None,
            submitted_at: "2026-08-24 10:00:00".to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: None,
        }
    }

    #[test]
    fn header_names_all_persisted_columns() {
        let csv = responses_to_csv(&[]).unwrap();
        assert_eq!(
            csv.lines().next().unwrap(),
            "\"id\",\"first_name\",\"email\",\"question_1\",\"question_2\",\"question_3\",\
             \"question_4\",\"question_5\",\"submitted_at\",\"ip_address\",\"user_agent\""
        );
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn fields_are_quoted_and_nulls_render_empty() {
        let csv = responses_to_csv(&[sample_response()]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.starts_with("\"7\",\"Ana\",\"a@x.com\""));
        // Embedded quotes are doubled per CSV quoting rules
        assert!(row.contains("\"likes \"\"quotes\"\"\""));
        // NULL question_2 renders as an empty quoted field
        assert!(row.contains(",\"\",\"\","));
        assert!(row.ends_with(",\"\""));
    }

    #[test]
    fn one_line_per_row() {
        let mut second = sample_response();
        second.id = 8;
        let csv = responses_to_csv(&[sample_response(), second]).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }
}
