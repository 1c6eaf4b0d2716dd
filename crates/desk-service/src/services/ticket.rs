//! Ticket PDF renderer
//!
//! Implements the `TicketRenderer` port with printpdf: an A4 page with a
//! title, the itinerary, and the traveler details as label/value rows.

use async_trait::async_trait;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;
use tracing::instrument;

use desk_core::entities::TicketDetails;
use desk_core::error::DomainError;
use desk_core::traits::TicketRenderer;

/// printpdf-backed ticket renderer
#[derive(Debug, Clone, Default)]
pub struct PdfTicketRenderer;

impl PdfTicketRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render(details: &TicketDetails) -> Result<Vec<u8>, DomainError> {
        // A4 portrait
        let (doc, page, layer) = PdfDocument::new(
            format!("Travel Request #{}", details.request_id),
            Mm(210.0),
            Mm(297.0),
            "Layer 1",
        );
        let current = doc.get_page(page).get_layer(layer);

        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DomainError::RenderError(e.to_string()))?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DomainError::RenderError(e.to_string()))?;

        current.use_text(
            "Travel Request Confirmation",
            18.0,
            Mm(55.0),
            Mm(270.0),
            &bold,
        );

        let from_date = details.from_date.format("%Y-%m-%d").to_string();
        let to_date = details.to_date.format("%Y-%m-%d").to_string();
        let rows: [(&str, &str); 9] = [
            ("From Date:", &from_date),
            ("To Date:", &to_date),
            ("From Location:", &details.from_location),
            ("To Location:", &details.to_location),
            ("Reason:", &details.reason_for_travel),
            ("Name:", &details.traveler_name),
            ("Email:", &details.traveler_email),
            ("Project:", &details.project_name),
            ("Department:", &details.department_name),
        ];

        let mut y = 245.0;
        for (label, value) in rows {
            current.use_text(label, 12.0, Mm(20.0), Mm(y), &bold);
            current.use_text(value, 12.0, Mm(75.0), Mm(y), &regular);
            y -= 10.0;
        }

        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            doc.save(&mut writer)
                .map_err(|e| DomainError::RenderError(e.to_string()))?;
        }
        Ok(bytes)
    }
}

#[async_trait]
impl TicketRenderer for PdfTicketRenderer {
    #[instrument(skip(self, details), fields(request_id = details.request_id))]
    async fn render_ticket(&self, details: &TicketDetails) -> Result<Vec<u8>, DomainError> {
        Self::render(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn details() -> TicketDetails {
        TicketDetails {
            request_id: 42,
            traveler_name: "Asha Verma".to_string(),
            traveler_email: "asha@corp.example".to_string(),
            project_name: "Apollo".to_string(),
            department_name: "Engineering".to_string(),
            from_location: "Pune".to_string(),
            to_location: "Berlin".to_string(),
            from_date: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            to_date: Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap(),
            reason_for_travel: "Client onboarding".to_string(),
            download_url: "http://localhost:8080/api/v1/travel-requests/42/ticket".to_string(),
        }
    }

    #[tokio::test]
    async fn test_render_produces_pdf_bytes() {
        let renderer = PdfTicketRenderer::new();
        let bytes = renderer.render_ticket(&details()).await.unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }
}
