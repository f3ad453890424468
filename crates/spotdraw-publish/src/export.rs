//! Document export: downloadable artifacts derived from a finalized
//! session.
//!
//! Purely derived, no state: the same session always exports to the same
//! document. The JSON artifact is the machine-readable report; the CSV
//! artifact is the spreadsheet handed to the building administration.

use serde::{Deserialize, Serialize};
use spotdraw_types::{
    LotterySession, ParkingSpot, Participant, Result, SessionState, SpotdrawError,
};

/// Supported artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

/// A downloadable artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One row of the human-readable report.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReportRow {
    rank: u32,
    unit: String,
    name: String,
    spots: Vec<String>,
    assigned: bool,
}

/// The machine-readable report shape (JSON artifact).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Report {
    building: String,
    session: String,
    mode: String,
    seed: Option<u64>,
    result_root: String,
    rows: Vec<ReportRow>,
}

/// Export a finalized session as a downloadable document.
///
/// # Errors
/// - [`SpotdrawError::WrongSessionState`] unless the session is completed.
/// - [`SpotdrawError::ParticipantNotFound`] / [`SpotdrawError::SpotNotFound`]
///   when the session references entities missing from the supplied lists.
pub fn export_document(
    session: &LotterySession,
    participants: &[Participant],
    spots: &[ParkingSpot],
    format: ExportFormat,
) -> Result<ExportedDocument> {
    if session.state != SessionState::Completed {
        return Err(SpotdrawError::WrongSessionState {
            expected: SessionState::Completed,
            actual: session.state,
        });
    }

    let rows = build_rows(session, participants, spots)?;
    let file_name = format!(
        "lottery-{}-{}.{}",
        session.building.as_str(),
        session.id.0,
        format.extension()
    );

    let bytes = match format {
        ExportFormat::Json => {
            let report = Report {
                building: session.building.as_str().to_string(),
                session: session.id.to_string(),
                mode: session.mode.to_string(),
                seed: session.seed,
                result_root: hex::encode(session.result_root),
                rows,
            };
            serde_json::to_vec_pretty(&report)?
        }
        ExportFormat::Csv => render_csv(&rows).into_bytes(),
    };

    Ok(ExportedDocument {
        file_name,
        mime_type: format.mime_type(),
        bytes,
    })
}

fn build_rows(
    session: &LotterySession,
    participants: &[Participant],
    spots: &[ParkingSpot],
) -> Result<Vec<ReportRow>> {
    let mut rows = Vec::with_capacity(session.results.len());
    for result in &session.results {
        let participant = participants
            .iter()
            .find(|p| p.id == result.participant)
            .ok_or(SpotdrawError::ParticipantNotFound(result.participant))?;

        let mut codes = Vec::with_capacity(result.spots.len());
        for spot_id in &result.spots {
            let spot = spots
                .iter()
                .find(|s| s.id == *spot_id)
                .ok_or(SpotdrawError::SpotNotFound(*spot_id))?;
            codes.push(spot.code.clone());
        }

        rows.push(ReportRow {
            rank: result.rank,
            unit: participant.unit.clone(),
            name: participant.name.clone(),
            spots: codes,
            assigned: result.is_assigned(),
        });
    }
    Ok(rows)
}

fn render_csv(rows: &[ReportRow]) -> String {
    let mut out = String::from("rank,unit,name,spots,status\n");
    for row in rows {
        let status = if row.assigned { "ASSIGNED" } else { "UNASSIGNED" };
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            row.rank + 1,
            csv_field(&row.unit),
            csv_field(&row.name),
            csv_field(&row.spots.join(" ")),
            status
        ));
    }
    out
}

/// Quote a CSV field when it contains separators or quotes.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
