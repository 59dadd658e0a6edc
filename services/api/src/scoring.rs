use crate::infra::load_records;
use clap::{Args, ValueEnum};
use kapital_admin::businesses::{BusinessRecord, CompletionReport, CompletionScorer};
use kapital_admin::error::AppError;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding one business record or an array of records
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Csv,
}

/// Flat per-business line used by both output formats.
#[derive(Debug, Serialize)]
pub(crate) struct ScoreRow {
    pub(crate) business_id: Option<String>,
    pub(crate) business_name: Option<String>,
    pub(crate) requirement_set: &'static str,
    pub(crate) profile_percent: u8,
    pub(crate) document_percent: u8,
    pub(crate) completion_percentage: u8,
    pub(crate) is_verification_pending: bool,
}

impl ScoreRow {
    pub(crate) fn new(business: &BusinessRecord, report: &CompletionReport) -> Self {
        Self {
            business_id: business.id.as_ref().map(|id| id.0.clone()),
            business_name: business.business_name().map(str::to_string),
            requirement_set: report.requirement_set.label(),
            profile_percent: report.profile_percent,
            document_percent: report.document_percent,
            completion_percentage: report.result.completion_percentage,
            is_verification_pending: report.result.is_verification_pending,
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let records = load_records(&args.input)?;
    let rows = score_rows(&records);
    let stdout = io::stdout();
    write_rows(&rows, args.format, stdout.lock())
}

pub(crate) fn score_rows(records: &[BusinessRecord]) -> Vec<ScoreRow> {
    let scorer = CompletionScorer::new();
    records
        .iter()
        .map(|business| ScoreRow::new(business, &scorer.assess(business)))
        .collect()
}

pub(crate) fn write_rows<W: Write>(
    rows: &[ScoreRow],
    format: OutputFormat,
    mut writer: W,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, rows).map_err(io::Error::from)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut writer);
            for row in rows {
                csv_writer.serialize(row).map_err(io::Error::from)?;
            }
            csv_writer.flush()?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::read_records;
    use std::io::Cursor;

    fn sample_records() -> Vec<BusinessRecord> {
        read_records(Cursor::new(
            r#"[
                { "id": "biz-1", "businessName": "Acme", "documents": [] },
                {
                    "businessName": "Zuri Foods",
                    "typeOfIncorporation": "general-partnership",
                    "documents": [{ "docType": "PARTNERSHIP_DEED" }],
                    "personalProfile": { "verifiedEmail": 1 }
                }
            ]"#,
        ))
        .expect("records parse")
    }

    #[test]
    fn rows_carry_intermediate_percentages() {
        let rows = score_rows(&sample_records());

        assert_eq!(rows[0].business_id.as_deref(), Some("biz-1"));
        assert_eq!(rows[0].profile_percent, 12);
        assert_eq!(rows[0].completion_percentage, 25);
        assert_eq!(rows[1].requirement_set, "partnership");
        assert_eq!(rows[1].document_percent, 24);
        assert!(!rows[1].is_verification_pending);
    }

    #[test]
    fn csv_output_has_header_and_one_line_per_business() {
        let rows = score_rows(&sample_records());
        let mut buffer = Vec::new();

        write_rows(&rows, OutputFormat::Csv, &mut buffer).expect("csv renders");

        let output = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "business_id,business_name,requirement_set,profile_percent,document_percent,completion_percentage,is_verification_pending"
        );
        assert_eq!(lines[1], "biz-1,Acme,sole_proprietorship,12,0,25,false");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn json_output_is_an_array() {
        let rows = score_rows(&sample_records());
        let mut buffer = Vec::new();

        write_rows(&rows, OutputFormat::Json, &mut buffer).expect("json renders");

        let value: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["business_name"], "Zuri Foods");
    }
}
