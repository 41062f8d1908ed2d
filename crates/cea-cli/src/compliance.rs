//! # Compliance Subcommand
//!
//! Evaluates CPD records read from a JSON or YAML file, without a backend.
//! The file holds a list of `cpd_records` rows; rows of other years and
//! rows that are not completed are ignored.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cea_compliance::{evaluate, filter_for_year, progress, ComplianceReport, ProgressBand};
use cea_core::CpdRecord;

use crate::EXIT_NOT_COMPLIANT;

#[derive(Args, Debug)]
pub struct ComplianceArgs {
    #[command(subcommand)]
    pub command: ComplianceCommand,
}

#[derive(Subcommand, Debug)]
pub enum ComplianceCommand {
    /// Evaluate a file of CPD records for one compliance year.
    Evaluate {
        /// JSON or YAML file with a list of records (`.yaml`/`.yml` read as YAML).
        #[arg(long)]
        records: PathBuf,
        /// Compliance year.
        #[arg(long)]
        year: i32,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

pub fn run_compliance(args: &ComplianceArgs) -> Result<u8> {
    match &args.command {
        ComplianceCommand::Evaluate { records, year, json } => {
            let all = load_records(records)?;
            let counted = filter_for_year(*year, &all);
            tracing::info!(
                file = %records.display(),
                read = all.len(),
                counted = counted.len(),
                "evaluating records"
            );
            let report = evaluate(*year, &counted);
            print_report(&report, *json)?;
            Ok(exit_code(&report))
        }
    }
}

/// Read records from `path`; YAML by extension, JSON otherwise.
pub fn load_records(path: &Path) -> Result<Vec<CpdRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading records file {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("parsing YAML records in {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("parsing JSON records in {}", path.display()))
    }
}

pub(crate) fn print_report(report: &ComplianceReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report).context("serializing report")?);
    } else {
        print!("{}", render_report(report));
    }
    Ok(())
}

pub(crate) fn exit_code(report: &ComplianceReport) -> u8 {
    if report.compliant {
        0
    } else {
        EXIT_NOT_COMPLIANT
    }
}

/// Plain-text report.
pub fn render_report(report: &ComplianceReport) -> String {
    let mut out = format!(
        "CPD compliance {} ({})\n",
        report.year,
        report.framework.label()
    );
    for c in &report.breakdown {
        let p = progress(c.completed, c.required);
        out.push_str(&format!(
            "  {:<28} {:>5} / {:<3} {:<8} {:>4}%  {}\n",
            c.label,
            c.completed,
            c.required,
            c.unit.as_str(),
            p.percent,
            band_word(p.band)
        ));
    }
    let total = progress(report.total_completed, report.required_total);
    out.push_str(&format!(
        "  {:<28} {:>5} / {:<3} {:<8} {:>4}%\n",
        "Total",
        report.total_completed,
        report.required_total,
        report.unit.as_str(),
        total.percent
    ));
    out.push_str(if report.compliant {
        "Status: COMPLIANT\n"
    } else {
        "Status: NOT COMPLIANT\n"
    });
    if !report.pending_keo_approval.is_empty() {
        out.push_str(&format!(
            "  {} self-directed record(s) awaiting KEO approval\n",
            report.pending_keo_approval.len()
        ));
    }
    out
}

fn band_word(band: ProgressBand) -> &'static str {
    match band {
        ProgressBand::Complete => "complete",
        ProgressBand::Nearly => "nearly",
        ProgressBand::Behind => "behind",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_RECORDS: &str = r#"[
        {"user_id": "550e8400-e29b-41d4-a716-446655440000", "course_name": "AML", "completion_date": "2026-01-10",
         "compliance_year": 2026, "status": "Completed", "cpd_category": "Structured_Learning_PE", "training_hours": 4},
        {"user_id": "550e8400-e29b-41d4-a716-446655440000", "course_name": "Negotiation", "completion_date": "2026-02-10",
         "compliance_year": 2026, "status": "Completed", "cpd_category": "Structured_Learning_PC", "training_hours": "8"},
        {"user_id": "550e8400-e29b-41d4-a716-446655440000", "course_name": "Old", "completion_date": "2025-02-10",
         "compliance_year": 2025, "status": "Completed", "cpd_credits": 6}
    ]"#;

    const YAML_RECORDS: &str = "
- user_id: 550e8400-e29b-41d4-a716-446655440000
  course_name: Ethics
  completion_date: 2025-03-01
  compliance_year: 2025
  status: Completed
  cpd_category: Professional
  cpd_credits: 4
- user_id: 550e8400-e29b-41d4-a716-446655440000
  course_name: Digital tools
  completion_date: 2025-04-01
  compliance_year: 2025
  status: Completed
  cpd_category: Generic
  cpd_credits: 2
";

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn json_records_are_filtered_by_year() {
        let dir = tempfile::tempdir().unwrap();
        let records = load_records(&write(&dir, "records.json", JSON_RECORDS)).unwrap();
        assert_eq!(records.len(), 3);
        let counted = filter_for_year(2026, &records);
        let report = evaluate(2026, &counted);
        assert_eq!(report.records_counted, 2);
        assert_eq!(report.total_completed, 12.0);
        assert!(!report.compliant);
        assert_eq!(exit_code(&report), EXIT_NOT_COMPLIANT);
    }

    #[test]
    fn yaml_records_use_the_legacy_framework() {
        let dir = tempfile::tempdir().unwrap();
        let records = load_records(&write(&dir, "records.yml", YAML_RECORDS)).unwrap();
        let report = evaluate(2025, &filter_for_year(2025, &records));
        assert!(report.compliant);
        assert_eq!(exit_code(&report), 0);
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = load_records(Path::new("/nonexistent/records.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/records.json"));
    }

    #[test]
    fn rendered_report_lists_components_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let records = load_records(&write(&dir, "records.json", JSON_RECORDS)).unwrap();
        let text = render_report(&evaluate(2026, &filter_for_year(2026, &records)));
        assert!(text.starts_with("CPD compliance 2026 (2026 Framework)"));
        assert!(text.contains("Prescribed Essentials"));
        assert!(text.contains("Self-Directed Learning"));
        assert!(text.contains("Status: NOT COMPLIANT"));
    }
}
