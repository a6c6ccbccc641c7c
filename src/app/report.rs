use crate::domain::model::GpaReport;
use crate::utils::error::{GpaError, Result};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// 完全查無成績時交給呈現層的錯誤內容
#[derive(Debug, Clone, Serialize)]
pub struct FailurePayload {
    pub error: String,
    pub debug_trace: Vec<String>,
}

impl FailurePayload {
    pub fn from_error(error: &GpaError) -> Self {
        Self {
            error: error.user_friendly_message(),
            debug_trace: error.debug_trace().map(<[String]>::to_vec).unwrap_or_default(),
        }
    }
}

pub fn render(report: &GpaReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Csv => render_csv(report),
    }
}

pub fn render_failure(error: &GpaError, format: ReportFormat) -> Result<String> {
    let payload = FailurePayload::from_error(error);
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&payload)?),
        ReportFormat::Text | ReportFormat::Csv => {
            let mut out = format!("{}\n", payload.error);
            if !payload.debug_trace.is_empty() {
                out.push_str("\nDebug trace:\n");
                for line in &payload.debug_trace {
                    let _ = writeln!(out, "  {}", line);
                }
            }
            Ok(out)
        }
    }
}

fn render_text(report: &GpaReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Student: {}", report.student_id);

    for semester in &report.semesters {
        let _ = writeln!(out, "\n== {} ==", semester.name);
        if semester.rows.is_empty() {
            let _ = writeln!(out, "  (no grades found)");
        }
        for row in &semester.rows {
            let points = row
                .points
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {:<24} {:>3}u  {:<4} {:>5}  ({})",
                row.course_name, row.units, row.grade, points, row.system
            );
        }
        let _ = writeln!(
            out,
            "  GPA: {} over {} units",
            semester.gpa, semester.units_used
        );
    }

    let _ = writeln!(out, "\nOverall GPA: {}", report.overall);
    out
}

fn render_csv(report: &GpaReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["semester", "course", "units", "grade", "system", "points"])?;

    for semester in &report.semesters {
        for row in &semester.rows {
            let units = row.units.to_string();
            let points = row.points.map(|p| format!("{:.2}", p)).unwrap_or_default();
            writer.write_record([
                semester.name.as_str(),
                row.course_name.as_str(),
                units.as_str(),
                row.grade.as_str(),
                row.system.as_str(),
                points.as_str(),
            ])?;
        }
    }

    let data = writer.into_inner().map_err(|e| GpaError::ProcessingError {
        message: format!("Failed to finish CSV output: {}", e),
    })?;
    String::from_utf8(data).map_err(|e| GpaError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Gpa, GradeRow, SemesterReport, SystemTag};

    fn report() -> GpaReport {
        GpaReport {
            student_id: "33039".to_string(),
            semesters: vec![
                SemesterReport {
                    name: "Fall".to_string(),
                    rows: vec![
                        GradeRow {
                            course_name: "Math1".to_string(),
                            units: 12,
                            grade: "AA".to_string(),
                            system: SystemTag::Current,
                            points: Some(4.0),
                        },
                        GradeRow {
                            course_name: "Physics1".to_string(),
                            units: 12,
                            grade: "BB".to_string(),
                            system: SystemTag::Legacy,
                            points: Some(3.0),
                        },
                    ],
                    gpa: Gpa::Value(3.5),
                    units_used: 24,
                },
                SemesterReport {
                    name: "Spring".to_string(),
                    rows: vec![],
                    gpa: Gpa::Unavailable,
                    units_used: 0,
                },
            ],
            overall: Gpa::Value(3.5),
            debug_trace: vec![],
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_text_report() {
        let text = render(&report(), ReportFormat::Text).unwrap();
        assert!(text.contains("== Fall =="));
        assert!(text.contains("GPA: 3.50 over 24 units"));
        assert!(text.contains("GPA: N/A over 0 units"));
        assert!(text.contains("Overall GPA: 3.50"));
    }

    #[test]
    fn test_json_report_uses_formatted_gpa() {
        let json = render(&report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["overall"], "3.50");
        assert_eq!(value["semesters"][1]["gpa"], "N/A");
        assert_eq!(value["semesters"][0]["rows"][1]["system"], "legacy");
    }

    #[test]
    fn test_csv_report_rows() {
        let csv = render(&report(), ReportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "semester,course,units,grade,system,points");
        assert_eq!(lines[1], "Fall,Math1,12,AA,current,4.00");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_failure_payload_includes_trace() {
        let error = GpaError::NoGradesFound {
            student_id: "33039".to_string(),
            debug_trace: vec!["Math1: Not Found (N/A)".to_string()],
        };
        let text = render_failure(&error, ReportFormat::Text).unwrap();
        assert!(text.contains("Debug trace:"));
        assert!(text.contains("  Math1: Not Found (N/A)"));

        let json = render_failure(&error, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["debug_trace"][0], "Math1: Not Found (N/A)");
    }
}
