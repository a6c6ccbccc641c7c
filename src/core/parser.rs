use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static WHITESPACE_RECORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+([A-Z]+)$").expect("static pattern compiles"));

/// 單行的分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `<studentId>:<grade>`
    Colon { student_id: &'a str, grade: &'a str },
    /// `33039 AA`
    Whitespace { student_id: &'a str, grade: &'a str },
    Unrecognized,
}

impl<'a> LineKind<'a> {
    /// 先試冒號格式，不適用才試空白格式
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return LineKind::Unrecognized;
        }

        // 只要切得出兩欄就算冒號格式，空值也保留
        let mut fields = line.split(':');
        if let (Some(id), Some(grade)) = (fields.next(), fields.next()) {
            return LineKind::Colon {
                student_id: id.trim(),
                grade: grade.trim(),
            };
        }

        match WHITESPACE_RECORD.captures(line) {
            Some(caps) => match (caps.get(1), caps.get(2)) {
                (Some(id), Some(grade)) => LineKind::Whitespace {
                    student_id: id.as_str(),
                    grade: grade.as_str(),
                },
                _ => LineKind::Unrecognized,
            },
            None => LineKind::Unrecognized,
        }
    }

    pub fn record(&self) -> Option<(&'a str, &'a str)> {
        match *self {
            LineKind::Colon { student_id, grade } | LineKind::Whitespace { student_id, grade } => {
                Some((student_id, grade))
            }
            LineKind::Unrecognized => None,
        }
    }
}

/// 從非結構化文字盡力抽出 學號 → 等第。
///
/// 無法辨識的行直接略過；同一學號出現多次時，後面的覆蓋前面的。
pub struct GradeRecordParser;

impl GradeRecordParser {
    pub fn parse(text: &str) -> HashMap<String, String> {
        let mut records = HashMap::new();
        let mut skipped = 0usize;

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match LineKind::classify(line).record() {
                Some((student_id, grade)) => {
                    records.insert(student_id.to_string(), grade.to_string());
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::trace!("Skipped {} unrecognized lines", skipped);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_colon_format() {
        let parsed = GradeRecordParser::parse("33039:AA\n14021 : BB\n");
        assert_eq!(parsed, map(&[("33039", "AA"), ("14021", "BB")]));
    }

    #[test]
    fn test_parse_whitespace_format() {
        let parsed = GradeRecordParser::parse("33039 AA\n14021 BB\n");
        assert_eq!(parsed, map(&[("33039", "AA"), ("14021", "BB")]));
    }

    #[test]
    fn test_unrecognized_lines_are_skipped() {
        let parsed = GradeRecordParser::parse("not a record\n\n   \n33039 AA\nGrades list\n");
        assert_eq!(parsed, map(&[("33039", "AA")]));
        assert!(GradeRecordParser::parse("not a record").is_empty());
    }

    #[test]
    fn test_later_duplicate_overwrites_earlier() {
        let parsed = GradeRecordParser::parse("33039:CC\n33039 BA\n");
        assert_eq!(parsed.get("33039").map(String::as_str), Some("BA"));
    }

    #[test]
    fn test_colon_form_uses_first_two_fields() {
        assert_eq!(
            LineKind::classify("  33039 : AA : note "),
            LineKind::Colon {
                student_id: "33039",
                grade: "AA"
            }
        );
    }

    #[test]
    fn test_classifier_order_and_strictness() {
        assert!(matches!(
            LineKind::classify("33039 AA"),
            LineKind::Whitespace { .. }
        ));
        // 冒號格式可以有非數字學號，空白格式不行
        assert!(matches!(
            LineKind::classify("e123:BB"),
            LineKind::Colon { .. }
        ));
        assert_eq!(LineKind::classify("e123 BB"), LineKind::Unrecognized);
        assert_eq!(LineKind::classify("33039 aa"), LineKind::Unrecognized);
        assert_eq!(LineKind::classify("33039 AA extra"), LineKind::Unrecognized);
        assert_eq!(
            LineKind::classify("33039:"),
            LineKind::Colon {
                student_id: "33039",
                grade: ""
            }
        );
        assert_eq!(LineKind::classify(""), LineKind::Unrecognized);
    }

    #[test]
    fn test_empty_grade_kept_in_mapping() {
        let parsed = GradeRecordParser::parse("33039:\n14021 BB\n");
        assert_eq!(parsed, map(&[("33039", ""), ("14021", "BB")]));
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = GradeRecordParser::parse("33039:AA\r\n14021 BB\r\n");
        assert_eq!(parsed, map(&[("33039", "AA"), ("14021", "BB")]));
    }
}
