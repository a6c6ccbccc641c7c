use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// 課程：名稱在學期內唯一，學分數固定且大於零
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub units: u32,
    #[serde(flatten)]
    pub kind: CourseKind,
}

/// 課程資料來源：單一系統，或新舊系統並存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CourseKind {
    Single { source: String },
    Split { current: String, legacy: String },
}

impl Course {
    /// 依查詢順序列出 (系統, 來源位置)
    pub fn sources(&self) -> Vec<(SystemTag, &str)> {
        match &self.kind {
            CourseKind::Single { source } => vec![(SystemTag::Single, source.as_str())],
            CourseKind::Split { current, legacy } => vec![
                (SystemTag::Current, current.as_str()),
                (SystemTag::Legacy, legacy.as_str()),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemTag {
    Legacy,
    Current,
    Single,
}

impl SystemTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemTag::Legacy => "legacy",
            SystemTag::Current => "current",
            SystemTag::Single => "single",
        }
    }
}

impl fmt::Display for SystemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 等第 → 點數對照表。不認得的等第視為沒有有效成績。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradingScale(BTreeMap<String, f64>);

impl GradingScale {
    pub fn new(points: BTreeMap<String, f64>) -> Self {
        Self(points)
    }

    pub fn point(&self, symbol: &str) -> Option<f64> {
        self.0.get(symbol).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for GradingScale {
    fn default() -> Self {
        let table = [
            ("AA", 4.0),
            ("BA", 3.5),
            ("BB", 3.0),
            ("CB", 2.5),
            ("CC", 2.0),
            ("DC", 1.5),
            ("DD", 1.0),
            ("FD", 0.5),
            ("FF", 0.0),
        ];
        Self(
            table
                .into_iter()
                .map(|(symbol, point)| (symbol.to_string(), point))
                .collect(),
        )
    }
}

/// 單次抓取嘗試的紀錄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchAttempt {
    pub strategy: String,
    pub url: String,
    pub error: Option<String>,
}

/// 抓取結果：永遠回傳值，不拋錯
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub text: Option<String>,
    pub error: Option<String>,
    pub attempts: Vec<FetchAttempt>,
}

impl FetchOutcome {
    pub fn succeeded_with(&self) -> Option<&str> {
        self.text.as_ref()?;
        self.attempts.last().map(|a| a.strategy.as_str())
    }
}

/// 一個來源位置解析後的成績紀錄，每次查詢重新產生
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeRecordSet {
    pub location: String,
    pub records: HashMap<String, String>,
    pub raw_text: String,
    pub error: Option<String>,
}

impl GradeRecordSet {
    pub fn grade_for(&self, student_id: &str) -> Option<&str> {
        self.records.get(student_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedGrade {
    pub grade: Option<String>,
    pub system: Option<SystemTag>,
}

impl ResolvedGrade {
    pub fn found(grade: impl Into<String>, system: SystemTag) -> Self {
        Self {
            grade: Some(grade.into()),
            system: Some(system),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }

    /// `<course>: <grade or 'Not Found'> (<system or 'N/A'>)`
    pub fn trace_line(&self, course_name: &str) -> String {
        format!(
            "{}: {} ({})",
            course_name,
            self.grade.as_deref().unwrap_or("Not Found"),
            self.system.map(|s| s.as_str()).unwrap_or("N/A")
        )
    }
}

/// 兩位小數的 GPA，或沒有任何學分參與計算時的「無法計算」
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gpa {
    Value(f64),
    Unavailable,
}

impl Gpa {
    pub fn value(&self) -> Option<f64> {
        match self {
            Gpa::Value(v) => Some(*v),
            Gpa::Unavailable => None,
        }
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gpa::Value(v) => write!(f, "{:.2}", v),
            Gpa::Unavailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Gpa {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// 已取得成績的課程列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRow {
    pub course_name: String,
    pub units: u32,
    pub grade: String,
    pub system: SystemTag,
    pub points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterReport {
    pub name: String,
    pub rows: Vec<GradeRow>,
    pub gpa: Gpa,
    pub units_used: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaReport {
    pub student_id: String,
    pub semesters: Vec<SemesterReport>,
    pub overall: Gpa,
    pub debug_trace: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
