use crate::core::parser::GradeRecordParser;
use crate::domain::model::{Course, CourseKind, GradeRecordSet, ResolvedGrade, SystemTag};
use crate::domain::ports::TextFetcher;

/// 決定一門課要查哪些來源，並依優先順序挑出成績。
///
/// 新舊系統並存的課程兩個來源都會抓（即使新系統已經找到），
/// 新系統的成績優先，兩邊的值不會混合。
pub struct CourseGradeResolver<F: TextFetcher> {
    fetcher: F,
}

impl<F: TextFetcher> CourseGradeResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// 抓取並解析一個來源；抓不到就當作空的紀錄集
    pub async fn load_records(&self, location: &str) -> GradeRecordSet {
        let outcome = self.fetcher.fetch_text(location).await;
        if let Some(strategy) = outcome.succeeded_with() {
            tracing::debug!("{} served via {}", location, strategy);
        }

        match outcome.text {
            Some(raw_text) => GradeRecordSet {
                location: location.to_string(),
                records: GradeRecordParser::parse(&raw_text),
                raw_text,
                error: None,
            },
            None => GradeRecordSet {
                location: location.to_string(),
                error: outcome.error,
                ..Default::default()
            },
        }
    }

    pub async fn resolve(&self, course: &Course, student_id: &str) -> ResolvedGrade {
        match &course.kind {
            CourseKind::Single { source } => {
                let single = self.load_records(source).await;
                Self::log_source(course, SystemTag::Single, &single);

                match single.grade_for(student_id) {
                    Some(grade) => ResolvedGrade::found(grade, SystemTag::Single),
                    None => ResolvedGrade::not_found(),
                }
            }
            CourseKind::Split { current, legacy } => {
                let current_set = self.load_records(current).await;
                Self::log_source(course, SystemTag::Current, &current_set);
                let legacy_set = self.load_records(legacy).await;
                Self::log_source(course, SystemTag::Legacy, &legacy_set);

                if let Some(grade) = current_set.grade_for(student_id) {
                    ResolvedGrade::found(grade, SystemTag::Current)
                } else if let Some(grade) = legacy_set.grade_for(student_id) {
                    ResolvedGrade::found(grade, SystemTag::Legacy)
                } else {
                    ResolvedGrade::not_found()
                }
            }
        }
    }

    fn log_source(course: &Course, system: SystemTag, set: &GradeRecordSet) {
        match &set.error {
            Some(error) => tracing::warn!(
                "⚠️ {} [{}] source unavailable ({}), treating as empty",
                course.name,
                system,
                error
            ),
            None => tracing::debug!(
                "📄 {} [{}] parsed {} records from {}",
                course.name,
                system,
                set.records.len(),
                set.location
            ),
        }
    }
}
