use crate::config::curriculum::CurriculumConfig;
use crate::core::gpa::GpaAggregator;
use crate::core::resolver::CourseGradeResolver;
use crate::domain::model::{GpaReport, GradeRow, ResolvedGrade, SemesterReport};
use crate::domain::ports::TextFetcher;
use crate::utils::error::{GpaError, Result};
use std::sync::Arc;

/// 對單一學生跑完整條流程：逐課查成績，再算各學期與總 GPA。
///
/// 課程嚴格依設定順序一門一門查，不平行處理，確保除錯紀錄的順序穩定。
/// 每次呼叫都重新抓取，不保留任何跨學生的狀態。
pub struct GpaEngine<F: TextFetcher> {
    config: Arc<CurriculumConfig>,
    resolver: CourseGradeResolver<F>,
}

impl<F: TextFetcher> GpaEngine<F> {
    pub fn new(config: Arc<CurriculumConfig>, fetcher: F) -> Self {
        Self {
            config,
            resolver: CourseGradeResolver::new(fetcher),
        }
    }

    pub async fn run(&self, student_id: &str) -> Result<GpaReport> {
        let student_id = student_id.trim();

        // 保留學號優先於一切處理，連網路都不碰
        if self.config.is_reserved(student_id) {
            tracing::info!("🔒 Reserved identifier requested, resolution blocked");
            return Err(GpaError::PrivacyBlocked {
                notice: self.config.student.privacy_notice.clone(),
            });
        }

        if student_id.is_empty() {
            return Err(GpaError::ValidationError {
                message: "Student identifier cannot be empty".to_string(),
            });
        }

        tracing::info!(
            "🚀 Resolving {} courses for student {}",
            self.config.total_courses(),
            student_id
        );

        let aggregator = GpaAggregator::new(&self.config.grading_scale);
        let mut debug_trace = Vec::with_capacity(self.config.total_courses());
        let mut semesters = Vec::with_capacity(self.config.semesters.len());
        let mut summaries = Vec::with_capacity(self.config.semesters.len());
        let mut any_found = false;

        for semester in &self.config.semesters {
            let mut resolved: Vec<ResolvedGrade> = Vec::with_capacity(semester.courses.len());

            for course in &semester.courses {
                let grade = self.resolver.resolve(course, student_id).await;
                let line = grade.trace_line(&course.name);
                tracing::info!("📚 {}", line);
                debug_trace.push(line);
                resolved.push(grade);
            }

            let rows: Vec<GradeRow> = semester
                .courses
                .iter()
                .zip(&resolved)
                .filter_map(|(course, grade)| {
                    Some(GradeRow {
                        course_name: course.name.clone(),
                        units: course.units,
                        grade: grade.grade.clone()?,
                        system: grade.system?,
                        points: aggregator.grade_point(grade),
                    })
                })
                .collect();
            any_found |= !rows.is_empty();

            let summary = aggregator.semester_gpa(semester.courses.iter().zip(&resolved));
            tracing::info!(
                "🎓 {} GPA: {} ({} units)",
                semester.name,
                summary.gpa,
                summary.units_used
            );

            summaries.push(summary);
            semesters.push(SemesterReport {
                name: semester.name.clone(),
                rows,
                gpa: summary.gpa,
                units_used: summary.units_used,
            });
        }

        if !any_found {
            tracing::warn!("❌ No grades found for student {} in any course", student_id);
            return Err(GpaError::NoGradesFound {
                student_id: student_id.to_string(),
                debug_trace,
            });
        }

        let overall = aggregator.overall_gpa(&summaries);
        tracing::info!("✅ Overall GPA: {}", overall);

        Ok(GpaReport {
            student_id: student_id.to_string(),
            semesters,
            overall,
            debug_trace,
            generated_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::curriculum::tests::SAMPLE;
    use crate::core::resolver::tests::MockFetcher;
    use crate::domain::model::{Gpa, SystemTag};

    const MATH1_NEW: &str = "https://grades.example.com/math1-new.txt";
    const MATH1_OLD: &str = "https://grades.example.com/math1-old.txt";
    const PHYSICS1: &str = "https://grades.example.com/physics1.txt";
    const MATH2: &str = "https://grades.example.com/math2.txt";

    fn config() -> Arc<CurriculumConfig> {
        Arc::new(CurriculumConfig::from_toml_str(SAMPLE).unwrap())
    }

    #[tokio::test]
    async fn test_full_resolution() {
        let fetcher = MockFetcher::new();
        fetcher.set_source(MATH1_NEW, "33039:AA\n").await;
        fetcher.set_source(MATH1_OLD, "33039:FF\n").await;
        fetcher.set_source(PHYSICS1, "33039 BB\n").await;
        fetcher.set_source(MATH2, "33039:CC\n").await;
        let engine = GpaEngine::new(config(), fetcher.clone());

        let report = engine.run(" 33039 ").await.unwrap();

        assert_eq!(report.student_id, "33039");
        assert_eq!(report.semesters[0].gpa, Gpa::Value(3.5));
        assert_eq!(report.semesters[0].units_used, 24);
        assert_eq!(report.semesters[0].rows[0].system, SystemTag::Current);
        assert_eq!(report.semesters[0].rows[0].points, Some(4.0));
        assert_eq!(report.semesters[1].gpa, Gpa::Value(2.0));
        // (3.50*24 + 2.00*12) / 36 = 3.00
        assert_eq!(report.overall.to_string(), "3.00");
        assert_eq!(
            report.debug_trace,
            vec![
                "Math1: AA (current)".to_string(),
                "Physics1: BB (single)".to_string(),
                "Math2: CC (single)".to_string(),
            ]
        );
        assert_eq!(
            fetcher.calls().await,
            vec![MATH1_NEW, MATH1_OLD, PHYSICS1, MATH2]
        );
    }

    #[tokio::test]
    async fn test_one_semester_only() {
        let fetcher = MockFetcher::new();
        fetcher.set_source(MATH1_OLD, "33039:AA\n").await;
        fetcher.set_source(PHYSICS1, "33039:BB\n").await;
        let engine = GpaEngine::new(config(), fetcher);

        let report = engine.run("33039").await.unwrap();

        assert_eq!(report.semesters[0].rows[0].system, SystemTag::Legacy);
        assert_eq!(report.semesters[1].gpa, Gpa::Unavailable);
        assert!(report.semesters[1].rows.is_empty());
        assert_eq!(report.overall.to_string(), "3.50");
    }

    #[tokio::test]
    async fn test_unknown_symbol_listed_but_not_counted() {
        let fetcher = MockFetcher::new();
        fetcher.set_source(PHYSICS1, "33039:EX\n").await;
        fetcher.set_source(MATH2, "33039:BA\n").await;
        let engine = GpaEngine::new(config(), fetcher);

        let report = engine.run("33039").await.unwrap();

        assert_eq!(report.semesters[0].rows.len(), 1);
        assert_eq!(report.semesters[0].rows[0].points, None);
        assert_eq!(report.semesters[0].gpa, Gpa::Unavailable);
        assert_eq!(report.overall, Gpa::Value(3.5));
    }

    #[tokio::test]
    async fn test_reserved_identifier_blocks_before_any_fetch() {
        let fetcher = MockFetcher::new();
        fetcher.set_source(PHYSICS1, "00000:AA\n").await;
        let engine = GpaEngine::new(config(), fetcher.clone());

        let result = engine.run("00000").await;

        match result {
            Err(GpaError::PrivacyBlocked { notice }) => {
                assert_eq!(notice, "This record is private.")
            }
            other => panic!("expected privacy notice, got {:?}", other),
        }
        assert!(fetcher.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_identifier_rejected_without_fetch() {
        let fetcher = MockFetcher::new();
        let engine = GpaEngine::new(config(), fetcher.clone());

        assert!(matches!(
            engine.run("   ").await,
            Err(GpaError::ValidationError { .. })
        ));
        assert!(fetcher.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_grades_anywhere_returns_trace() {
        let fetcher = MockFetcher::new();
        fetcher.set_source(PHYSICS1, "11111:AA\n").await;
        let engine = GpaEngine::new(config(), fetcher);

        let err = engine.run("33039").await.unwrap_err();

        assert_eq!(
            err.debug_trace().unwrap(),
            [
                "Math1: Not Found (N/A)".to_string(),
                "Physics1: Not Found (N/A)".to_string(),
                "Math2: Not Found (N/A)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let fetcher = MockFetcher::new();
        fetcher.set_source(MATH1_NEW, "33039:BA\n").await;
        fetcher.set_source(MATH2, "33039 DD\n").await;
        let engine = GpaEngine::new(config(), fetcher.clone());

        let first = engine.run("33039").await.unwrap();
        let second = engine.run("33039").await.unwrap();

        assert_eq!(first.semesters, second.semesters);
        assert_eq!(first.overall, second.overall);
        assert_eq!(first.debug_trace, second.debug_trace);
        // 不快取：第二次也重新抓了全部來源
        assert_eq!(fetcher.calls().await.len(), 8);
    }
}
