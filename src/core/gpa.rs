use crate::domain::model::{Course, Gpa, GradingScale, ResolvedGrade};

/// 一個學期的計算結果，`units_used` 只計入有成績且等第有效的課程
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemesterGpa {
    pub gpa: Gpa,
    pub units_used: u32,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 學分加權的 GPA 計算
pub struct GpaAggregator<'a> {
    scale: &'a GradingScale,
}

impl<'a> GpaAggregator<'a> {
    pub fn new(scale: &'a GradingScale) -> Self {
        Self { scale }
    }

    pub fn grade_point(&self, grade: &ResolvedGrade) -> Option<f64> {
        grade.grade.as_deref().and_then(|symbol| self.scale.point(symbol))
    }

    pub fn semester_gpa<'c, I>(&self, graded: I) -> SemesterGpa
    where
        I: IntoIterator<Item = (&'c Course, &'c ResolvedGrade)>,
    {
        let mut total_points = 0.0;
        let mut total_units = 0u32;

        for (course, resolved) in graded {
            let Some(point) = self.grade_point(resolved) else {
                if let Some(symbol) = &resolved.grade {
                    tracing::warn!(
                        "❓ Unknown grade symbol '{}' for {}, excluded from GPA",
                        symbol,
                        course.name
                    );
                }
                continue;
            };
            total_points += point * course.units as f64;
            total_units += course.units;
        }

        let gpa = if total_units > 0 {
            Gpa::Value(round2(total_points / total_units as f64))
        } else {
            Gpa::Unavailable
        };

        SemesterGpa {
            gpa,
            units_used: total_units,
        }
    }

    /// 各學期以實際採計學分加權；只有一學期有值時原樣回傳；都沒有時為 0.00
    pub fn overall_gpa(&self, semesters: &[SemesterGpa]) -> Gpa {
        let available: Vec<(f64, u32)> = semesters
            .iter()
            .filter_map(|s| s.gpa.value().map(|v| (v, s.units_used)))
            .collect();

        match available.as_slice() {
            [] => Gpa::Value(0.0),
            [(only, _)] => Gpa::Value(*only),
            many => {
                let units: u32 = many.iter().map(|(_, u)| u).sum();
                let weighted: f64 = many.iter().map(|(g, u)| g * *u as f64).sum();
                Gpa::Value(round2(weighted / units as f64))
            }
        }
    }
}
