use crate::core::fetcher::{RetrievalStrategy, StrategyKind};
use crate::domain::model::{Course, CourseKind, GradingScale};
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_unique_names, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 整份課程設定。載入後不可變，建構時交給各個元件。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumConfig {
    #[serde(default)]
    pub student: StudentConfig,
    pub fetch: FetchConfig,
    #[serde(default)]
    pub grading_scale: GradingScale,
    pub semesters: Vec<SemesterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentConfig {
    #[serde(default)]
    pub reserved_ids: Vec<String>,
    #[serde(default = "default_privacy_notice")]
    pub privacy_notice: String,
}

impl Default for StudentConfig {
    fn default() -> Self {
        Self {
            reserved_ids: Vec::new(),
            privacy_notice: default_privacy_notice(),
        }
    }
}

fn default_privacy_notice() -> String {
    "Grades for this identifier are not available for privacy reasons.".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_seconds: Option<u64>,
    pub strategies: Vec<RetrievalStrategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterConfig {
    pub name: String,
    pub courses: Vec<Course>,
}

impl CurriculumConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GpaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GpaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GRADES_HOST})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GpaError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn is_reserved(&self, student_id: &str) -> bool {
        self.student.reserved_ids.iter().any(|id| id == student_id)
    }

    pub fn total_courses(&self) -> usize {
        self.semesters.iter().map(|s| s.courses.len()).sum()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("fetch.strategies", self.fetch.strategies.len(), 1)?;
        validate_unique_names(
            "fetch.strategies",
            self.fetch.strategies.iter().map(|s| s.name.as_str()),
        )?;
        if let Some(last) = self.fetch.strategies.last() {
            if last.kind != StrategyKind::Direct {
                return Err(GpaError::InvalidConfigValueError {
                    field: "fetch.strategies".to_string(),
                    value: last.name.clone(),
                    reason: "The last strategy must be a direct fetch".to_string(),
                });
            }
        }
        for strategy in &self.fetch.strategies {
            validate_non_empty_string("fetch.strategies.name", &strategy.name)?;
            match &strategy.kind {
                StrategyKind::Direct => {}
                StrategyKind::Prefix { prefix, .. } => {
                    validate_non_empty_string("fetch.strategies.prefix", prefix)?
                }
                StrategyKind::Template { template } => {
                    if !template.contains("{url}") && !template.contains("{url_encoded}") {
                        return Err(GpaError::InvalidConfigValueError {
                            field: "fetch.strategies.template".to_string(),
                            value: template.clone(),
                            reason: "Template must contain {url} or {url_encoded}".to_string(),
                        });
                    }
                }
            }
        }

        if self.grading_scale.is_empty() {
            return Err(GpaError::ConfigValidationError {
                field: "grading_scale".to_string(),
                message: "Grading scale cannot be empty".to_string(),
            });
        }

        validate_positive_number("semesters", self.semesters.len(), 1)?;
        for semester in &self.semesters {
            validate_non_empty_string("semesters.name", &semester.name)?;
            let field = format!("semesters[{}].courses", semester.name);
            validate_positive_number(&field, semester.courses.len(), 1)?;
            validate_unique_names(&field, semester.courses.iter().map(|c| c.name.as_str()))?;

            for course in &semester.courses {
                validate_non_empty_string(&field, &course.name)?;
                validate_positive_number(
                    &format!("{}.{}.units", field, course.name),
                    course.units as usize,
                    1,
                )?;
                match &course.kind {
                    CourseKind::Single { source } => {
                        validate_url(&format!("{}.{}.source", field, course.name), source)?
                    }
                    CourseKind::Split { current, legacy } => {
                        validate_url(&format!("{}.{}.current", field, course.name), current)?;
                        validate_url(&format!("{}.{}.legacy", field, course.name), legacy)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl Validate for CurriculumConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
