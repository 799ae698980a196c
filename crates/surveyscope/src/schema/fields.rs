//! Logical survey fields and their bindings to column headers.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};
use crate::input::SurveyTable;

/// Logical role of a survey column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// Whether the respondent used the surveyed tool.
    UsageFlag,
    /// Respondent category (student, teacher, ...).
    UserType,
    /// Reported emotion.
    Emotion,
    /// How often the tool is used.
    UsageFrequency,
    /// Numeric score (usefulness, trust, ...).
    Score,
    /// Free-text opinion.
    Opinion,
    /// Grade or cohort.
    Grade,
}

impl FieldRole {
    /// Whether the role must be present for a complete dashboard.
    pub fn is_required(&self) -> bool {
        !matches!(self, FieldRole::Opinion | FieldRole::Grade)
    }
}

/// Binding of logical fields to the column headers of an uploaded survey.
///
/// Lookup is always by name; column order in the file is irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyFields {
    /// Usage-flag column.
    #[serde(default = "default_usage_flag")]
    pub usage_flag: String,
    /// Literal value of the usage flag that marks a respondent as a user.
    #[serde(default = "default_affirmative")]
    pub affirmative: String,
    /// User-type column.
    #[serde(default = "default_user_type")]
    pub user_type: String,
    /// Emotion column.
    #[serde(default = "default_emotion")]
    pub emotion: String,
    /// Usage-frequency column.
    #[serde(default = "default_usage_frequency")]
    pub usage_frequency: String,
    /// Numeric score columns offered as metrics, in display order.
    #[serde(default = "default_scores")]
    pub scores: Vec<String>,
    /// Free-text opinion column.
    #[serde(default = "default_opinion")]
    pub opinion: Option<String>,
    /// Grade/cohort column.
    #[serde(default = "default_grade")]
    pub grade: Option<String>,
}

impl Default for SurveyFields {
    fn default() -> Self {
        Self {
            usage_flag: default_usage_flag(),
            affirmative: default_affirmative(),
            user_type: default_user_type(),
            emotion: default_emotion(),
            usage_frequency: default_usage_frequency(),
            scores: default_scores(),
            opinion: default_opinion(),
            grade: default_grade(),
        }
    }
}

fn default_usage_flag() -> String {
    "사용 여부".to_string()
}

fn default_affirmative() -> String {
    "예".to_string()
}

fn default_user_type() -> String {
    "사용자 유형".to_string()
}

fn default_emotion() -> String {
    "감정".to_string()
}

fn default_usage_frequency() -> String {
    "사용 빈도".to_string()
}

fn default_scores() -> Vec<String> {
    vec!["유용성 점수".to_string(), "신뢰도 점수".to_string()]
}

fn default_opinion() -> Option<String> {
    Some("의견".to_string())
}

fn default_grade() -> Option<String> {
    Some("학년".to_string())
}

/// Which bound fields an uploaded table provides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldReport {
    /// Bound columns found in the table.
    pub present: Vec<(FieldRole, String)>,
    /// Required columns that are absent.
    pub missing_required: Vec<(FieldRole, String)>,
    /// Optional columns that are absent.
    pub missing_optional: Vec<(FieldRole, String)>,
}

impl FieldReport {
    /// Whether every required field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

impl SurveyFields {
    /// All bindings with their roles.
    pub fn bindings(&self) -> Vec<(FieldRole, &str)> {
        let mut bindings = vec![
            (FieldRole::UsageFlag, self.usage_flag.as_str()),
            (FieldRole::UserType, self.user_type.as_str()),
            (FieldRole::Emotion, self.emotion.as_str()),
            (FieldRole::UsageFrequency, self.usage_frequency.as_str()),
        ];
        bindings.extend(self.scores.iter().map(|s| (FieldRole::Score, s.as_str())));
        if let Some(ref opinion) = self.opinion {
            bindings.push((FieldRole::Opinion, opinion.as_str()));
        }
        if let Some(ref grade) = self.grade {
            bindings.push((FieldRole::Grade, grade.as_str()));
        }
        bindings
    }

    /// Compare the bindings against a table header.
    pub fn check(&self, table: &SurveyTable) -> FieldReport {
        let mut report = FieldReport::default();
        for (role, column) in self.bindings() {
            let entry = (role, column.to_string());
            if table.has_column(column) {
                report.present.push(entry);
            } else if role.is_required() {
                report.missing_required.push(entry);
            } else {
                report.missing_optional.push(entry);
            }
        }
        report
    }

    /// Score columns present in the table.
    pub fn available_metrics<'a>(&'a self, table: &SurveyTable) -> Vec<&'a str> {
        self.scores
            .iter()
            .filter(|s| table.has_column(s))
            .map(String::as_str)
            .collect()
    }

    /// Resolve the metric to plot: the requested one, or the first score.
    pub fn metric<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str> {
        match requested {
            Some(metric) => Ok(metric),
            None => self
                .scores
                .first()
                .map(String::as_str)
                .ok_or_else(|| SurveyError::Config("no score columns configured".to_string())),
        }
    }

    /// Field that drives animation frames: grade when bound, else usage frequency.
    pub fn animation_field(&self, table: &SurveyTable) -> &str {
        match self.grade {
            Some(ref grade) if table.has_column(grade) => grade,
            _ => &self.usage_frequency,
        }
    }
}
