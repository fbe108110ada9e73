use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::catalog::entities::CourseSummary;

// 考试类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub enum ExamType {
    MidSemester,
    EndSemester,
    Cat,
    Assignment,
}

impl ExamType {
    pub const ALL: [ExamType; 4] = [
        ExamType::MidSemester,
        ExamType::EndSemester,
        ExamType::Cat,
        ExamType::Assignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::MidSemester => "mid-semester",
            ExamType::EndSemester => "end-semester",
            ExamType::Cat => "cat",
            ExamType::Assignment => "assignment",
        }
    }
}

impl<'de> Deserialize<'de> for ExamType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExamType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid exam type: '{s}'. Expected one of: mid-semester, end-semester, cat, assignment"
                )
            })
    }
}

// 审核状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub enum PaperStatus {
    Pending,
    Approved,
    Rejected,
}

impl PaperStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperStatus::Pending => "pending",
            PaperStatus::Approved => "approved",
            PaperStatus::Rejected => "rejected",
        }
    }

    /// 审核只能落到 approved / rejected
    pub fn is_review_outcome(&self) -> bool {
        !matches!(self, PaperStatus::Pending)
    }
}

impl<'de> Deserialize<'de> for PaperStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaperStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaperStatus::Pending),
            "approved" => Ok(PaperStatus::Approved),
            "rejected" => Ok(PaperStatus::Rejected),
            _ => Err(format!("Invalid paper status: {s}")),
        }
    }
}

// 试卷
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct Paper {
    pub id: i64,
    pub title: String,
    pub course_id: String,
    /// 年级 1-4
    pub year: i32,
    pub exam_type: ExamType,
    /// 学年，形如 `2023/2024`
    pub academic_year: String,
    pub semester: i32,
    pub file_token: String,
    pub file_name: String,
    pub download_count: i64,
    pub status: PaperStatus,
    pub uploaded_by: i64,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub review_notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 试卷及课程信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct PaperWithCourse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub paper: Paper,
    pub course: CourseSummary,
}

/// 提取出的试卷文本，`truncated` 表示超出长度上限被截断
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperText {
    pub text: String,
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_type_text() {
        assert_eq!(ExamType::MidSemester.to_string(), "mid-semester");
        assert_eq!("cat".parse::<ExamType>().unwrap(), ExamType::Cat);
        assert!("final".parse::<ExamType>().is_err());
        let t: ExamType = serde_json::from_str("\"end-semester\"").unwrap();
        assert_eq!(t, ExamType::EndSemester);
    }

    #[test]
    fn test_review_outcomes() {
        assert!(PaperStatus::Approved.is_review_outcome());
        assert!(PaperStatus::Rejected.is_review_outcome());
        assert!(!PaperStatus::Pending.is_review_outcome());
    }
}
