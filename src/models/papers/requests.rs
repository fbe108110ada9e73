use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ExamType, PaperStatus};
use crate::models::common::PaginationQuery;

// 提交试卷（普通用户提交待审核，管理员上传直接通过）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct SubmitPaperRequest {
    pub title: String,
    pub course_id: String,
    pub year: i32,
    pub exam_type: ExamType,
    pub academic_year: String,
    pub semester: i32,
    /// 上传接口返回的 download_token
    pub file_token: String,
}

impl SubmitPaperRequest {
    /// 校验字段取值范围，返回第一条错误
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        if title.chars().count() > 200 {
            return Err("Title must be at most 200 characters".to_string());
        }
        if self.course_id.trim().is_empty() {
            return Err("Course is required".to_string());
        }
        if !(1..=4).contains(&self.year) {
            return Err("Year must be between 1 and 4".to_string());
        }
        if !(1..=2).contains(&self.semester) {
            return Err("Semester must be 1 or 2".to_string());
        }
        validate_academic_year(&self.academic_year)?;
        if self.file_token.trim().is_empty() {
            return Err("A PDF file is required".to_string());
        }
        Ok(())
    }
}

/// 学年格式 `N/N+1`
pub fn validate_academic_year(value: &str) -> Result<(), String> {
    let invalid = || format!("Invalid academic year '{value}', expected e.g. 2023/2024");
    let (start, end) = value.split_once('/').ok_or_else(invalid)?;
    if start.len() != 4 || end.len() != 4 {
        return Err(invalid());
    }
    let start: i32 = start.parse().map_err(|_| invalid())?;
    let end: i32 = end.parse().map_err(|_| invalid())?;
    if end != start + 1 {
        return Err(invalid());
    }
    Ok(())
}

// 列表查询参数（来自 query string）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct PaperListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// 匹配标题、课程名称或课程代码
    pub search: Option<String>,
    pub school_id: Option<String>,
    pub department_id: Option<String>,
    pub course_id: Option<String>,
    pub exam_type: Option<ExamType>,
    pub year: Option<i32>,
    pub academic_year: Option<String>,
    pub semester: Option<i32>,
    /// 仅管理员生效
    pub status: Option<PaperStatus>,
}

impl PaperListParams {
    pub fn pagination(&self) -> PaginationQuery {
        let default = PaginationQuery::default();
        PaginationQuery {
            page: self.page.unwrap_or(default.page),
            size: self.size.unwrap_or(default.size),
        }
    }
}

// 审核请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct ReviewPaperRequest {
    pub status: PaperStatus,
    pub notes: Option<String>,
}

/// 存储层过滤条件
#[derive(Debug, Clone, Default)]
pub struct PaperFilter {
    pub search: Option<String>,
    pub school_id: Option<String>,
    pub department_id: Option<String>,
    pub course_id: Option<String>,
    pub exam_type: Option<ExamType>,
    pub year: Option<i32>,
    pub academic_year: Option<String>,
    pub semester: Option<i32>,
    pub status: Option<PaperStatus>,
    pub uploaded_by: Option<i64>,
}

impl PaperFilter {
    /// 由请求参数构造；非管理员固定只看已通过的试卷
    pub fn from_params(params: &PaperListParams, is_admin: bool) -> Self {
        let non_empty = |v: &Option<String>| {
            v.as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            search: non_empty(&params.search),
            school_id: non_empty(&params.school_id),
            department_id: non_empty(&params.department_id),
            course_id: non_empty(&params.course_id),
            exam_type: params.exam_type,
            year: params.year,
            academic_year: non_empty(&params.academic_year),
            semester: params.semester,
            status: if is_admin {
                params.status
            } else {
                Some(PaperStatus::Approved)
            },
            uploaded_by: None,
        }
    }
}

/// 存储层新建记录
#[derive(Debug, Clone)]
pub struct CreatePaperRecord {
    pub title: String,
    pub course_id: String,
    pub year: i32,
    pub exam_type: ExamType,
    pub academic_year: String,
    pub semester: i32,
    pub file_token: String,
    pub file_name: String,
    pub uploaded_by: i64,
    pub status: PaperStatus,
    pub reviewed_by: Option<i64>,
    pub review_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitPaperRequest {
        SubmitPaperRequest {
            title: "Introduction to Agricultural Economics".to_string(),
            course_id: "course-agec-101".to_string(),
            year: 1,
            exam_type: ExamType::EndSemester,
            academic_year: "2023/2024".to_string(),
            semester: 2,
            file_token: "token".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_year_and_semester_bounds() {
        let mut r = request();
        r.year = 5;
        assert!(r.validate().is_err());
        let mut r = request();
        r.semester = 0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_academic_year_rules() {
        assert!(validate_academic_year("2023/2024").is_ok());
        assert!(validate_academic_year("2023/2025").is_err());
        assert!(validate_academic_year("2023-2024").is_err());
        assert!(validate_academic_year("23/24").is_err());
        assert!(validate_academic_year("abcd/efgh").is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut r = request();
        r.title = "   ".to_string();
        assert_eq!(r.validate().unwrap_err(), "Title is required");
    }

    #[test]
    fn test_filter_forces_approved_for_users() {
        let params = PaperListParams {
            status: Some(PaperStatus::Pending),
            search: Some("  ".to_string()),
            ..Default::default()
        };
        let filter = PaperFilter::from_params(&params, false);
        assert_eq!(filter.status, Some(PaperStatus::Approved));
        assert!(filter.search.is_none());

        let filter = PaperFilter::from_params(&params, true);
        assert_eq!(filter.status, Some(PaperStatus::Pending));
    }

    #[test]
    fn test_query_string_parsing() {
        let params =
            actix_web::web::Query::<PaperListParams>::from_query("year=2&exam_type=cat&page=3")
                .unwrap()
                .into_inner();
        assert_eq!(params.year, Some(2));
        assert_eq!(params.exam_type, Some(ExamType::Cat));
        assert_eq!(params.pagination().page, 3);
        assert_eq!(params.pagination().size, 10);
    }
}
