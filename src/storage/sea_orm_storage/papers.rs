//! 试卷存储操作

use super::SeaOrmStorage;
use crate::entity::papers::{ActiveModel, Column, Entity as Papers, Model as PaperModel};
use crate::entity::{courses, departments, papers, schools};
use crate::errors::{PaperHubError, Result};
use crate::models::{
    PaginationInfo,
    catalog::entities::CourseSummary,
    papers::{
        entities::{Paper, PaperStatus, PaperText, PaperWithCourse},
        requests::{CreatePaperRecord, PaperFilter},
        responses::PaperListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    sea_query::Expr,
};

/// 列表查询结果：试卷列（不含提取文本）+ 课程 / 系 / 学院
#[derive(Debug, FromQueryResult)]
struct PaperRow {
    id: i64,
    title: String,
    course_id: String,
    year: i32,
    exam_type: String,
    academic_year: String,
    semester: i32,
    file_token: String,
    file_name: String,
    download_count: i64,
    status: String,
    uploaded_by: i64,
    reviewed_by: Option<i64>,
    reviewed_at: Option<i64>,
    review_notes: Option<String>,
    created_at: i64,
    updated_at: i64,
    course_code: String,
    course_name: String,
    department_id: String,
    department_name: String,
    school_id: String,
    school_name: String,
}

impl From<PaperRow> for PaperWithCourse {
    fn from(row: PaperRow) -> Self {
        let course = CourseSummary {
            id: row.course_id.clone(),
            code: row.course_code,
            name: row.course_name,
            department_id: row.department_id,
            department_name: row.department_name,
            school_id: row.school_id,
            school_name: row.school_name,
        };
        let paper = PaperModel {
            id: row.id,
            title: row.title,
            course_id: row.course_id,
            year: row.year,
            exam_type: row.exam_type,
            academic_year: row.academic_year,
            semester: row.semester,
            file_token: row.file_token,
            file_name: row.file_name,
            download_count: row.download_count,
            status: row.status,
            uploaded_by: row.uploaded_by,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            review_notes: row.review_notes,
            extracted_text: None,
            text_truncated: false,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
        .into_paper();

        PaperWithCourse { paper, course }
    }
}

impl SeaOrmStorage {
    /// 试卷联表课程 / 系 / 学院，一次取出列表所需的全部列
    fn paper_row_select() -> Select<Papers> {
        Papers::find()
            .select_only()
            .columns([
                Column::Id,
                Column::Title,
                Column::CourseId,
                Column::Year,
                Column::ExamType,
                Column::AcademicYear,
                Column::Semester,
                Column::FileToken,
                Column::FileName,
                Column::DownloadCount,
                Column::Status,
                Column::UploadedBy,
                Column::ReviewedBy,
                Column::ReviewedAt,
                Column::ReviewNotes,
                Column::CreatedAt,
                Column::UpdatedAt,
            ])
            .column_as(courses::Column::Code, "course_code")
            .column_as(courses::Column::Name, "course_name")
            .column_as(courses::Column::DepartmentId, "department_id")
            .column_as(departments::Column::Name, "department_name")
            .column_as(departments::Column::SchoolId, "school_id")
            .column_as(schools::Column::Name, "school_name")
            .join(JoinType::InnerJoin, papers::Relation::Course.def())
            .join(JoinType::InnerJoin, courses::Relation::Department.def())
            .join(JoinType::InnerJoin, departments::Relation::School.def())
    }

    /// 按过滤条件构造列表查询
    fn paper_filter_select(filter: &PaperFilter) -> Select<Papers> {
        let mut select = Self::paper_row_select();

        if let Some(ref search) = filter.search {
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(contains_pattern(search)))
                    .add(courses::Column::Name.like(contains_pattern(search)))
                    .add(courses::Column::Code.like(contains_pattern(search))),
            );
        }
        if let Some(ref school_id) = filter.school_id {
            select = select.filter(departments::Column::SchoolId.eq(school_id.as_str()));
        }
        if let Some(ref department_id) = filter.department_id {
            select = select.filter(courses::Column::DepartmentId.eq(department_id.as_str()));
        }
        if let Some(ref course_id) = filter.course_id {
            select = select.filter(Column::CourseId.eq(course_id.as_str()));
        }
        if let Some(exam_type) = filter.exam_type {
            select = select.filter(Column::ExamType.eq(exam_type.as_str()));
        }
        if let Some(year) = filter.year {
            select = select.filter(Column::Year.eq(year));
        }
        if let Some(ref academic_year) = filter.academic_year {
            select = select.filter(Column::AcademicYear.eq(academic_year.as_str()));
        }
        if let Some(semester) = filter.semester {
            select = select.filter(Column::Semester.eq(semester));
        }
        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(uploaded_by) = filter.uploaded_by {
            select = select.filter(Column::UploadedBy.eq(uploaded_by));
        }

        select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    }

    pub async fn create_paper_impl(&self, record: CreatePaperRecord) -> Result<Paper> {
        let now = chrono::Utc::now().timestamp();
        let reviewed_at = record.reviewed_by.map(|_| now);

        let model = ActiveModel {
            title: Set(record.title),
            course_id: Set(record.course_id),
            year: Set(record.year),
            exam_type: Set(record.exam_type.as_str().to_string()),
            academic_year: Set(record.academic_year),
            semester: Set(record.semester),
            file_token: Set(record.file_token),
            file_name: Set(record.file_name),
            download_count: Set(0),
            status: Set(record.status.as_str().to_string()),
            uploaded_by: Set(record.uploaded_by),
            reviewed_by: Set(record.reviewed_by),
            reviewed_at: Set(reviewed_at),
            review_notes: Set(record.review_notes),
            extracted_text: Set(None),
            text_truncated: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("创建试卷失败: {e}")))?;

        Ok(result.into_paper())
    }

    pub async fn get_paper_impl(&self, id: i64) -> Result<Option<PaperWithCourse>> {
        let row = Self::paper_row_select()
            .filter(Column::Id.eq(id))
            .into_model::<PaperRow>()
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询试卷失败: {e}")))?;

        Ok(row.map(PaperWithCourse::from))
    }

    /// 分页列出试卷，最新的在前
    pub async fn list_papers_impl(
        &self,
        filter: &PaperFilter,
        page: u64,
        size: u64,
    ) -> Result<PaperListResponse> {
        let page = page.max(1);
        let size = size.max(1);

        let paginator = Self::paper_filter_select(filter)
            .into_model::<PaperRow>()
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询试卷总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询试卷页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询试卷列表失败: {e}")))?;

        Ok(PaperListResponse {
            items: rows.into_iter().map(PaperWithCourse::from).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 审核；目标状态只能是 approved / rejected
    pub async fn review_paper_impl(
        &self,
        id: i64,
        status: PaperStatus,
        reviewer_id: i64,
        notes: Option<String>,
    ) -> Result<Option<Paper>> {
        if !status.is_review_outcome() {
            return Err(PaperHubError::validation("审核结果只能是 approved 或 rejected"));
        }

        let Some(existing) = Papers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询试卷失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();
        model.status = Set(status.as_str().to_string());
        model.reviewed_by = Set(Some(reviewer_id));
        model.reviewed_at = Set(Some(now));
        model.review_notes = Set(notes.filter(|n| !n.trim().is_empty()));
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("审核试卷失败: {e}")))?;

        Ok(Some(updated.into_paper()))
    }

    pub async fn increment_download_count_impl(&self, id: i64) -> Result<bool> {
        let result = Papers::update_many()
            .col_expr(Column::DownloadCount, Expr::cust("download_count + 1"))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("更新下载次数失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_paper_impl(&self, id: i64) -> Result<bool> {
        let result = Papers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("删除试卷失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_paper_text_impl(&self, id: i64) -> Result<Option<PaperText>> {
        let row: Option<(Option<String>, bool)> = Papers::find_by_id(id)
            .select_only()
            .column(Column::ExtractedText)
            .column(Column::TextTruncated)
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询试卷文本失败: {e}")))?;

        Ok(row.and_then(|(text, truncated)| text.map(|text| PaperText { text, truncated })))
    }

    pub async fn set_paper_text_impl(&self, id: i64, text: &PaperText) -> Result<bool> {
        let result = Papers::update_many()
            .col_expr(Column::ExtractedText, Expr::value(text.text.clone()))
            .col_expr(Column::TextTruncated, Expr::value(text.truncated))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("保存试卷文本失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
