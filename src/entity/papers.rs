//! 试卷实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "papers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub course_id: String,
    pub year: i32,
    pub exam_type: String,
    pub academic_year: String,
    pub semester: i32,
    pub file_token: String,
    pub file_name: String,
    pub download_count: i64,
    pub status: String,
    pub uploaded_by: i64,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub review_notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub extracted_text: Option<String>,
    pub text_truncated: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::files::Entity",
        from = "Column::FileToken",
        to = "super::files::Column::DownloadToken"
    )]
    File,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UploadedBy",
        to = "super::users::Column::Id"
    )]
    Uploader,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::File.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_paper(self) -> crate::models::papers::entities::Paper {
        use crate::models::papers::entities::{ExamType, Paper, PaperStatus};

        Paper {
            id: self.id,
            title: self.title,
            course_id: self.course_id,
            year: self.year,
            exam_type: self
                .exam_type
                .parse::<ExamType>()
                .unwrap_or(ExamType::EndSemester),
            academic_year: self.academic_year,
            semester: self.semester,
            file_token: self.file_token,
            file_name: self.file_name,
            download_count: self.download_count,
            status: self
                .status
                .parse::<PaperStatus>()
                .unwrap_or(PaperStatus::Pending),
            uploaded_by: self.uploaded_by,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at.map(super::from_unix),
            review_notes: self.review_notes,
            created_at: super::from_unix(self.created_at),
            updated_at: super::from_unix(self.updated_at),
        }
    }
}
