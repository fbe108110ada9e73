//! 学院 / 系 / 课程目录

use super::SeaOrmStorage;
use crate::entity::prelude::{Courses, Departments, Schools};
use crate::entity::{courses, departments, schools};
use crate::errors::{PaperHubError, Result};
use crate::models::catalog::{
    entities::{Course, CourseSummary, Department, School},
    requests::CourseListParams,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

/// 课程连同系、学院名称的查询结果
#[derive(Debug, FromQueryResult)]
struct CourseRow {
    id: String,
    code: String,
    name: String,
    department_id: String,
    department_name: String,
    school_id: String,
    school_name: String,
}

impl From<CourseRow> for CourseSummary {
    fn from(row: CourseRow) -> Self {
        CourseSummary {
            id: row.id,
            code: row.code,
            name: row.name,
            department_id: row.department_id,
            department_name: row.department_name,
            school_id: row.school_id,
            school_name: row.school_name,
        }
    }
}

/// 由名称生成目录 id，例如 `School of Law` -> `school-of-law`
fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

impl SeaOrmStorage {
    /// 课程 + 系 + 学院的联表查询
    fn course_summary_select() -> Select<Courses> {
        Courses::find()
            .select_only()
            .column(courses::Column::Id)
            .column(courses::Column::Code)
            .column(courses::Column::Name)
            .column(courses::Column::DepartmentId)
            .column_as(departments::Column::Name, "department_name")
            .column_as(departments::Column::SchoolId, "school_id")
            .column_as(schools::Column::Name, "school_name")
            .join(JoinType::InnerJoin, courses::Relation::Department.def())
            .join(JoinType::InnerJoin, departments::Relation::School.def())
    }

    pub async fn list_schools_impl(&self) -> Result<Vec<School>> {
        let result = Schools::find()
            .order_by_asc(schools::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询学院列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_school()).collect())
    }

    pub async fn list_departments_impl(&self, school_id: Option<&str>) -> Result<Vec<Department>> {
        let mut select = Departments::find();
        if let Some(school_id) = school_id {
            select = select.filter(departments::Column::SchoolId.eq(school_id));
        }

        let result = select
            .order_by_asc(departments::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询系列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_department()).collect())
    }

    pub async fn list_all_courses_impl(&self) -> Result<Vec<Course>> {
        let result = Courses::find()
            .order_by_asc(courses::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 课程平铺列表，附带系与学院名称
    pub async fn list_courses_impl(&self, params: &CourseListParams) -> Result<Vec<CourseSummary>> {
        let mut select = Self::course_summary_select();

        if let Some(ref school_id) = params.school_id {
            select = select.filter(departments::Column::SchoolId.eq(school_id.as_str()));
        }
        if let Some(ref department_id) = params.department_id {
            select = select.filter(courses::Column::DepartmentId.eq(department_id.as_str()));
        }
        if let Some(search) = params.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(courses::Column::Code.like(contains_pattern(search)))
                    .add(courses::Column::Name.like(contains_pattern(search))),
            );
        }

        let rows = select
            .order_by_asc(courses::Column::Code)
            .into_model::<CourseRow>()
            .all(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(rows.into_iter().map(CourseSummary::from).collect())
    }

    pub async fn get_course_impl(&self, id: &str) -> Result<Option<CourseSummary>> {
        let row = Self::course_summary_select()
            .filter(courses::Column::Id.eq(id))
            .into_model::<CourseRow>()
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(row.map(CourseSummary::from))
    }

    pub async fn get_school_impl(&self, id: &str) -> Result<Option<School>> {
        let result = Schools::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询学院失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn get_department_impl(&self, id: &str) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询系失败: {e}")))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn create_school_impl(&self, name: &str) -> Result<School> {
        let id = slugify(name);
        if id.is_empty() {
            return Err(PaperHubError::validation("学院名称无效"));
        }
        if self.get_school_impl(&id).await?.is_some() {
            return Err(PaperHubError::conflict(format!("学院已存在: {name}")));
        }

        let model = schools::ActiveModel {
            id: Set(id),
            name: Set(name.trim().to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("创建学院失败: {e}")))?;

        Ok(result.into_school())
    }

    /// 同一学院下系名唯一
    pub async fn create_department_impl(&self, school_id: &str, name: &str) -> Result<Department> {
        let name = name.trim();
        let duplicate = Departments::find()
            .filter(departments::Column::SchoolId.eq(school_id))
            .filter(departments::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询系失败: {e}")))?;
        if duplicate.is_some() {
            return Err(PaperHubError::conflict(format!("系已存在: {name}")));
        }

        let id = format!("{school_id}-{}", slugify(name));
        if self.get_department_impl(&id).await?.is_some() {
            return Err(PaperHubError::conflict(format!("系编号冲突: {id}")));
        }

        let model = departments::ActiveModel {
            id: Set(id),
            school_id: Set(school_id.to_string()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("创建系失败: {e}")))?;

        Ok(result.into_department())
    }

    /// 课程代码全局唯一
    pub async fn create_course_impl(
        &self,
        department_id: &str,
        code: &str,
        name: &str,
    ) -> Result<Course> {
        let code = code.trim().to_uppercase();
        let duplicate = Courses::find()
            .filter(courses::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询课程失败: {e}")))?;
        if duplicate.is_some() {
            return Err(PaperHubError::conflict(format!("课程代码已存在: {code}")));
        }

        let model = courses::ActiveModel {
            id: Set(format!("course-{}", slugify(&code))),
            department_id: Set(department_id.to_string()),
            code: Set(code),
            name: Set(name.trim().to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("School of Law"), "school-of-law");
        assert_eq!(slugify("  AGEC 101 "), "agec-101");
        assert_eq!(slugify("Arts & Design!"), "arts-design");
        assert_eq!(slugify("!!!"), "");
    }
}
