use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Course, CourseSummary, Department, School};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct DepartmentNode {
    pub id: String,
    pub name: String,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct SchoolNode {
    pub id: String,
    pub name: String,
    pub departments: Vec<DepartmentNode>,
}

/// 学院 → 系 → 课程 树
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CatalogResponse {
    pub schools: Vec<SchoolNode>,
}

impl CatalogResponse {
    /// 由三张扁平表组装树，子节点按名称（课程按代码）排序
    pub fn build(
        mut schools: Vec<School>,
        mut departments: Vec<Department>,
        mut courses: Vec<Course>,
    ) -> Self {
        schools.sort_by(|a, b| a.name.cmp(&b.name));
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        courses.sort_by(|a, b| a.code.cmp(&b.code));

        let schools = schools
            .into_iter()
            .map(|school| {
                let departments = departments
                    .iter()
                    .filter(|d| d.school_id == school.id)
                    .map(|d| DepartmentNode {
                        id: d.id.clone(),
                        name: d.name.clone(),
                        courses: courses
                            .iter()
                            .filter(|c| c.department_id == d.id)
                            .cloned()
                            .collect(),
                    })
                    .collect();
                SchoolNode {
                    id: school.id,
                    name: school.name,
                    departments,
                }
            })
            .collect();

        Self { schools }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CourseListResponse {
    pub items: Vec<CourseSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp(0, 0).unwrap_or_default()
    }

    #[test]
    fn test_build_tree() {
        let schools = vec![School {
            id: "s1".into(),
            name: "School of Science".into(),
            created_at: at(),
        }];
        let departments = vec![
            Department {
                id: "d2".into(),
                school_id: "s1".into(),
                name: "Physics".into(),
                created_at: at(),
            },
            Department {
                id: "d1".into(),
                school_id: "s1".into(),
                name: "Chemistry".into(),
                created_at: at(),
            },
        ];
        let courses = vec![
            Course {
                id: "c2".into(),
                department_id: "d1".into(),
                code: "CHEM 201".into(),
                name: "Organic Chemistry".into(),
                created_at: at(),
            },
            Course {
                id: "c1".into(),
                department_id: "d1".into(),
                code: "CHEM 101".into(),
                name: "General Chemistry".into(),
                created_at: at(),
            },
        ];

        let tree = CatalogResponse::build(schools, departments, courses);
        assert_eq!(tree.schools.len(), 1);
        let depts = &tree.schools[0].departments;
        assert_eq!(depts[0].name, "Chemistry");
        assert_eq!(depts[0].courses[0].code, "CHEM 101");
        assert!(depts[1].courses.is_empty());
    }
}
