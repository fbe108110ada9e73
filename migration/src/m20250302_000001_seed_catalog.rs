use sea_orm_migration::prelude::*;

use crate::catalog_data::{COURSES, DEPARTMENTS, SCHOOLS};
use crate::m20250301_000001_create_tables::{Courses, Departments, Schools};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let mut schools = Query::insert()
            .into_table(Schools::Table)
            .columns([Schools::Id, Schools::Name, Schools::CreatedAt])
            .to_owned();
        for (id, name) in SCHOOLS {
            schools.values_panic([(*id).into(), (*name).into(), now.into()]);
        }
        manager.exec_stmt(schools).await?;

        let mut departments = Query::insert()
            .into_table(Departments::Table)
            .columns([
                Departments::Id,
                Departments::SchoolId,
                Departments::Name,
                Departments::CreatedAt,
            ])
            .to_owned();
        for (id, school_id, name) in DEPARTMENTS {
            departments.values_panic([
                (*id).into(),
                (*school_id).into(),
                (*name).into(),
                now.into(),
            ]);
        }
        manager.exec_stmt(departments).await?;

        // 分批插入，避免单条语句参数过多
        for chunk in COURSES.chunks(30) {
            let mut courses = Query::insert()
                .into_table(Courses::Table)
                .columns([
                    Courses::Id,
                    Courses::DepartmentId,
                    Courses::Code,
                    Courses::Name,
                    Courses::CreatedAt,
                ])
                .to_owned();
            for (id, department_id, code, name) in chunk {
                courses.values_panic([
                    (*id).into(),
                    (*department_id).into(),
                    (*code).into(),
                    (*name).into(),
                    now.into(),
                ]);
            }
            manager.exec_stmt(courses).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let courses = Query::delete().from_table(Courses::Table).to_owned();
        manager.exec_stmt(courses).await?;
        let departments = Query::delete().from_table(Departments::Table).to_owned();
        manager.exec_stmt(departments).await?;
        let schools = Query::delete().from_table(Schools::Table).to_owned();
        manager.exec_stmt(schools).await?;
        Ok(())
    }
}
