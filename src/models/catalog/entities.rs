use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学院
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct School {
    pub id: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 系
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Department {
    pub id: String,
    pub school_id: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Course {
    pub id: String,
    pub department_id: String,
    /// 课程代码，例如 `AGEC 101`
    pub code: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 课程及其所属系、学院名称
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CourseSummary {
    pub id: String,
    pub code: String,
    pub name: String,
    pub department_id: String,
    pub department_name: String,
    pub school_id: String,
    pub school_name: String,
}

impl CourseSummary {
    /// 展示用的 "CODE - Name"
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}
