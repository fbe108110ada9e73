use serde::Serialize;
use ts_rs::TS;

use super::entities::PaperWithCourse;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct PaperResponse {
    pub paper: PaperWithCourse,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct PaperListResponse {
    pub items: Vec<PaperWithCourse>,
    pub pagination: PaginationInfo,
}

/// 某一年级下的试卷；`papers` 只是其中一页，`count` 是该年级的总数
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct YearBucket {
    pub year: i32,
    pub count: i64,
    pub has_more: bool,
    pub papers: Vec<PaperWithCourse>,
}

impl YearBucket {
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            count: 0,
            has_more: false,
            papers: Vec::new(),
        }
    }

    pub fn from_page(year: i32, page: PaperListResponse) -> Self {
        let PaginationInfo {
            page: current,
            total,
            total_pages,
            ..
        } = page.pagination;
        Self {
            year,
            count: total,
            has_more: current < total_pages,
            papers: page.items,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paper.ts")]
pub struct PapersByYearResponse {
    pub total: i64,
    /// 固定 1-4 四个分组
    pub years: Vec<YearBucket>,
}

impl PapersByYearResponse {
    pub const YEARS: std::ops::RangeInclusive<i32> = 1..=4;

    pub fn from_buckets(years: Vec<YearBucket>) -> Self {
        let total = years.iter().map(|b| b.count).sum();
        Self { total, years }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: i64, total: i64, total_pages: i64) -> PaperListResponse {
        PaperListResponse {
            items: Vec::new(),
            pagination: PaginationInfo {
                page,
                page_size: 20,
                total,
                total_pages,
            },
        }
    }

    #[test]
    fn test_bucket_reports_remaining_pages() {
        let first = YearBucket::from_page(2, page(1, 45, 3));
        assert_eq!(first.count, 45);
        assert!(first.has_more);

        let last = YearBucket::from_page(2, page(3, 45, 3));
        assert!(!last.has_more);
    }

    #[test]
    fn test_total_sums_bucket_counts() {
        let resp = PapersByYearResponse::from_buckets(vec![
            YearBucket::from_page(1, page(1, 45, 3)),
            YearBucket::empty(2),
            YearBucket::from_page(3, page(1, 5, 1)),
            YearBucket::empty(4),
        ]);
        assert_eq!(resp.total, 50);
        assert_eq!(resp.years.len(), 4);
    }
}
