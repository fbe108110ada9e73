use chrono::{Duration, Utc};
use rust_paperhub::config::DatabaseConfig;
use rust_paperhub::models::papers::{
    entities::{ExamType, PaperStatus, PaperText},
    requests::{CreatePaperRecord, PaperFilter},
    responses::{PapersByYearResponse, YearBucket},
};
use rust_paperhub::models::payments::{
    callback::CallbackOutcome,
    entities::{CallbackSettlement, PaymentStatus},
    requests::{CreateMpesaTransactionRecord, CreatePaymentRecord},
};
use rust_paperhub::models::users::{entities::UserRole, requests::CreateUserRequest};
use rust_paperhub::storage::Storage;
use rust_paperhub::storage::sea_orm_storage::SeaOrmStorage;

const COURSE: &str = "course-agec-101";

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory database")
}

async fn user(storage: &SeaOrmStorage, name: &str) -> i64 {
    storage
        .create_user(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "hashed".to_string(),
            role: UserRole::User,
            display_name: None,
            avatar_url: None,
        })
        .await
        .expect("create user")
        .id
}

async fn paper(
    storage: &SeaOrmStorage,
    uploader: i64,
    title: &str,
    year: i32,
    status: PaperStatus,
) -> i64 {
    let token = format!("token-{title}-{year}");
    storage
        .upload_file(
            &token,
            &format!("{title}.pdf"),
            &format!("{token}.pdf"),
            1024,
            "application/pdf",
            uploader,
        )
        .await
        .expect("record file");

    storage
        .create_paper(CreatePaperRecord {
            title: title.to_string(),
            course_id: COURSE.to_string(),
            year,
            exam_type: ExamType::EndSemester,
            academic_year: "2023/2024".to_string(),
            semester: 1,
            file_token: token,
            file_name: format!("{title}.pdf"),
            uploaded_by: uploader,
            status,
            reviewed_by: None,
            review_notes: None,
        })
        .await
        .expect("create paper")
        .id
}

async fn pending_payment(storage: &SeaOrmStorage, user_id: i64, checkout: &str) -> String {
    let id = format!("pay-{checkout}");
    storage
        .create_payment(CreatePaymentRecord {
            id: id.clone(),
            user_id,
            phone_number: "254712345678".to_string(),
            amount: 10.0,
            currency: "KES".to_string(),
            expires_at: Utc::now() + Duration::days(365),
        })
        .await
        .expect("create payment");
    storage
        .create_mpesa_transaction(CreateMpesaTransactionRecord {
            payment_id: id.clone(),
            merchant_request_id: format!("merchant-{checkout}"),
            checkout_request_id: checkout.to_string(),
            phone_number: "254712345678".to_string(),
            amount: 10.0,
        })
        .await
        .expect("create transaction");
    id
}

fn outcome(checkout: &str, result_code: i32) -> CallbackOutcome {
    CallbackOutcome {
        merchant_request_id: format!("merchant-{checkout}"),
        checkout_request_id: checkout.to_string(),
        result_code,
        result_desc: if result_code == 0 {
            "The service request is processed successfully.".to_string()
        } else {
            "Request cancelled by user".to_string()
        },
        receipt_number: (result_code == 0).then(|| "NLJ7RT61SV".to_string()),
        amount: (result_code == 0).then_some(10.0),
        phone_number: (result_code == 0).then(|| "254712345678".to_string()),
    }
}

#[tokio::test]
async fn seeded_catalog_is_available() {
    let storage = storage().await;

    assert!(!storage.list_schools().await.unwrap().is_empty());
    let course = storage.get_course(COURSE).await.unwrap().expect("seeded course");
    assert_eq!(course.code, "AGEC 101");
    assert_eq!(course.department_id, "dept-agricultural-economics");
    assert!(storage.get_course("course-missing").await.unwrap().is_none());
}

#[tokio::test]
async fn public_filter_only_sees_approved_papers() {
    let storage = storage().await;
    let uploader = user(&storage, "alice").await;
    paper(&storage, uploader, "Farm Economics", 1, PaperStatus::Approved).await;
    paper(&storage, uploader, "Pending Paper", 1, PaperStatus::Pending).await;
    paper(&storage, uploader, "Rejected Paper", 2, PaperStatus::Rejected).await;

    let public = PaperFilter {
        status: Some(PaperStatus::Approved),
        ..Default::default()
    };
    let page = storage.list_papers(&public, 1, 20).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].paper.title, "Farm Economics");
    assert_eq!(page.items[0].course.id, COURSE);

    let everything = storage
        .list_papers(&PaperFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(everything.pagination.total, 3);
}

#[tokio::test]
async fn search_matches_title_and_course_code() {
    let storage = storage().await;
    let uploader = user(&storage, "bob").await;
    paper(&storage, uploader, "Marketing Basics", 3, PaperStatus::Approved).await;

    let by_title = PaperFilter {
        search: Some("Marketing".to_string()),
        ..Default::default()
    };
    assert_eq!(storage.list_papers(&by_title, 1, 20).await.unwrap().items.len(), 1);

    let by_code = PaperFilter {
        search: Some("AGEC".to_string()),
        ..Default::default()
    };
    assert_eq!(storage.list_papers(&by_code, 1, 20).await.unwrap().items.len(), 1);

    let miss = PaperFilter {
        search: Some("Quantum".to_string()),
        ..Default::default()
    };
    assert!(storage.list_papers(&miss, 1, 20).await.unwrap().items.is_empty());
}

#[tokio::test]
async fn approved_papers_group_into_four_years() {
    let storage = storage().await;
    let uploader = user(&storage, "carol").await;
    paper(&storage, uploader, "First", 1, PaperStatus::Approved).await;
    paper(&storage, uploader, "Second", 1, PaperStatus::Approved).await;
    paper(&storage, uploader, "Third", 1, PaperStatus::Approved).await;
    paper(&storage, uploader, "Fourth", 4, PaperStatus::Approved).await;

    let mut years = Vec::new();
    for year in PapersByYearResponse::YEARS {
        let filter = PaperFilter {
            status: Some(PaperStatus::Approved),
            year: Some(year),
            ..Default::default()
        };
        let page = storage.list_papers(&filter, 1, 2).await.unwrap();
        years.push(YearBucket::from_page(year, page));
    }
    let grouped = PapersByYearResponse::from_buckets(years);

    assert_eq!(grouped.total, 4);
    let counts: Vec<i64> = grouped.years.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![3, 0, 0, 1]);
    // 每组只返回一页
    assert_eq!(grouped.years[0].papers.len(), 2);
    assert!(grouped.years[0].has_more);
    assert!(!grouped.years[3].has_more);
}

#[tokio::test]
async fn paper_rows_carry_course_names_without_text() {
    let storage = storage().await;
    let uploader = user(&storage, "cora").await;
    let id = paper(&storage, uploader, "Farm Records", 2, PaperStatus::Approved).await;
    storage
        .set_paper_text(
            id,
            &PaperText {
                text: "Question 1: define opportunity cost.".to_string(),
                truncated: false,
            },
        )
        .await
        .unwrap();

    let found = storage.get_paper(id).await.unwrap().unwrap();
    assert_eq!(found.course.id, COURSE);
    assert!(!found.course.department_name.is_empty());
    assert!(!found.course.school_name.is_empty());

    let page = storage
        .list_papers(&PaperFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(page.items[0].course.code, found.course.code);
    assert_eq!(
        storage.get_paper_text(id).await.unwrap().map(|t| t.text).as_deref(),
        Some("Question 1: define opportunity cost.")
    );
}

#[tokio::test]
async fn review_records_reviewer_and_rejects_pending_outcome() {
    let storage = storage().await;
    let uploader = user(&storage, "dave").await;
    let reviewer = user(&storage, "erin").await;
    let id = paper(&storage, uploader, "Policy", 4, PaperStatus::Pending).await;

    let reviewed = storage
        .review_paper(id, PaperStatus::Approved, reviewer, Some("Looks good".to_string()))
        .await
        .unwrap()
        .expect("paper exists");
    assert_eq!(reviewed.status, PaperStatus::Approved);
    assert_eq!(reviewed.reviewed_by, Some(reviewer));
    assert!(reviewed.reviewed_at.is_some());
    assert_eq!(reviewed.review_notes.as_deref(), Some("Looks good"));

    assert!(
        storage
            .review_paper(id, PaperStatus::Pending, reviewer, None)
            .await
            .is_err()
    );
    assert!(
        storage
            .review_paper(9999, PaperStatus::Rejected, reviewer, None)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn download_count_and_extracted_text_persist() {
    let storage = storage().await;
    let uploader = user(&storage, "frank").await;
    let id = paper(&storage, uploader, "Genetics", 3, PaperStatus::Approved).await;

    assert!(storage.increment_download_count(id).await.unwrap());
    assert!(storage.increment_download_count(id).await.unwrap());
    let loaded = storage.get_paper(id).await.unwrap().expect("paper exists");
    assert_eq!(loaded.paper.download_count, 2);

    assert!(storage.get_paper_text(id).await.unwrap().is_none());
    let text = PaperText {
        text: "Question 1".to_string(),
        truncated: true,
    };
    assert!(storage.set_paper_text(id, &text).await.unwrap());
    // 截断标记随文本一起保存
    assert_eq!(storage.get_paper_text(id).await.unwrap(), Some(text));

    assert!(storage.delete_paper(id).await.unwrap());
    assert!(storage.get_paper(id).await.unwrap().is_none());
    assert!(!storage.delete_paper(id).await.unwrap());
}

#[tokio::test]
async fn callback_settles_payment_only_once() {
    let storage = storage().await;
    let payer = user(&storage, "grace").await;
    let payment_id = pending_payment(&storage, payer, "ws_CO_001").await;

    match storage
        .settle_payment_from_callback(&outcome("ws_CO_001", 0))
        .await
        .unwrap()
    {
        CallbackSettlement::Settled(payment) => {
            assert_eq!(payment.id, payment_id);
            assert_eq!(payment.status, PaymentStatus::Completed);
            assert_eq!(payment.transaction_id.as_deref(), Some("NLJ7RT61SV"));
        }
        other => panic!("unexpected settlement: {other:?}"),
    }

    // 重复回调（即使结果不同）不会改变已结算的支付
    match storage
        .settle_payment_from_callback(&outcome("ws_CO_001", 1032))
        .await
        .unwrap()
    {
        CallbackSettlement::AlreadySettled(payment) => {
            assert_eq!(payment.status, PaymentStatus::Completed);
        }
        other => panic!("unexpected settlement: {other:?}"),
    }

    let transaction = storage
        .get_transaction_by_payment(&payment_id)
        .await
        .unwrap()
        .expect("transaction exists");
    assert_eq!(transaction.checkout_request_id, "ws_CO_001");
    // 重放的失败回调不覆盖已记录的成功结果
    assert_eq!(transaction.result_code, Some(0));
    assert_eq!(
        transaction.mpesa_receipt_number.as_deref(),
        Some("NLJ7RT61SV")
    );

    assert!(matches!(
        storage
            .settle_payment_from_callback(&outcome("ws_CO_unknown", 0))
            .await
            .unwrap(),
        CallbackSettlement::UnknownCheckout
    ));
}

#[tokio::test]
async fn failed_callback_marks_payment_failed() {
    let storage = storage().await;
    let payer = user(&storage, "heidi").await;
    let payment_id = pending_payment(&storage, payer, "ws_CO_002").await;

    let settlement = storage
        .settle_payment_from_callback(&outcome("ws_CO_002", 1032))
        .await
        .unwrap();
    assert!(matches!(settlement, CallbackSettlement::Settled(_)));

    let payment = storage.get_payment(&payment_id).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert!(payment.transaction_id.is_none());
    assert!(
        storage
            .find_active_access(payer, Utc::now().timestamp())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn completed_payment_grants_access_until_expiry() {
    let storage = storage().await;
    let payer = user(&storage, "ivan").await;
    let other = user(&storage, "judy").await;
    pending_payment(&storage, payer, "ws_CO_003").await;

    let now = Utc::now().timestamp();
    assert!(storage.find_active_access(payer, now).await.unwrap().is_none());

    storage
        .settle_payment_from_callback(&outcome("ws_CO_003", 0))
        .await
        .unwrap();

    let access = storage
        .find_active_access(payer, now)
        .await
        .unwrap()
        .expect("active access");
    assert!(access.expires_at.timestamp() > now);
    assert!(storage.find_active_access(other, now).await.unwrap().is_none());

    let after_expiry = access.expires_at.timestamp() + 1;
    assert!(
        storage
            .find_active_access(payer, after_expiry)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn stale_pending_payments_are_cancelled() {
    let storage = storage().await;
    let payer = user(&storage, "mallory").await;
    let stale = pending_payment(&storage, payer, "ws_CO_004").await;

    // cutoff 早于创建时间时不应取消
    let cancelled = storage
        .cancel_stale_payments(Utc::now().timestamp() - 600)
        .await
        .unwrap();
    assert_eq!(cancelled, 0);

    let cancelled = storage
        .cancel_stale_payments(Utc::now().timestamp() + 1)
        .await
        .unwrap();
    assert_eq!(cancelled, 1);
    let payment = storage.get_payment(&stale).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Cancelled);

    // 迟到的成功回调仍然结算被取消的支付
    match storage
        .settle_payment_from_callback(&outcome("ws_CO_004", 0))
        .await
        .unwrap()
    {
        CallbackSettlement::Settled(payment) => {
            assert_eq!(payment.status, PaymentStatus::Completed);
            assert_eq!(payment.transaction_id.as_deref(), Some("NLJ7RT61SV"));
        }
        other => panic!("unexpected settlement: {other:?}"),
    }
    assert!(
        !storage
            .update_pending_payment_status(&stale, PaymentStatus::Failed)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn failed_callback_leaves_cancelled_payment_alone() {
    let storage = storage().await;
    let payer = user(&storage, "niaj").await;
    let stale = pending_payment(&storage, payer, "ws_CO_005").await;
    storage
        .cancel_stale_payments(Utc::now().timestamp() + 1)
        .await
        .unwrap();

    match storage
        .settle_payment_from_callback(&outcome("ws_CO_005", 1032))
        .await
        .unwrap()
    {
        CallbackSettlement::AlreadySettled(payment) => {
            assert_eq!(payment.status, PaymentStatus::Cancelled);
        }
        other => panic!("unexpected settlement: {other:?}"),
    }

    // 交易此前没有结果，失败结果仍会被记录
    let transaction = storage
        .get_transaction_by_payment(&stale)
        .await
        .unwrap()
        .expect("transaction exists");
    assert_eq!(transaction.result_code, Some(1032));
}

#[tokio::test]
async fn renewals_count_as_one_active_subscription() {
    let storage = storage().await;
    let renewer = user(&storage, "olivia").await;
    let other = user(&storage, "peggy").await;
    pending_payment(&storage, renewer, "ws_CO_006").await;
    pending_payment(&storage, renewer, "ws_CO_007").await;
    pending_payment(&storage, other, "ws_CO_008").await;
    for checkout in ["ws_CO_006", "ws_CO_007", "ws_CO_008"] {
        storage
            .settle_payment_from_callback(&outcome(checkout, 0))
            .await
            .unwrap();
    }

    let stats = storage.admin_stats(Utc::now().timestamp()).await.unwrap();
    assert_eq!(stats.completed_payments, 3);
    assert_eq!(stats.active_subscriptions, 2);
    assert_eq!(stats.total_revenue, 30.0);
}
