use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 学院表
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schools::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Schools::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Schools::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 系表
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::SchoolId).string().not_null())
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(
                        ColumnDef::new(Departments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Departments::Table, Departments::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_departments_school_name")
                    .table(Departments::Table)
                    .col(Departments::SchoolId)
                    .col(Departments::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::DepartmentId).string().not_null())
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 上传文件表
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::DownloadToken)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Files::OriginalName).string().not_null())
                    .col(ColumnDef::new(Files::StoredName).string().not_null())
                    .col(ColumnDef::new(Files::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Files::FileType).string().not_null())
                    .col(ColumnDef::new(Files::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Files::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Files::Table, Files::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 试卷表
        manager
            .create_table(
                Table::create()
                    .table(Papers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Papers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Papers::Title).string().not_null())
                    .col(ColumnDef::new(Papers::CourseId).string().not_null())
                    .col(ColumnDef::new(Papers::Year).integer().not_null())
                    .col(ColumnDef::new(Papers::ExamType).string().not_null())
                    .col(ColumnDef::new(Papers::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Papers::Semester).integer().not_null())
                    .col(ColumnDef::new(Papers::FileToken).string().not_null())
                    .col(ColumnDef::new(Papers::FileName).string().not_null())
                    .col(
                        ColumnDef::new(Papers::DownloadCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Papers::Status).string().not_null())
                    .col(ColumnDef::new(Papers::UploadedBy).big_integer().not_null())
                    .col(ColumnDef::new(Papers::ReviewedBy).big_integer().null())
                    .col(ColumnDef::new(Papers::ReviewedAt).big_integer().null())
                    .col(ColumnDef::new(Papers::ReviewNotes).text().null())
                    .col(ColumnDef::new(Papers::ExtractedText).text().null())
                    .col(
                        ColumnDef::new(Papers::TextTruncated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Papers::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Papers::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Papers::Table, Papers::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Papers::Table, Papers::FileToken)
                            .to(Files::Table, Files::DownloadToken)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Papers::Table, Papers::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_papers_course_id", Papers::CourseId),
            ("idx_papers_status", Papers::Status),
            ("idx_papers_year", Papers::Year),
            ("idx_papers_uploaded_by", Papers::UploadedBy),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Papers::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        // 付费记录表
        manager
            .create_table(
                Table::create()
                    .table(UserPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserPayments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserPayments::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(UserPayments::Amount).double().not_null())
                    .col(ColumnDef::new(UserPayments::Currency).string().not_null())
                    .col(
                        ColumnDef::new(UserPayments::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserPayments::Status).string().not_null())
                    .col(ColumnDef::new(UserPayments::TransactionId).string().null())
                    .col(
                        ColumnDef::new(UserPayments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserPayments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserPayments::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserPayments::Table, UserPayments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_payments_user_status")
                    .table(UserPayments::Table)
                    .col(UserPayments::UserId)
                    .col(UserPayments::Status)
                    .to_owned(),
            )
            .await?;

        // M-Pesa 交易表
        manager
            .create_table(
                Table::create()
                    .table(MpesaTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MpesaTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MpesaTransactions::PaymentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MpesaTransactions::MerchantRequestId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MpesaTransactions::CheckoutRequestId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MpesaTransactions::PhoneNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MpesaTransactions::Amount).double().not_null())
                    .col(ColumnDef::new(MpesaTransactions::ResultCode).integer().null())
                    .col(ColumnDef::new(MpesaTransactions::ResultDesc).text().null())
                    .col(
                        ColumnDef::new(MpesaTransactions::MpesaReceiptNumber)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MpesaTransactions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MpesaTransactions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MpesaTransactions::Table, MpesaTransactions::PaymentId)
                            .to(UserPayments::Table, UserPayments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MpesaTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Papers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    AvatarUrl,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Schools {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Departments {
    Table,
    Id,
    SchoolId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Courses {
    Table,
    Id,
    DepartmentId,
    Code,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Files {
    Table,
    DownloadToken,
    OriginalName,
    StoredName,
    FileSize,
    FileType,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Papers {
    Table,
    Id,
    Title,
    CourseId,
    Year,
    ExamType,
    AcademicYear,
    Semester,
    FileToken,
    FileName,
    DownloadCount,
    Status,
    UploadedBy,
    ReviewedBy,
    ReviewedAt,
    ReviewNotes,
    ExtractedText,
    TextTruncated,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserPayments {
    Table,
    Id,
    UserId,
    PhoneNumber,
    Amount,
    Currency,
    PaymentMethod,
    Status,
    TransactionId,
    CreatedAt,
    UpdatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum MpesaTransactions {
    Table,
    Id,
    PaymentId,
    MerchantRequestId,
    CheckoutRequestId,
    PhoneNumber,
    Amount,
    ResultCode,
    ResultDesc,
    MpesaReceiptNumber,
    CreatedAt,
    UpdatedAt,
}
