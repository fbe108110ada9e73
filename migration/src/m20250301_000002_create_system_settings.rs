use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemSettings::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemSettings::Value).text().not_null())
                    .col(
                        ColumnDef::new(SystemSettings::ValueType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SystemSettings::Description).text().null())
                    .col(
                        ColumnDef::new(SystemSettings::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::UpdatedBy)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 默认配置
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let default_settings = [
            ("app.system_name", "Rongo University Past Papers", "string", "System name"),
            ("payment.amount", "10", "integer", "Access fee charged per payment"),
            ("payment.currency", "KES", "string", "Access fee currency"),
            (
                "access.period_days",
                "365",
                "integer",
                "Days of access granted by a completed payment",
            ),
            (
                "upload.max_size",
                "20971520",
                "integer",
                "Maximum upload size in bytes",
            ),
            (
                "upload.allowed_types",
                r#"[".pdf"]"#,
                "json_array",
                "Allowed upload extensions",
            ),
            (
                "ai.max_context_chars",
                "30000",
                "integer",
                "Paper characters sent to the assistant",
            ),
        ];

        for (key, value, value_type, description) in default_settings {
            let insert = Query::insert()
                .into_table(SystemSettings::Table)
                .columns([
                    SystemSettings::Key,
                    SystemSettings::Value,
                    SystemSettings::ValueType,
                    SystemSettings::Description,
                    SystemSettings::UpdatedAt,
                ])
                .values_panic([
                    key.into(),
                    value.into(),
                    value_type.into(),
                    description.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum SystemSettings {
    #[sea_orm(iden = "system_settings")]
    Table,
    Key,
    Value,
    ValueType,
    Description,
    UpdatedAt,
    UpdatedBy,
}
