//! 访问费支付实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: i64,
    pub phone_number: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub expires_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::mpesa_transactions::Entity")]
    MpesaTransactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::mpesa_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MpesaTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::entities::Payment {
        use crate::models::payments::entities::{Payment, PaymentStatus};

        Payment {
            id: self.id,
            user_id: self.user_id,
            phone_number: self.phone_number,
            amount: self.amount,
            currency: self.currency,
            payment_method: self.payment_method,
            status: self
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Pending),
            transaction_id: self.transaction_id,
            created_at: super::from_unix(self.created_at),
            updated_at: super::from_unix(self.updated_at),
            expires_at: super::from_unix(self.expires_at),
        }
    }
}
