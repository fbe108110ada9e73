//! STK push 交易实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mpesa_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub payment_id: String,
    pub merchant_request_id: String,
    #[sea_orm(unique)]
    pub checkout_request_id: String,
    pub phone_number: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub result_code: Option<i32>,
    pub result_desc: Option<String>,
    pub mpesa_receipt_number: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_payments::Entity",
        from = "Column::PaymentId",
        to = "super::user_payments::Column::Id"
    )]
    Payment,
}

impl Related<super::user_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_transaction(self) -> crate::models::payments::entities::MpesaTransaction {
        crate::models::payments::entities::MpesaTransaction {
            id: self.id,
            payment_id: self.payment_id,
            merchant_request_id: self.merchant_request_id,
            checkout_request_id: self.checkout_request_id,
            phone_number: self.phone_number,
            amount: self.amount,
            result_code: self.result_code,
            result_desc: self.result_desc,
            mpesa_receipt_number: self.mpesa_receipt_number,
            created_at: super::from_unix(self.created_at),
            updated_at: super::from_unix(self.updated_at),
        }
    }
}
