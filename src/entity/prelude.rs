//! 预导入模块，方便使用

pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::departments::{
    ActiveModel as DepartmentActiveModel, Entity as Departments, Model as DepartmentModel,
};
pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::mpesa_transactions::{
    ActiveModel as MpesaTransactionActiveModel, Entity as MpesaTransactions,
    Model as MpesaTransactionModel,
};
pub use super::papers::{ActiveModel as PaperActiveModel, Entity as Papers, Model as PaperModel};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::system_settings::{
    ActiveModel as SystemSettingActiveModel, Entity as SystemSettings, Model as SystemSettingModel,
};
pub use super::user_payments::{
    ActiveModel as UserPaymentActiveModel, Entity as UserPayments, Model as UserPaymentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
