pub mod auth;

pub mod users;

pub mod catalog;

pub mod papers;

pub mod payments;

pub mod chat;

pub mod files;

pub mod system;

pub mod frontend;

pub use auth::configure_auth_routes;
pub use catalog::configure_catalog_routes;
pub use chat::configure_chat_routes;
pub use files::configure_file_routes;
pub use frontend::configure_frontend_routes;
pub use papers::configure_paper_routes;
pub use payments::configure_payment_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
