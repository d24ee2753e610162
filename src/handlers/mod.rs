pub mod health;
pub mod list;
pub mod get;
pub mod create;
pub mod update;
pub mod delete;
pub mod info;
pub mod fallback;

pub use health::health_handler;
pub use list::list_handler;
pub use get::get_handler;
pub use create::create_handler;
pub use update::update_handler;
pub use delete::delete_handler;
pub use info::info_handler;
pub use fallback::unknown_endpoint;
