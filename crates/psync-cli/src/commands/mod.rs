pub mod dispatch;
pub mod goals;
pub mod history;
pub mod retry;
pub mod schema;
pub mod shared;
pub mod sync;
pub mod variants;
