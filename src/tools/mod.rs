pub mod dispatch;
pub mod reviews;

pub use dispatch::Dispatcher;
pub use reviews::fetch_reviews;
