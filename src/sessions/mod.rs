pub mod cookie;
pub mod manager;
#[cfg(test)]
pub mod memory;
pub mod session;
pub mod store;

pub use manager::{spawn_gc, SessionManager};
pub use session::Session;
pub use store::{PgSessionStore, SessionStore};
