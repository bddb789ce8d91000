pub mod store;
pub use store::{AppStore, Store};
