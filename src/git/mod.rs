pub mod fetch;
pub mod mock;
