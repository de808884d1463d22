pub mod history;
pub mod serialization;
pub mod session;
