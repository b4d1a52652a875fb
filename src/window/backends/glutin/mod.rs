mod types;
pub mod visitor;
