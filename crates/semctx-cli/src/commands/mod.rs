pub mod compose;
pub mod context;
pub mod lint;
pub mod publish;
