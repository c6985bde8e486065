pub mod handlers;
pub mod publish;
pub mod repo;
pub mod toc;
