pub mod document_repository;
pub mod user_repository;
