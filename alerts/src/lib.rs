pub mod book;
pub mod model;
pub mod repository;
