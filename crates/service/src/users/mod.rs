//! Users module: three-layer architecture (entity, repository, service).

pub mod entity;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use entity::User;
pub use errors::UserError;
pub use repository::UserRepository;
pub use service::UserService;
