mod core;
mod projects;
mod repository;

pub use self::core::GitLabClient;
