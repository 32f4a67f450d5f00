mod client;
mod enrichers;
mod provider;
mod types;

pub use provider::GitLabProvider;
