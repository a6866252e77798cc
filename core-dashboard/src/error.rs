use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Dashboard fetch failed: {0}")]
    Fetch(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
