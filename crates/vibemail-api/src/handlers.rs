//! API request handlers

pub mod accounts;
pub mod assistant;
pub mod campaigns;
pub mod dashboard;
pub mod engine;
pub mod health;
pub mod unibox;

pub use health::*;

use serde::Serialize;

/// List response envelope
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}
