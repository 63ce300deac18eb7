//! A layered to-do backend: entity and errors in [`core`], the repository
//! contract and its implementations in [`storage`], one object per
//! operation in [`use_cases`], and the axum surface in [`adapters`].

pub mod adapters;
pub mod config;
pub mod context;
pub mod core;
pub mod storage;
pub mod use_cases;

#[cfg(test)]
mod tests;
