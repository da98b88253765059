//! Core domain types and logic.

pub mod resolution;
pub mod normalization;
pub mod subscription;
pub mod subscription_manager;
pub mod forex;
pub mod data;
pub mod tabular;
pub mod cash;
pub mod cash_book;
pub mod currency_feed;
pub mod security;
pub mod exchange_hours;
pub mod engine_config;
pub mod setup;
pub mod packet;
pub mod replay;
pub mod error;
