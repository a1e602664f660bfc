//! Use-case services over record stores.

pub mod record_service;
