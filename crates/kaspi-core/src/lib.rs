//! Core library for Kaspi Bank statement extraction.
//!
//! This crate provides:
//! - Text normalization of per-page PDF text
//! - Bilingual (Russian/Kazakh) field and transaction rules
//! - Statement assembly into a typed [`StatementRecord`]
//! - PDF text-layer extraction (feature `pdf`)

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod statement;

pub use error::{ExtractionError, KaspiError, Result};
pub use models::statement::{
    StatementRecord, TransactionKind, TransactionRecord, FINANCIAL_INSTITUTION,
};
pub use statement::{StatementExtractor, StatementParser};

#[cfg(feature = "pdf")]
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
