//! Core business logic for Madrasah.
//!
//! This crate contains the fee billing and Quran tracking logic with ZERO
//! database dependencies. Persistence is reached through the repository
//! traits defined here and implemented by the db crate.
//!
//! # Modules
//!
//! - `numbering` - Human-readable identifier sequences (`STU-25-001`, `INV-2025-T1-0001`)
//! - `invoice` - Per-guardian fee invoice generation and totals
//! - `quran` - Memorization tracking metrics and the Quran content API client
//! - `clock` - Time source used by the generators

pub mod clock;
pub mod invoice;
pub mod numbering;
pub mod quran;
