//! # build-advisor
//!
//! Budget-driven PC build assembly with post-hoc compatibility validation
//! and retrieval reranking. External collaborators (candidate search,
//! relevance scoring, price scraping) stay behind narrow interfaces; the
//! core owns budget allocation, compatibility rules, rerank ordering, and
//! the assembly state machine.
//!
//! ## Assembly pipeline
//!
//! ```text
//!        ┌──────────────────────┐
//!        │ archetype + budget   │
//!        └──────────┬───────────┘
//!                   ▼
//!        ┌──────────────────────┐
//!        │ Planning             │  share table → per-category
//!        │ (BudgetAllocator)    │  price bands (±10%)
//!        └──────────┬───────────┘
//!                   ▼
//!        ┌──────────────────────┐
//!        │ Searching            │  one task per category,
//!        │ (CandidateSearcher)  │  bounded fan-out; empty or
//!        └──────────┬───────────┘  failed search → unfilled
//!                   ▼
//!        ┌──────────────────────┐
//!        │ Validating           │  socket, memory, form-factor
//!        │ (CompatibilityRules) │  rules; pass / fail / skipped
//!        └──────────┬───────────┘
//!                   ▼
//!        ┌──────────────────────┐
//!        │ Complete │ Incomplete│  partial build + report is
//!        └──────────────────────┘  always returned
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration: share tables, band
//!   tolerance, collaborator endpoints, fan-out bounds
//! - [`error`] - Domain error taxonomy (configuration vs retrieval)
//! - [`models`] - Shared data types: archetypes, plans, candidates, builds,
//!   reports, request/response types
//! - [`budget`] - Pure budget allocation into per-category price bands
//! - [`compat`] - Tri-state pairwise compatibility rules
//! - [`rerank`] - Judge-score and cross-encoder reranking strategies
//! - [`search`] - Candidate search collaborator interface + HTTP catalog client
//! - [`pricing`] - Multi-source price record normalization and best offers
//! - [`assemble`] - Assembly state machine with bounded concurrent fan-out
//! - [`api`] - Axum HTTP handlers exposing the core operations
//! - [`state`] - Shared application state

pub mod api;
pub mod assemble;
pub mod budget;
pub mod compat;
pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod rerank;
pub mod search;
pub mod state;
