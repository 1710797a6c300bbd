//! Points API Service
//!
//! An HTTP service for point upsert and semantic search over a Qdrant-backed
//! vector collection.
//!
//! ```text
//! Client
//!   ↓ (HTTP/JSON)
//! handlers (domain layer routing)
//!   ↓
//! PointService (orchestration)
//!   ↓
//! ┌─────────────┬──────────────┬──────────────────┐
//! │ QdrantStore │   Embedder   │ KeywordExtractor │
//! └─────────────┴──────────────┴──────────────────┘
//!   ↓                 ↓                ↓
//! Qdrant         OpenAI API       OpenAI API
//! ```
//!
//! ## Modules
//!
//! - `server`: Server initialization and lifecycle

pub mod server;

pub use server::run;
