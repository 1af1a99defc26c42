//! # Report Forge
//!
//! A template-to-report generation service: upload a document template
//! (DOCX or PDF), then generate a report that combines the template's text
//! with caller-supplied data via an external LLM.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌───────────┐
//! │  Upload  │──▶│ Extract │──▶│  Template │
//! │ DOCX/PDF │   │  text   │   │   Store   │
//! └──────────┘   └─────────┘   └─────┬─────┘
//!                                    │
//!                ┌────────┐   ┌──────▼─────┐   ┌────────┐
//!                │  LLM   │◀──│  Generate  │──▶│ Render │
//!                │ (API)  │──▶│   report   │   │DOCX/PDF│
//!                └────────┘   └────────────┘   └────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! reportforge serve
//! curl -F template=@invoice.docx http://127.0.0.1:3001/api/upload-template
//! curl -X POST http://127.0.0.1:3001/api/generate-report \
//!   -H 'Content-Type: application/json' \
//!   -d '{"templateId":"<id>","data":"{\"client\":\"Acme\"}"}' \
//!   -o generated_report.docx
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Template record and source-format variants |
//! | [`store`] | Template store trait + in-memory backend |
//! | [`extract`] | DOCX/PDF text extraction |
//! | [`prompt`] | Prompt construction |
//! | [`generate`] | Text-generation provider abstraction |
//! | [`render`] | Output document serialization |
//! | [`server`] | HTTP API |

pub mod config;
pub mod extract;
pub mod generate;
pub mod models;
pub mod prompt;
pub mod render;
pub mod server;
pub mod store;
