//! Data layer: frame model, loading, cleaning, projection and export.
//!
//! Architecture:
//! ```text
//!  .csv / .xlsx bytes
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  detect format, parse → TabularFrame
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ cleaning  │  drop duplicates, fill numeric gaps with the mean
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  select   │  keep the chosen columns
//!   └──────────┘
//!        │
//!        ├──────────▶ preview (head, chart series)
//!        ▼
//!   ┌──────────┐
//!   │  export   │  TabularFrame → CSV / XLSX bytes
//!   └──────────┘
//! ```
//!
//! `pipeline` strings these together per file; `template` is the separate
//! one-row CSV generator.

pub mod cleaning;
pub mod export;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod preview;
pub mod select;
pub mod template;
