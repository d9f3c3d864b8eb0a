//! SQL safety gate.
//!
//! Static screening of AI-generated SQL ahead of execution. Lexical only:
//! comment stripping, keyword scanning, and pattern matching — deliberately
//! not a SQL parser. Callers wanting stronger guarantees must also run the
//! query under a read-only database role as defense-in-depth.

pub mod complexity;
pub mod gate;

pub use complexity::{ComplexityReport, ComplexityWarning};
pub use gate::{PatternId, RejectReason, SafetyGate, Verdict, normalize};
