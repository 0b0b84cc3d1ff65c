//! Report output.

pub mod du;

pub use du::write_du_report;
