//! # fincalc_core - Financial Calculator Engine
//!
//! `fincalc_core` is a library of independent financial calculators: mortgage
//! points, BRRRR real-estate deals, rate locks, depreciation schedules,
//! renters insurance, triple net leases, USDA loans and a personal
//! "financial harmony" score. All inputs and outputs are JSON-serializable
//! so they can cross a UI or API boundary unchanged.
//!
//! ## Design Philosophy
//!
//! - **Declared inputs**: every calculator publishes a [`CalculatorDescriptor`]
//!   describing its fields, bounds, outputs and worked examples
//! - **Validate, then calculate**: blocking errors return
//!   [`CalcError::ValidationFailed`]; warnings never block
//! - **Pure formulas**: numeric results depend only on the inputs and the
//!   constant tables in each module
//! - **Narrative kept apart**: presentation strings are rendered from the
//!   numeric result with a configurable [`NumberFormat`]
//!
//! ## Quick Start
//!
//! ```rust
//! use fincalc_core::calculators::brrrr::{calculate, narrative, BrrrrInput};
//! use fincalc_core::NumberFormat;
//!
//! let input = BrrrrInput {
//!     purchase_price: 150_000.0,
//!     down_payment: 30_000.0,
//!     rehab_cost: 25_000.0,
//!     closing_costs: 8_000.0,
//!     ..BrrrrInput::default()
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.total_investment, 63_000.0);
//!
//! let text = narrative(&result, &NumberFormat::default());
//! println!("{}: {}", text.deal_rating, text.recommendation);
//! ```
//!
//! ## Record API
//!
//! Hosts that only see flat JSON records go through the registry:
//!
//! ```rust
//! use fincalc_core::{CalculatorRegistry, InputRecord, Settings};
//!
//! let registry = CalculatorRegistry::builtin(&Settings::default()).unwrap();
//! let record = InputRecord::from_json_str(
//!     r#"{"loanAmount": 300000, "baseInterestRate": 6.75, "discountPoints": 2}"#,
//! ).unwrap();
//!
//! let outputs = registry.calculate("mortgage-points", &record).unwrap();
//! println!("{}", serde_json::to_string_pretty(&outputs).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`calculators`] - The calculators and the calculator traits
//! - [`registry`] - Explicitly constructed calculator registry
//! - [`schema`] - Input/output field declarations and descriptors
//! - [`record`] - Flat input records
//! - [`validation`] - Schema checks and validation results
//! - [`finance`] - Amortization, return ratios and scoring helpers
//! - [`format`] - Currency, percentage and duration formatting
//! - [`settings`] - TOML settings
//! - [`units`] - Percentage and period wrappers
//! - [`errors`] - Structured error types

pub mod calculators;
pub mod errors;
pub mod finance;
pub mod format;
pub mod record;
pub mod registry;
pub mod schema;
pub mod settings;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculators::{Calculator, CalculatorOutputs, TypedCalculator};
pub use errors::{CalcError, CalcResult};
pub use finance::Horizon;
pub use format::NumberFormat;
pub use record::InputRecord;
pub use registry::CalculatorRegistry;
pub use schema::{CalculatorDescriptor, Category, FieldType, InputField, OutputField};
pub use settings::Settings;
pub use validation::{ValidationIssue, ValidationResult};
