//! Curve Analysis Library
//!
//! Hand over a single-variable real function as text and get back, over a
//! viewing window, descriptive statistics of its samples, roots, local
//! extrema, inflection points, its symbolic derivative, the signed area under
//! the curve and the arc length.
//!
//! # Features
//! - Restricted formula grammar: `x`, `pi`, `e`, `sin cos tan log exp sqrt abs`,
//!   `+ - * / **` (`^` as alias) and parentheses. Nothing else is accepted and
//!   nothing is ever executed as code.
//! - Checked evaluation: undefined points are reported, never NaN
//! - Symbolic differentiation on the parsed AST, printed in canonical form
//! - Bisection root finding, adaptive Gauss-Kronrod quadrature
//! - Every result field fails on its own; one bad field never hides the rest
//! - **Builder pattern API** for analysis settings
//! - Parallel per-function analysis with the `parallel` feature (default)
//!
//! # Usage Examples
//!
//! ## One-shot helpers
//! ```
//! use graph_anafis::{differentiate, evaluate};
//!
//! assert_eq!(evaluate("x**2 + 1", 3.0), Some(10.0));
//! assert_eq!(evaluate("log(x)", -1.0), None);
//! assert_eq!(differentiate("sin(x**2)").unwrap(), "2*x*cos(x**2)");
//! ```
//!
//! ## Full analysis
//! ```
//! use graph_anafis::{Analyzer, Domain, FunctionEntry, FunctionRegistry};
//!
//! let mut registry = FunctionRegistry::new();
//! registry.add(FunctionEntry::new("parabola", "x**2", "blue"));
//! registry.add(FunctionEntry::new("broken", "x +* 1", "red"));
//!
//! let domain = Domain::new(-10.0, -10.0, 10.0, 10.0).unwrap();
//! let results = Analyzer::new().analyze(&registry, &domain).unwrap();
//!
//! assert!(!results.contains_key("broken"));
//! let parabola = &results["parabola"];
//! assert_eq!(parabola.derivative.as_deref(), Ok("2*x"));
//! assert!((parabola.area_under_curve.clone().unwrap() - 666.6667).abs() < 1e-3);
//! ```

mod ast;
mod builder;
mod cancellation;
mod differentiation;
mod display;
mod error;
pub mod functions;
mod parser;
mod registry;
mod simplification;

pub mod analysis;
mod evaluator;

#[cfg(feature = "parallel")]
mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use analysis::{
    AnalysisResult, Extremum, ExtremumKind, Outcome, Point, QuadratureConfig, Statistics,
};
pub use ast::{Constant, Expr, ExprKind};
pub use builder::{Analyzer, DEFAULT_RESOLUTION};
pub use cancellation::CancellationToken;
pub use differentiation::{Derivatives, differentiate};
pub use error::{AnalysisError, EvalError, ParseError, Span, Unavailable};
pub use evaluator::{CompiledFormula, Formula, evaluate};
pub use functions::Function;
pub use parser::{DEFAULT_MAX_DEPTH, ParseOptions, parse, parse_with};
pub use registry::{Domain, FunctionEntry, FunctionRegistry};
