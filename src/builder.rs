//! Builder pattern API for curve analysis
//!
//! Provides a fluent interface for configuring and running an analysis over a
//! registry of functions.
//!
//! # Example
//! ```
//! use graph_anafis::{Analyzer, Domain, FunctionEntry, FunctionRegistry};
//!
//! let mut registry = FunctionRegistry::new();
//! registry.add(FunctionEntry::new("f", "x**2 - 1", "red"));
//!
//! let domain = Domain::new(-5.0, -5.0, 5.0, 5.0).unwrap();
//! let results = Analyzer::new().resolution(2_000).analyze(&registry, &domain).unwrap();
//!
//! let f = &results["f"];
//! assert_eq!(f.roots, Ok(vec![-1.0, 1.0]));
//! assert_eq!(f.derivative.as_deref(), Ok("2*x"));
//! ```

use std::collections::BTreeMap;

use crate::analysis::{self, AnalysisResult, DEFAULT_TOLERANCE, QuadratureConfig};
use crate::parser::ParseOptions;
use crate::registry::{Domain, FunctionEntry, FunctionRegistry};
use crate::{AnalysisError, CancellationToken};

/// Default number of samples per function
pub const DEFAULT_RESOLUTION: usize = 10_000;

/// Builder for analysis runs
#[derive(Debug, Clone)]
pub struct Analyzer {
    pub(crate) resolution: usize,
    pub(crate) tolerance: f64,
    pub(crate) quadrature: QuadratureConfig,
    pub(crate) parse_options: ParseOptions,
    pub(crate) cancel: CancellationToken,
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer {
            resolution: DEFAULT_RESOLUTION,
            tolerance: DEFAULT_TOLERANCE,
            quadrature: QuadratureConfig::default(),
            parse_options: ParseOptions::default(),
            cancel: CancellationToken::new(),
        }
    }
}

impl Analyzer {
    /// Create a new analyzer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of evenly spaced samples over `[x_min, x_max]` (at least 2)
    pub fn resolution(mut self, samples: usize) -> Self {
        self.resolution = samples;
        self
    }

    /// Bracket width at which root and inflection bisection stops
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn quadrature(mut self, config: QuadratureConfig) -> Self {
        self.quadrature = config;
        self
    }

    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set maximum AST depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.parse_options.max_depth = depth;
        self
    }

    /// Attach a token that aborts the run when cancelled
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Analyse every function in `registry` over the x range of `domain`
    ///
    /// Works on a snapshot taken at the start of the call. Functions whose
    /// formula does not parse, or which have no finite sample, are left out of
    /// the mapping; every other failure is confined to the affected field.
    ///
    /// # Errors
    /// `Cancelled` if the attached token fires before the run completes.
    pub fn analyze(
        &self,
        registry: &FunctionRegistry,
        domain: &Domain,
    ) -> Result<BTreeMap<String, AnalysisResult>, AnalysisError> {
        let entries = registry.snapshot();

        #[cfg(feature = "parallel")]
        let outcomes = crate::parallel::map_entries(&entries, |e| self.analyze_entry(e, domain));
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<_> = entries.iter().map(|e| self.analyze_entry(e, domain)).collect();

        let mut results = BTreeMap::new();
        for (entry, outcome) in entries.into_iter().zip(outcomes) {
            if let Some(result) = outcome? {
                results.insert(entry.name, result);
            }
        }
        Ok(results)
    }

    fn analyze_entry(
        &self,
        entry: &FunctionEntry,
        domain: &Domain,
    ) -> Result<Option<AnalysisResult>, AnalysisError> {
        if self.cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let result = analysis::analyze_formula(
            &entry.name,
            &entry.formula,
            domain.x_min(),
            domain.x_max(),
            self,
        );
        match result {
            Some(r) if r.was_cancelled() => Err(AnalysisError::Cancelled),
            other => Ok(other),
        }
    }
}
