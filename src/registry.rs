//! Named functions and the viewing window they are analysed over

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::AnalysisError;

/// One registered function
///
/// Only `formula` feeds the analysis; `color` is carried for the caller's
/// rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub name: String,
    pub formula: String,
    pub color: String,
}

impl FunctionEntry {
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        FunctionEntry {
            name: name.into(),
            formula: formula.into(),
            color: color.into(),
        }
    }
}

/// Name-keyed function collection
///
/// Iteration and snapshots are ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionRegistry {
    entries: BTreeMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry`, returning the entry it replaced under the same name
    pub fn add(&mut self, entry: FunctionEntry) -> Option<FunctionEntry> {
        self.entries.insert(entry.name.clone(), entry)
    }

    pub fn remove(&mut self, name: &str) -> Option<FunctionEntry> {
        self.entries.remove(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, FunctionEntry> {
        self.entries.values()
    }

    /// Deep copy of the current entries, detached from later mutations
    pub fn snapshot(&self) -> Vec<FunctionEntry> {
        self.entries.values().cloned().collect()
    }
}

impl FromIterator<FunctionEntry> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = FunctionEntry>>(iter: I) -> Self {
        let mut registry = FunctionRegistry::new();
        for entry in iter {
            registry.add(entry);
        }
        registry
    }
}

/// Viewing window `(x_min, y_min, x_max, y_max)`
///
/// Analysis only reads the x range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Domain {
    /// # Errors
    /// `InvalidDomain` if a bound is not finite, `x_min >= x_max`, the x width
    /// overflows, or `y_min > y_max`.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, AnalysisError> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(AnalysisError::InvalidDomain {
                reason: "bounds must be finite".to_string(),
            });
        }
        if x_min >= x_max {
            return Err(AnalysisError::InvalidDomain {
                reason: format!("x_min ({}) must be less than x_max ({})", x_min, x_max),
            });
        }
        if !(x_max - x_min).is_finite() {
            return Err(AnalysisError::InvalidDomain {
                reason: "x range is too wide to sample".to_string(),
            });
        }
        if y_min > y_max {
            return Err(AnalysisError::InvalidDomain {
                reason: format!("y_min ({}) must not exceed y_max ({})", y_min, y_max),
            });
        }
        Ok(Domain {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_mutation() {
        let mut reg = FunctionRegistry::new();
        assert!(reg.add(FunctionEntry::new("f", "x", "red")).is_none());
        assert!(reg.add(FunctionEntry::new("g", "x**2", "blue")).is_none());

        let old = reg.add(FunctionEntry::new("f", "sin(x)", "green")).unwrap();
        assert_eq!(old.formula, "x");
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("f").map(|e| e.formula.as_str()), Some("sin(x)"));

        assert!(reg.remove("g").is_some());
        assert!(reg.remove("g").is_none());
        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut reg: FunctionRegistry = [
            FunctionEntry::new("b", "x", "red"),
            FunctionEntry::new("a", "x**2", "blue"),
        ]
        .into_iter()
        .collect();

        let snap = reg.snapshot();
        reg.clear();
        let names: Vec<&str> = snap.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_domain_validation() {
        assert!(Domain::new(-10.0, -10.0, 10.0, 10.0).is_ok());
        assert!(Domain::new(0.0, 1.0, 1.0, 1.0).is_ok());
        assert!(matches!(
            Domain::new(1.0, 0.0, 1.0, 1.0),
            Err(AnalysisError::InvalidDomain { .. })
        ));
        assert!(Domain::new(0.0, 2.0, 1.0, 1.0).is_err());
        assert!(Domain::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(Domain::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_domain_width_must_be_finite() {
        assert!(matches!(
            Domain::new(-1e308, 0.0, 1e308, 1.0),
            Err(AnalysisError::InvalidDomain { .. })
        ));
        assert!(Domain::new(-1e307, 0.0, 1e307, 1.0).is_ok());
    }
}
