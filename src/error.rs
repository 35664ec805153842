use std::fmt;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

/// Errors that can occur while turning formula text into an expression
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    EmptyFormula,
    InvalidNumber {
        value: String,
        span: Option<Span>,
    },
    InvalidToken {
        token: String,
        span: Option<Span>,
    },
    /// Identifier outside the whitelist (`x`, `pi`, `e` and the built-in functions)
    UnknownIdentifier {
        name: String,
        span: Option<Span>,
    },
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },
    UnexpectedEndOfInput,
    MaxDepthExceeded,
}

impl ParseError {
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    pub fn unexpected(expected: impl Into<String>, got: impl Into<String>, span: Option<Span>) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            got: got.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyFormula => write!(f, "Formula cannot be empty"),
            ParseError::InvalidNumber { value, span } => {
                write!(f, "Invalid number format: '{}'{}", value, span_suffix(span))
            }
            ParseError::InvalidToken { token, span } => {
                write!(f, "Invalid token: '{}'{}", token, span_suffix(span))
            }
            ParseError::UnknownIdentifier { name, span } => {
                write!(
                    f,
                    "Unknown identifier '{}'{}; only x, pi, e, sin, cos, tan, log, exp, sqrt and abs are allowed",
                    name,
                    span_suffix(span)
                )
            }
            ParseError::UnexpectedToken {
                expected,
                got,
                span,
            } => {
                write!(
                    f,
                    "Expected '{}', but got '{}'{}",
                    expected,
                    got,
                    span_suffix(span)
                )
            }
            ParseError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            ParseError::MaxDepthExceeded => {
                write!(f, "Expression nesting depth exceeds maximum limit")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Reasons a formula has no value at a specific point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalError {
    DivisionByZero,
    /// A function was applied outside its real domain, e.g. `log(-1)`
    Domain { function: &'static str, arg: f64 },
    /// `base ** exponent` has no real value (negative base, fractional exponent)
    InvalidPower { base: f64, exponent: f64 },
    /// The result overflowed or otherwise stopped being finite
    NonFinite,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::Domain { function, arg } => {
                write!(f, "{}({}) is undefined over the reals", function, arg)
            }
            EvalError::InvalidPower { base, exponent } => {
                write!(f, "{}**{} is undefined over the reals", base, exponent)
            }
            EvalError::NonFinite => write!(f, "Result is not a finite number"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Why a single field of an analysis result could not be produced
#[derive(Debug, Clone, PartialEq)]
pub enum Unavailable {
    /// The formula (or a derived formula) could not be parsed
    Parse(ParseError),
    /// Evaluation was undefined where a value was required
    Domain(EvalError),
    /// Bisection bracket was invalid or an evaluation failed mid-search
    ConvergenceFailure,
    /// Quadrature produced a non-finite value
    IntegrationFailure,
    Cancelled,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Parse(e) => write!(f, "parse error: {}", e),
            Unavailable::Domain(e) => write!(f, "domain error: {}", e),
            Unavailable::ConvergenceFailure => write!(f, "bisection did not converge"),
            Unavailable::IntegrationFailure => write!(f, "integral is not finite"),
            Unavailable::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for Unavailable {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Unavailable::Parse(e) => Some(e),
            Unavailable::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Unavailable {
    fn from(e: ParseError) -> Self {
        Unavailable::Parse(e)
    }
}

impl From<EvalError> for Unavailable {
    fn from(e: EvalError) -> Self {
        Unavailable::Domain(e)
    }
}

/// Caller-level errors of an analysis run
///
/// Malformed formulas never surface here; they degrade individual result fields.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    InvalidDomain { reason: String },
    Cancelled,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidDomain { reason } => write!(f, "Invalid domain: {}", reason),
            AnalysisError::Cancelled => write!(f, "Analysis was cancelled"),
        }
    }
}

impl std::error::Error for AnalysisError {}
