//! Argument validation for analysis operations.
//!
//! Every operation that accepts call arguments runs them through [`guarded`]
//! first: each positional and named argument must coerce to a real number,
//! otherwise the call fails with [`AnalysisError::InvalidArgument`] and the
//! wrapped computation is never entered.
//!
//! # Example
//!
//! ```rust
//! use trend_core::guard::{guarded, CallArgs};
//! use trend_core::error::ArgKey;
//! use trend_core::AnalysisError;
//!
//! let args = CallArgs::new().named("window_size", "abc");
//! let mut entered = false;
//! let result = guarded(&args, |_| {
//!     entered = true;
//!     Ok(())
//! });
//!
//! assert!(!entered);
//! assert!(matches!(
//!     result,
//!     Err(AnalysisError::InvalidArgument { key: ArgKey::Name(ref k), .. }) if k == "window_size"
//! ));
//! ```

use core::fmt;

use indexmap::IndexMap;

use crate::error::{AnalysisError, ArgKey, Result};

/// A raw, not yet validated call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A floating-point number.
    Number(f64),
    /// An integer.
    Integer(i64),
    /// A boolean, coerced to 0 or 1.
    Bool(bool),
    /// Text that may hold a number, e.g. a CLI flag value.
    Text(String),
    /// No value.
    Null,
}

impl ParamValue {
    /// Interpret the argument as a real number.
    ///
    /// Text is trimmed and parsed as `f64`, so `"nan"` and `"inf"` are accepted
    /// while `"abc"` and the empty string are not.
    #[must_use]
    pub fn coerce(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Integer(i) => Some(*i as f64),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Null => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{x}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Number(value as f64), Self::Integer)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<V: Into<ParamValue>> From<Option<V>> for ParamValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Positional and named arguments for one operation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<ParamValue>,
    named: IndexMap<String, ParamValue>,
}

impl CallArgs {
    /// Create an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<ParamValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add or replace a named argument.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Returns `true` when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Total number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Positional arguments in call order.
    #[must_use]
    pub fn positional(&self) -> &[ParamValue] {
        &self.positional
    }

    /// Named arguments in insertion order.
    pub fn named_args(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Call arguments after every value coerced to a real number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericArgs {
    positional: Vec<f64>,
    named: IndexMap<String, f64>,
}

/// A declared operation parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Parameter name used for named binding and error messages.
    pub name: &'static str,
    /// Value used when the caller omits the parameter.
    pub default: f64,
}

impl ParamSpec {
    /// Declare a parameter with a default.
    #[must_use]
    pub const fn new(name: &'static str, default: f64) -> Self {
        Self { name, default }
    }
}

impl NumericArgs {
    /// Positional values in call order.
    #[must_use]
    pub fn positional(&self) -> &[f64] {
        &self.positional
    }

    /// Look up a named value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.named.get(name).copied()
    }

    /// Bind the values to `params` in declaration order.
    ///
    /// Positional values fill the leading parameters, named values fill the
    /// rest, and defaults cover whatever is left.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnexpectedArgument`] for surplus positional
    /// values, unknown names, or a parameter supplied both ways.
    pub fn bind(&self, operation: &'static str, params: &[ParamSpec]) -> Result<Vec<f64>> {
        if self.positional.len() > params.len() {
            return Err(AnalysisError::UnexpectedArgument {
                key: ArgKey::Position(params.len()),
                operation,
            });
        }

        for name in self.named.keys() {
            let index = params.iter().position(|p| p.name == name);
            match index {
                Some(i) if i >= self.positional.len() => {}
                _ => {
                    return Err(AnalysisError::UnexpectedArgument {
                        key: ArgKey::name(name.as_str()),
                        operation,
                    })
                }
            }
        }

        Ok(params
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                self.positional
                    .get(i)
                    .copied()
                    .or_else(|| self.get(spec.name))
                    .unwrap_or(spec.default)
            })
            .collect())
    }
}

/// Coerce every argument to a real number.
///
/// Positional arguments are checked in order, then named arguments in
/// insertion order; the first failure is reported.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] naming the position or key of the
/// first argument that is not numeric.
pub fn validate(args: &CallArgs) -> Result<NumericArgs> {
    let positional = args
        .positional
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value
                .coerce()
                .ok_or_else(|| AnalysisError::not_numeric(ArgKey::Position(i), value))
        })
        .collect::<Result<Vec<_>>>()?;

    let named = args
        .named
        .iter()
        .map(|(name, value)| {
            value
                .coerce()
                .map(|x| (name.clone(), x))
                .ok_or_else(|| AnalysisError::not_numeric(ArgKey::name(name.as_str()), value))
        })
        .collect::<Result<IndexMap<_, _>>>()?;

    Ok(NumericArgs { positional, named })
}

/// Validate `args`, then run `op` with the coerced values.
///
/// `op` is only entered when every argument is numeric.
///
/// # Errors
///
/// Propagates validation failures and any error returned by `op`.
pub fn guarded<R, F>(args: &CallArgs, op: F) -> Result<R>
where
    F: FnOnce(&NumericArgs) -> Result<R>,
{
    let numeric = validate(args)?;
    op(&numeric)
}

/// Convert a bound value to a positive integer such as a window size.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] when `value` is not finite, has a
/// fractional part, or is below 1.
pub fn positive_integer(key: ArgKey, value: f64) -> Result<usize> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > usize::MAX as f64 {
        return Err(AnalysisError::InvalidArgument {
            key,
            value: value.to_string(),
            expected: "positive integer",
        });
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: [ParamSpec; 1] = [ParamSpec::new("window_size", 3.0)];

    #[test]
    fn test_coerce() {
        assert_eq!(ParamValue::from(2.5).coerce(), Some(2.5));
        assert_eq!(ParamValue::from(4).coerce(), Some(4.0));
        assert_eq!(ParamValue::from(true).coerce(), Some(1.0));
        assert_eq!(ParamValue::from(" 7 ").coerce(), Some(7.0));
        assert!(ParamValue::from("nan").coerce().unwrap().is_nan());
        assert_eq!(ParamValue::from("abc").coerce(), None);
        assert_eq!(ParamValue::from("").coerce(), None);
        assert_eq!(ParamValue::Null.coerce(), None);
        assert_eq!(ParamValue::from(None::<f64>), ParamValue::Null);
    }

    #[test]
    fn test_validate_reports_position() {
        let args = CallArgs::new().arg(3).arg("x");
        let err = validate(&args).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidArgument {
                key: ArgKey::Position(1),
                value: "\"x\"".to_string(),
                expected: "real number",
            }
        );
    }

    #[test]
    fn test_validate_reports_name() {
        let args = CallArgs::new().named("window_size", "abc");
        let err = validate(&args).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidArgument { key: ArgKey::Name(ref k), .. } if k == "window_size"
        ));
        assert!(err.to_string().contains("'window_size'"));
    }

    #[test]
    fn test_positional_checked_before_named() {
        let args = CallArgs::new().named("a", "bad").arg(ParamValue::Null);
        let err = validate(&args).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidArgument {
                key: ArgKey::Position(0),
                ..
            }
        ));
    }

    #[test]
    fn test_guarded_skips_op_on_failure() {
        let mut calls = 0;
        let result: Result<()> = guarded(&CallArgs::new().arg("1.5").arg("oops"), |_| {
            calls += 1;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(calls, 0);

        let value = guarded(&CallArgs::new().arg("1.5"), |args| Ok(args.positional()[0]));
        assert_eq!(value, Ok(1.5));
    }

    #[test]
    fn test_bind_defaults_positional_and_named() {
        let none = validate(&CallArgs::new()).unwrap();
        assert_eq!(none.bind("moving_average", &WINDOW).unwrap(), vec![3.0]);

        let positional = validate(&CallArgs::new().arg(5)).unwrap();
        assert_eq!(positional.bind("moving_average", &WINDOW).unwrap(), vec![5.0]);

        let named = validate(&CallArgs::new().named("window_size", "4")).unwrap();
        assert_eq!(named.bind("moving_average", &WINDOW).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_bind_rejects_surplus() {
        let too_many = validate(&CallArgs::new().arg(1).arg(2)).unwrap();
        assert_eq!(
            too_many.bind("moving_average", &WINDOW).unwrap_err(),
            AnalysisError::UnexpectedArgument {
                key: ArgKey::Position(1),
                operation: "moving_average",
            }
        );

        let unknown = validate(&CallArgs::new().named("lag", 1)).unwrap();
        assert!(unknown.bind("moving_average", &WINDOW).is_err());

        let twice = validate(&CallArgs::new().arg(3).named("window_size", 3)).unwrap();
        assert!(twice.bind("moving_average", &WINDOW).is_err());

        let extra = validate(&CallArgs::new().arg(1)).unwrap();
        assert!(extra.bind("differential", &[]).is_err());
    }

    #[test]
    fn test_positive_integer() {
        let key = || ArgKey::name("window_size");
        assert_eq!(positive_integer(key(), 3.0), Ok(3));
        assert!(positive_integer(key(), 0.0).is_err());
        assert!(positive_integer(key(), -2.0).is_err());
        assert!(positive_integer(key(), 2.5).is_err());
        assert!(positive_integer(key(), f64::NAN).is_err());
        assert!(positive_integer(key(), f64::INFINITY).is_err());
    }
}
