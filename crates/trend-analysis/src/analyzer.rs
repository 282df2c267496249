//! Single-series analysis session.
//!
//! A [`SeriesAnalyzer`] owns one immutable copy of the input series. Every
//! operation reads that copy and returns a fresh derived sequence of the same
//! length; nothing is cached between calls.

use trend_core::{
    error::{AnalysisError, ArgKey, Result},
    guard::{self, positive_integer, CallArgs, ParamValue},
    num::Real,
    series::Series,
    table::{columns, ResultTable},
    traits::Derivation,
};

use crate::change::Differential;
use crate::config::AnalysisConfig;
use crate::correlation::Autocorrelation;
use crate::extrema::{Maxima, Minima};
use crate::operation::Operation;
use crate::smoothing::{MovingAverage, MovingAverageConfig, MovingAverageIter, DEFAULT_WINDOW_SIZE};

/// Analysis engine over one ordered series.
///
/// # Example
///
/// ```rust
/// use trend_analysis::SeriesAnalyzer;
///
/// let analyzer = SeriesAnalyzer::new(vec![1.0f64, 2.0, 3.0, 4.0, 5.0]);
///
/// let ma = analyzer.moving_average(3).unwrap();
/// assert_eq!(&ma.as_slice()[2..], &[2.0, 3.0, 4.0]);
///
/// let table = analyzer.results().unwrap();
/// assert_eq!(table.column_count(), 6);
/// assert_eq!(table.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct SeriesAnalyzer<T: Real> {
    series: Series<T>,
}

impl<T: Real> SeriesAnalyzer<T> {
    /// Start a session over `data`.
    #[must_use]
    pub fn new(data: impl Into<Series<T>>) -> Self {
        Self {
            series: data.into(),
        }
    }

    /// Start a session from raw scalars.
    ///
    /// Each element must coerce to a real number; `"nan"` is accepted as the
    /// missing marker.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] keyed by the position of the
    /// first non-numeric element.
    pub fn try_from_values(values: &[ParamValue]) -> Result<Self> {
        let series = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    .coerce()
                    .map(T::from_f64_lossy)
                    .ok_or_else(|| AnalysisError::not_numeric(ArgKey::Position(i), value))
            })
            .collect::<Result<Series<T>>>()?;
        Ok(Self { series })
    }

    /// The analyzed series.
    #[must_use]
    pub fn series(&self) -> &Series<T> {
        &self.series
    }

    /// Length of the analyzed series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns `true` when the analyzed series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Trailing moving average over `window_size` positions.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] when `window_size` is 0.
    pub fn moving_average(&self, window_size: usize) -> Result<Series<T>> {
        let ma = <MovingAverage as Derivation<T>>::new(MovingAverageConfig::new(window_size));
        ma.derive(self.series.as_slice())
    }

    /// Lazily replay the moving average from position 0.
    ///
    /// Each call starts a new replay; the averages are computed once up front.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] when `window_size` is 0.
    pub fn moving_average_iter(&self, window_size: usize) -> Result<MovingAverageIter<T>> {
        let ma = <MovingAverage as Derivation<T>>::new(MovingAverageConfig::new(window_size));
        ma.iter(self.series.as_slice())
    }

    /// First difference.
    #[must_use]
    pub fn differential(&self) -> Series<T> {
        Differential::default().compute(self.series.as_slice())
    }

    /// Autocorrelation for every lag, missing at lag 0.
    #[must_use]
    pub fn autocorrelation(&self) -> Series<T> {
        Autocorrelation::default().compute(self.series.as_slice())
    }

    /// Strict local maxima.
    #[must_use]
    pub fn maxima(&self) -> Series<T> {
        Maxima::default().compute(self.series.as_slice())
    }

    /// Strict local minima.
    #[must_use]
    pub fn minima(&self) -> Series<T> {
        Minima::default().compute(self.series.as_slice())
    }

    /// Full result table with the default moving average window.
    ///
    /// # Errors
    ///
    /// Propagates table assembly errors.
    pub fn results(&self) -> Result<ResultTable<T>> {
        self.results_with(&AnalysisConfig::default())
    }

    /// Full result table using `config`.
    ///
    /// Columns are `Original Data`, `Moving Average`, `Differential`,
    /// `Maxima`, `Minima` and `Autocorrelation`, each as long as the series.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] for an invalid configuration.
    pub fn results_with(&self, config: &AnalysisConfig) -> Result<ResultTable<T>> {
        config.validate()?;

        let data = self.series.as_slice();
        let moving_average =
            <MovingAverage as Derivation<T>>::new(MovingAverageConfig::new(config.window_size));
        let derived = [
            derived_column(&moving_average, data)?,
            derived_column(&Differential, data)?,
            derived_column(&Maxima, data)?,
            derived_column(&Minima, data)?,
            derived_column(&Autocorrelation, data)?,
        ];

        let mut table = ResultTable::with_capacity(columns::ALL.len());
        table.insert(columns::ORIGINAL_DATA, self.series.clone())?;
        for (name, series) in derived {
            table.insert(name, series)?;
        }

        tracing::debug!(
            rows = table.len(),
            window_size = config.window_size,
            "assembled result table"
        );
        Ok(table)
    }

    /// Run `operation` with dynamic call arguments.
    ///
    /// Every argument is validated before anything else happens, then bound to
    /// the operation's declared parameters. Operations that take no
    /// parameters still reject surplus arguments.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] for a non-numeric or
    /// out-of-domain argument and [`AnalysisError::UnexpectedArgument`] for
    /// one the operation does not declare.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trend_analysis::{Operation, SeriesAnalyzer};
    /// use trend_core::CallArgs;
    ///
    /// let analyzer = SeriesAnalyzer::new(vec![1.0f64, 2.0, 3.0]);
    ///
    /// let ma = analyzer
    ///     .invoke(Operation::MovingAverage, &CallArgs::new().named("window_size", "2"))
    ///     .unwrap();
    /// assert_eq!(ma[2], 2.5);
    ///
    /// let err = analyzer
    ///     .invoke(Operation::MovingAverage, &CallArgs::new().named("window_size", "abc"))
    ///     .unwrap_err();
    /// assert!(err.is_argument_error());
    /// ```
    pub fn invoke(&self, operation: Operation, args: &CallArgs) -> Result<Series<T>> {
        let result = guard::guarded(args, |numeric| {
            let bound = numeric.bind(operation.name(), operation.params())?;
            tracing::debug!(%operation, len = self.len(), ?bound, "running operation");

            match operation {
                Operation::MovingAverage => {
                    let window = bound.first().copied().unwrap_or(DEFAULT_WINDOW_SIZE as f64);
                    let window = positive_integer(ArgKey::name("window_size"), window)?;
                    self.moving_average(window)
                }
                Operation::Differential => Ok(self.differential()),
                Operation::Autocorrelation => Ok(self.autocorrelation()),
                Operation::Maxima => Ok(self.maxima()),
                Operation::Minima => Ok(self.minima()),
            }
        });

        if let Err(err) = &result {
            tracing::warn!(%operation, error = %err, "operation rejected");
        }
        result
    }
}

fn derived_column<T: Real, D: Derivation<T>>(
    derivation: &D,
    data: &[T],
) -> Result<(&'static str, Series<T>)> {
    Ok((derivation.column_name(), derivation.derive(data)?))
}
