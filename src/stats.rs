// Two-sample t-test primitive
//
// Student's independent two-sample location test with the equal-variance
// (pooled) assumption, two-sided p-value from the Student-t CDF. Degenerate
// inputs (a sample with fewer than two values, or zero pooled variance)
// yield NaN statistic and p-value, matching what scipy reports for them.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestOutcome {
    /// t-statistic (sign follows mean(a) - mean(b)).
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Degrees of freedom (n_a + n_b - 2).
    pub df: f64,
}

impl TTestOutcome {
    fn undefined(df: f64) -> Self {
        TTestOutcome {
            statistic: f64::NAN,
            p_value: f64::NAN,
            df,
        }
    }
}

pub fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance with ddof = 1. NaN for fewer than two values.
pub fn sample_variance(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = xs.iter().map(|&v| (v - mean) * (v - mean)).sum();
    ss / (xs.len() - 1) as f64
}

/// Equal-variance independent two-sample t-test.
pub fn two_sample_ttest(sample_a: &[f64], sample_b: &[f64]) -> TTestOutcome {
    let n_a = sample_a.len();
    let n_b = sample_b.len();
    if n_a < 2 || n_b < 2 {
        return TTestOutcome::undefined(f64::NAN);
    }
    let df = (n_a + n_b - 2) as f64;

    let mean_a = mean(sample_a);
    let mean_b = mean(sample_b);
    let var_a = sample_variance(sample_a, mean_a);
    let var_b = sample_variance(sample_b, mean_b);

    let pooled = ((n_a - 1) as f64 * var_a + (n_b - 1) as f64 * var_b) / df;
    let std_err = (pooled * (1.0 / n_a as f64 + 1.0 / n_b as f64)).sqrt();
    if !std_err.is_finite() || std_err <= 0.0 {
        return TTestOutcome::undefined(df);
    }

    let statistic = (mean_a - mean_b) / std_err;
    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    };

    TTestOutcome {
        statistic,
        p_value,
        df,
    }
}

// ============================================================================
// TESTS
// ============================================================================
