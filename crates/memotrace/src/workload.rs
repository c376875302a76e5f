//! Built-in functions to replay through the cache

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// Integer function selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
    /// n * n
    Square,
    /// n-th Fibonacci number, n >= 0
    Fib,
    /// Collatz steps from n down to 1, n >= 1
    Collatz,
}

/// Input outside a workload's domain, or a result that does not fit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    /// Input the function is not defined for
    Domain(Workload, i64),

    /// Result exceeds i64
    Overflow(Workload, i64),
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadError::Domain(workload, n) => {
                write!(f, "{} is undefined for {}", workload.name(), n)
            }
            WorkloadError::Overflow(workload, n) => {
                write!(f, "{}({}) overflows i64", workload.name(), n)
            }
        }
    }
}

impl std::error::Error for WorkloadError {}

impl Workload {
    /// Lowercase name as used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Workload::Square => "square",
            Workload::Fib => "fib",
            Workload::Collatz => "collatz",
        }
    }

    /// Whether `f(n) == f(-n)` for every input, so `|n|` is a sound key
    pub fn is_even(self) -> bool {
        matches!(self, Workload::Square)
    }

    /// Evaluate the function
    pub fn eval(self, n: i64) -> Result<i64, WorkloadError> {
        match self {
            Workload::Square => n.checked_mul(n).ok_or(WorkloadError::Overflow(self, n)),
            Workload::Fib => fib(n).ok_or(if n < 0 {
                WorkloadError::Domain(self, n)
            } else {
                WorkloadError::Overflow(self, n)
            }),
            Workload::Collatz => collatz_steps(n).ok_or(if n < 1 {
                WorkloadError::Domain(self, n)
            } else {
                WorkloadError::Overflow(self, n)
            }),
        }
    }
}

fn fib(n: i64) -> Option<i64> {
    if n < 0 {
        return None;
    }
    if n == 0 {
        return Some(0);
    }
    let (mut a, mut b) = (0i64, 1i64);
    for _ in 1..n {
        let next = a.checked_add(b)?;
        a = b;
        b = next;
    }
    Some(b)
}

fn collatz_steps(n: i64) -> Option<i64> {
    if n < 1 {
        return None;
    }
    let mut n = n;
    let mut steps = 0;
    while n != 1 {
        n = if n % 2 == 0 {
            n / 2
        } else {
            n.checked_mul(3)?.checked_add(1)?
        };
        steps += 1;
    }
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        assert_eq!(Workload::Square.eval(-7), Ok(49));
        assert_eq!(
            Workload::Square.eval(i64::MAX),
            Err(WorkloadError::Overflow(Workload::Square, i64::MAX))
        );
    }

    #[test]
    fn test_fib() {
        let values: Vec<_> = (0..10).map(|n| Workload::Fib.eval(n).unwrap()).collect();
        assert_eq!(values, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
        assert_eq!(Workload::Fib.eval(92), Ok(7_540_113_804_746_346_429));
        assert_eq!(
            Workload::Fib.eval(-1),
            Err(WorkloadError::Domain(Workload::Fib, -1))
        );
        assert!(matches!(
            Workload::Fib.eval(200),
            Err(WorkloadError::Overflow(Workload::Fib, 200))
        ));
    }

    #[test]
    fn test_collatz() {
        assert_eq!(Workload::Collatz.eval(1), Ok(0));
        assert_eq!(Workload::Collatz.eval(6), Ok(8));
        assert_eq!(Workload::Collatz.eval(27), Ok(111));
        assert_eq!(
            Workload::Collatz.eval(0),
            Err(WorkloadError::Domain(Workload::Collatz, 0))
        );
    }

    #[test]
    fn test_error_display() {
        let err = WorkloadError::Domain(Workload::Fib, -3);
        assert_eq!(err.to_string(), "fib is undefined for -3");
    }

    #[test]
    fn test_only_square_is_even() {
        assert!(Workload::Square.is_even());
        assert!(!Workload::Fib.is_even());
        assert!(!Workload::Collatz.is_even());
    }
}
