use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::dispatcher::{CallOptions, MethodDescriptor};
use crate::error::{CallError, CallResult};

/// Retry configuration shared by channel establishment and calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
  /// Maximum number of retries after the first attempt
  ///
  /// A call makes at most `max_retries + 1` attempts: with the default of 3
  /// that is 4 attempts, and `Exhausted` carries the error of the 4th. Zero
  /// means a single attempt.
  pub max_retries: u32,

  /// Delay before the first retry in milliseconds
  pub initial_delay_ms: u64,

  /// Upper bound for the unjittered delay in milliseconds
  pub max_delay_ms: u64,

  /// Multiplier for exponential backoff (typically 2.0)
  pub backoff_multiplier: f64,

  /// Spread each delay uniformly within ±20%
  pub use_jitter: bool,
}

impl RetryConfig {
  /// Create a new retry configuration with defaults
  ///
  /// Defaults:
  /// - max_retries: 3
  /// - initial_delay_ms: 100
  /// - max_delay_ms: 5000
  /// - backoff_multiplier: 2.0
  /// - use_jitter: true
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_retries(mut self, max_retries: u32) -> Self {
    self.max_retries = max_retries;
    self
  }

  pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
    self.initial_delay_ms = delay_ms;
    self
  }

  pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
    self.max_delay_ms = delay_ms;
    self
  }

  /// Disable jitter
  pub fn without_jitter(mut self) -> Self {
    self.use_jitter = false;
    self
  }

  /// Unjittered delay before retry `retry` (1-based)
  pub fn base_delay(&self, retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
    let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
    Duration::from_millis(delay.min(self.max_delay_ms as f64) as u64)
  }

  /// Delay actually slept before retry `retry`
  pub fn delay(&self, retry: u32) -> Duration {
    let base = self.base_delay(retry);
    if self.use_jitter {
      apply_jitter(base)
    } else {
      base
    }
  }
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_retries: 3,
      initial_delay_ms: 100,
      max_delay_ms: 5000,
      backoff_multiplier: 2.0,
      use_jitter: true,
    }
  }
}

/// Spread a delay uniformly within ±20% to avoid synchronized retries
fn apply_jitter(delay: Duration) -> Duration {
  let factor: f64 = rand::rng().random_range(0.8..=1.2);
  delay.mul_f64(factor)
}

/// Where a logical call currently is in its retry lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPhase {
  #[default]
  Idle,
  Attempting,
  Retrying,
  Success,
  /// Retry budget spent on transient errors
  Exhausted,
  /// Stopped on an error that is not eligible for retry
  Failed,
}

/// Bookkeeping for one logical call across its attempts
#[derive(Debug, Clone, Default)]
pub struct RetryState {
  pub attempts: u32,
  pub elapsed_backoff: Duration,
  pub last_error: Option<CallError>,
  pub phase: RetryPhase,
  /// Every delay slept, in order
  pub backoffs: Vec<Duration>,
}

/// Result of a retried call together with how it got there
#[derive(Debug)]
pub struct RetryOutcome<T> {
  pub result: CallResult<T>,
  pub state: RetryState,
}

/// Decides whether and when a failed attempt is repeated
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
  config: RetryConfig,
}

impl RetryPolicy {
  pub fn new(config: RetryConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &RetryConfig {
    &self.config
  }

  /// Transient errors on idempotent methods (or calls marked `retry_unsafe`)
  pub fn is_retryable(
    &self,
    error: &CallError,
    method: &MethodDescriptor,
    options: &CallOptions,
  ) -> bool {
    error.is_transient() && (method.idempotent || options.retry_unsafe)
  }

  /// Run `operation` until it succeeds, fails permanently or the budget is spent
  pub async fn run<F, Fut, T>(
    &self,
    method: &MethodDescriptor,
    options: &CallOptions,
    mut operation: F,
  ) -> RetryOutcome<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = CallResult<T>>,
  {
    let mut state = RetryState::default();

    loop {
      state.phase = RetryPhase::Attempting;
      state.attempts += 1;

      let error = match operation().await {
        Ok(value) => {
          if state.attempts > 1 {
            debug!(
              target: "grpc_client",
              method = method.path,
              retries = state.attempts - 1,
              "Call succeeded after retries"
            );
          }
          state.phase = RetryPhase::Success;
          return RetryOutcome {
            result: Ok(value),
            state,
          };
        }
        Err(error) => error,
      };

      state.last_error = Some(error.clone());

      if !self.is_retryable(&error, method, options) {
        state.phase = RetryPhase::Failed;
        return RetryOutcome {
          result: Err(error),
          state,
        };
      }

      let retry = state.attempts;
      if retry > self.config.max_retries {
        warn!(
          target: "grpc_client",
          method = method.path,
          attempts = state.attempts,
          error = %error,
          "Retry budget exhausted"
        );
        state.phase = RetryPhase::Exhausted;
        return RetryOutcome {
          result: Err(CallError::Exhausted {
            attempts: state.attempts,
            last: Box::new(error),
          }),
          state,
        };
      }

      let delay = self.config.delay(retry);
      state.phase = RetryPhase::Retrying;
      debug!(
        target: "grpc_client",
        method = method.path,
        attempt = state.attempts,
        max_retries = self.config.max_retries,
        delay_ms = delay.as_millis() as u64,
        error = %error,
        "Transient failure, backing off"
      );

      let interrupted = match &options.cancel {
        Some(token) => tokio::select! {
          biased;
          _ = token.cancelled() => true,
          _ = tokio::time::sleep(delay) => false,
        },
        None => {
          tokio::time::sleep(delay).await;
          false
        }
      };

      if interrupted {
        state.phase = RetryPhase::Failed;
        state.last_error = Some(CallError::Cancelled);
        return RetryOutcome {
          result: Err(CallError::Cancelled),
          state,
        };
      }

      state.elapsed_backoff += delay;
      state.backoffs.push(delay);
    }
  }

  /// Like [`run`](Self::run) but only returns the result
  pub async fn execute<F, Fut, T>(
    &self,
    method: &MethodDescriptor,
    options: &CallOptions,
    operation: F,
  ) -> CallResult<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = CallResult<T>>,
  {
    self.run(method, options, operation).await.result
  }
}

/// Retry an async operation with exponential backoff, on any error
///
/// Used for channel establishment where every failure is worth another try.
///
/// # Example
/// ```ignore
/// use grpc_client::{retry_with_backoff, RetryConfig};
///
/// let config = RetryConfig::new().with_max_retries(5);
/// let channel = retry_with_backoff(|| ManagedChannel::open(endpoint.clone(), cfg.clone()), config).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
  E: std::fmt::Display,
{
  let mut attempt = 0;

  loop {
    match operation().await {
      Ok(result) => {
        if attempt > 0 {
          debug!(target: "grpc_client", "Operation succeeded after {} retries", attempt);
        }
        return Ok(result);
      }
      Err(e) => {
        attempt += 1;

        if attempt > config.max_retries {
          warn!(
            target: "grpc_client",
            "Operation failed after {} attempts: {}",
            attempt, e
          );
          return Err(e);
        }

        let delay = config.delay(attempt);
        debug!(
          target: "grpc_client",
          "Operation failed (attempt {}/{}): {}. Retrying in {}ms...",
          attempt,
          config.max_retries,
          e,
          delay.as_millis()
        );

        tokio::time::sleep(delay).await;
      }
    }
  }
}

/// Retry with default configuration (3 retries, exponential backoff with jitter)
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
  E: std::fmt::Display,
{
  retry_with_backoff(operation, RetryConfig::default()).await
}
