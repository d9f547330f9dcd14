//! Where the user is: device fixes, IP lookup and a fixed fallback.
//!
//! A [`LocatePolicy`] is an ordered list of attempts. Each attempt runs under
//! its own timeout against a [`PositionSource`]; the first valid coordinate
//! wins. When every attempt fails the policy yields [`DEFAULT_COORDINATE`], so
//! a search always has somewhere to start.
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

pub use error::LocateError;

use crate::geo::{Coordinate, DEFAULT_COORDINATE};

mod error {
    use std::time::Duration;

    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum LocateError {
        #[error("Location permission denied")]
        PermissionDenied,
        #[error("Position unavailable: {0}")]
        Unavailable(String),
        #[error("Location attempt timed out after {0:?}")]
        Timeout(Duration),
        #[error("Location source returned an invalid coordinate")]
        InvalidCoordinate,
    }
}

/// Parameters for one device position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the device may return
    pub maximum_age: Duration,
}

/// A single step of a [`LocatePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateAttempt {
    Device(DeviceOptions),
    IpLookup { timeout: Duration },
}

impl LocateAttempt {
    pub const fn timeout(&self) -> Duration {
        match self {
            Self::Device(options) => options.timeout,
            Self::IpLookup { timeout } => *timeout,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Device(DeviceOptions {
                high_accuracy: true,
                ..
            }) => "device_high_accuracy",
            Self::Device(_) => "device",
            Self::IpLookup { .. } => "ip_lookup",
        }
    }
}

/// Something that can report the user's position.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn device_position(&self, options: &DeviceOptions) -> Result<Coordinate, LocateError>;

    async fn ip_position(&self) -> Result<Coordinate, LocateError>;
}

/// Where a located coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOrigin {
    /// Attempt at this index of the policy succeeded
    Attempt(usize),
    /// Every attempt failed
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub coordinate: Coordinate,
    pub origin: LocationOrigin,
}

impl Located {
    pub const fn is_default(&self) -> bool {
        matches!(self.origin, LocationOrigin::Default)
    }
}

/// Ordered location attempts with a fixed fallback coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatePolicy {
    attempts: Vec<LocateAttempt>,
    fallback: Coordinate,
}

impl Default for LocatePolicy {
    /// High-accuracy device fix, then a coarser and older-tolerant one, then
    /// IP lookup.
    fn default() -> Self {
        Self::new(vec![
            LocateAttempt::Device(DeviceOptions {
                high_accuracy: true,
                timeout: Duration::from_secs(10),
                maximum_age: Duration::from_secs(60),
            }),
            LocateAttempt::Device(DeviceOptions {
                high_accuracy: false,
                timeout: Duration::from_secs(5),
                maximum_age: Duration::from_secs(5 * 60),
            }),
            LocateAttempt::IpLookup {
                timeout: Duration::from_secs(5),
            },
        ])
    }
}

impl LocatePolicy {
    pub const fn new(attempts: Vec<LocateAttempt>) -> Self {
        Self {
            attempts,
            fallback: DEFAULT_COORDINATE,
        }
    }

    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn attempts(&self) -> &[LocateAttempt] {
        &self.attempts
    }

    /// Try each attempt in order and return the first valid position, or the
    /// fallback coordinate.
    #[instrument(name = "Locate", level = "info", skip_all, fields(attempts = self.attempts.len()))]
    pub async fn locate(&self, source: &dyn PositionSource) -> Located {
        for (index, attempt) in self.attempts.iter().enumerate() {
            match run_attempt(source, attempt).await {
                Ok(coordinate) => {
                    info!(attempt = attempt.label(), "Position found");
                    return Located {
                        coordinate,
                        origin: LocationOrigin::Attempt(index),
                    };
                }
                Err(err) => {
                    warn!(attempt = attempt.label(), error = %err, "Location attempt failed");
                }
            }
        }
        warn!(
            latitude = self.fallback.latitude,
            longitude = self.fallback.longitude,
            "All location attempts failed, using default coordinate"
        );
        Located {
            coordinate: self.fallback,
            origin: LocationOrigin::Default,
        }
    }
}

async fn run_attempt(
    source: &dyn PositionSource,
    attempt: &LocateAttempt,
) -> Result<Coordinate, LocateError> {
    let timeout = attempt.timeout();
    let lookup = async {
        match attempt {
            LocateAttempt::Device(options) => source.device_position(options).await,
            LocateAttempt::IpLookup { .. } => source.ip_position().await,
        }
    };
    let coordinate = tokio::time::timeout(timeout, lookup)
        .await
        .map_err(|_| LocateError::Timeout(timeout))??;
    if coordinate.is_valid() {
        debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "Valid coordinate"
        );
        Ok(coordinate)
    } else {
        Err(LocateError::InvalidCoordinate)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, PoisonError};

    use super::*;

    /// Answers device requests by accuracy and records what was asked.
    #[derive(Default)]
    struct FakeSource {
        high_accuracy: Option<Result<Coordinate, LocateError>>,
        low_accuracy: Option<Result<Coordinate, LocateError>>,
        ip: Option<Result<Coordinate, LocateError>>,
        /// Never answer device requests
        hang_device: bool,
        asked: Mutex<Vec<&'static str>>,
    }

    impl FakeSource {
        fn ask(&self, what: &'static str) {
            self.asked
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(what);
        }

        fn asked(&self) -> Vec<&'static str> {
            self.asked
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    fn unavailable() -> Result<Coordinate, LocateError> {
        Err(LocateError::Unavailable("no fix".into()))
    }

    #[async_trait]
    impl PositionSource for FakeSource {
        async fn device_position(&self, options: &DeviceOptions) -> Result<Coordinate, LocateError> {
            if self.hang_device {
                std::future::pending::<()>().await;
            }
            if options.high_accuracy {
                self.ask("high");
                self.high_accuracy.clone().unwrap_or_else(unavailable)
            } else {
                self.ask("low");
                self.low_accuracy.clone().unwrap_or_else(unavailable)
            }
        }

        async fn ip_position(&self) -> Result<Coordinate, LocateError> {
            self.ask("ip");
            self.ip.clone().unwrap_or_else(unavailable)
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let source = FakeSource {
            high_accuracy: Some(Ok(Coordinate::new(51.5, -0.12))),
            ..FakeSource::default()
        };
        let located = LocatePolicy::default().locate(&source).await;
        assert_eq!(located.origin, LocationOrigin::Attempt(0));
        assert_eq!(located.coordinate, Coordinate::new(51.5, -0.12));
        assert_eq!(source.asked(), vec!["high"]);
    }

    #[tokio::test]
    async fn test_falls_through_to_ip_lookup() {
        let source = FakeSource {
            high_accuracy: Some(Err(LocateError::PermissionDenied)),
            ip: Some(Ok(Coordinate::new(40.71, -74.0))),
            ..FakeSource::default()
        };
        let located = LocatePolicy::default().locate(&source).await;
        assert_eq!(located.origin, LocationOrigin::Attempt(2));
        assert_eq!(source.asked(), vec!["high", "low", "ip"]);
        assert!(!located.is_default());
    }

    #[tokio::test]
    async fn test_invalid_coordinate_counts_as_failure() {
        let source = FakeSource {
            high_accuracy: Some(Ok(Coordinate::new(f64::NAN, 0.0))),
            low_accuracy: Some(Ok(Coordinate::new(95.0, 0.0))),
            ip: Some(Ok(Coordinate::new(12.0, 13.0))),
            ..FakeSource::default()
        };
        let located = LocatePolicy::default().locate(&source).await;
        assert_eq!(located.origin, LocationOrigin::Attempt(2));
    }

    #[tokio::test]
    async fn test_all_failures_yield_default_coordinate() {
        let source = FakeSource::default();
        let located = LocatePolicy::default().locate(&source).await;
        assert!(located.is_default());
        assert_eq!(located.coordinate, DEFAULT_COORDINATE);

        let custom = Coordinate::new(48.85, 2.35);
        let located = LocatePolicy::new(Vec::new())
            .with_fallback(custom)
            .locate(&source)
            .await;
        assert_eq!(located.coordinate, custom);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_device_times_out() {
        let source = FakeSource {
            hang_device: true,
            ip: Some(Ok(Coordinate::new(1.0, 2.0))),
            ..FakeSource::default()
        };
        let start = tokio::time::Instant::now();
        let located = LocatePolicy::default().locate(&source).await;
        assert_eq!(located.origin, LocationOrigin::Attempt(2));
        // Both device attempts ran to their full timeouts
        assert!(start.elapsed() >= Duration::from_secs(15));
        assert_eq!(source.asked(), vec!["ip"]);
    }

    #[test]
    fn test_default_policy_shape() {
        let policy = LocatePolicy::default();
        assert_eq!(policy.attempts().len(), 3);
        assert_eq!(policy.attempts()[0].timeout(), Duration::from_secs(10));
        assert!(matches!(
            policy.attempts()[1],
            LocateAttempt::Device(DeviceOptions {
                high_accuracy: false,
                ..
            })
        ));
        assert!(matches!(policy.attempts()[2], LocateAttempt::IpLookup { .. }));
    }
}
