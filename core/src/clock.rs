use chrono::{DateTime, Duration, Utc};

/// Source of the `now` snapshot fed into a classification pass.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Scheduled re-evaluation of `now`.
///
/// The UI polls it from its event loop; it hands out a new snapshot once per
/// interval, which is then passed explicitly to the classifier.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Option<DateTime<Utc>>,
}

impl Ticker {
    pub fn new(interval: std::time::Duration) -> Self {
        let interval = Duration::from_std(interval).unwrap_or_else(|_| Duration::seconds(60));
        Self { interval, last: None }
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let due = match self.last {
            Some(last) => now - last >= self.interval || now < last,
            None => true,
        };
        if due {
            self.last = Some(now);
            Some(now)
        } else {
            None
        }
    }

    /// Restarts the interval, e.g. after a manual refresh.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.last = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ticker_fires_once_per_interval() {
        let start = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let mut ticker = Ticker::new(std::time::Duration::from_secs(60));

        assert_eq!(ticker.poll(start), Some(start));
        assert_eq!(ticker.poll(start + Duration::seconds(59)), None);
        let next = start + Duration::seconds(60);
        assert_eq!(ticker.poll(next), Some(next));

        ticker.reset(next + Duration::seconds(30));
        assert_eq!(ticker.poll(next + Duration::seconds(80)), None);
    }

    #[test]
    fn test_clock_jumping_backwards_fires() {
        let start = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let mut ticker = Ticker::new(std::time::Duration::from_secs(60));
        ticker.poll(start);
        let earlier = start - Duration::hours(1);
        assert_eq!(ticker.poll(earlier), Some(earlier));
    }

    #[test]
    fn test_fixed_clock() {
        let at = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(FixedClock(at).now(), at);
    }
}
