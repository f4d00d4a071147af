// Expiry math and the injectable clock
use chrono::{DateTime, Duration, Utc};

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Credentials are usable for `min_duration_secs` more seconds only if they
/// expire strictly after `now + min_duration_secs`.
pub fn is_fresh(now: DateTime<Utc>, min_duration_secs: u32, expires_at: DateTime<Utc>) -> bool {
    now + Duration::seconds(i64::from(min_duration_secs)) < expires_at
}

pub fn format_time_remaining(now: DateTime<Utc>, expires_at: &DateTime<Utc>) -> String {
    if *expires_at <= now {
        return "EXPIRED".to_string();
    }

    let duration = (*expires_at - now).num_seconds();
    let hours = duration / 3600;
    let minutes = (duration % 3600) / 60;
    let seconds = duration % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
