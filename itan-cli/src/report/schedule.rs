//! Weekly report schedule

use std::future::Future;

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::config::ScheduleConfig;

/// "Every <weekday> at <time>" in a fixed timezone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub time: NaiveTime,
    pub tz: Tz,
}

impl WeeklySchedule {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Ok(Self {
            weekday: config.parsed_weekday()?,
            time: config.parsed_time()?,
            tz: config.parsed_timezone()?,
        })
    }

    /// First scheduled instant strictly after `now`
    pub fn next_after(&self, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let today = now.date_naive();
        // Two weeks covers a run skipped by a DST gap
        (0..=14)
            .map(|offset| today + Duration::days(offset))
            .filter(|day| day.weekday() == self.weekday)
            .filter_map(|day| self.tz.from_local_datetime(&day.and_time(self.time)).earliest())
            .find(|candidate| *candidate > now)
    }
}

impl std::fmt::Display for WeeklySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "every {} at {} ({})", self.weekday, self.time.format("%H:%M"), self.tz)
    }
}

/// Run `job` at every scheduled instant until `shutdown` resolves.
/// A failing run is logged and the schedule carries on.
pub async fn run_weekly<F, Fut>(schedule: WeeklySchedule, mut job: F, shutdown: impl Future<Output = ()>) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    tokio::pin!(shutdown);

    loop {
        let now = Utc::now().with_timezone(&schedule.tz);
        let next = schedule
            .next_after(now)
            .ok_or_else(|| anyhow::anyhow!("No upcoming run for schedule {}", schedule))?;
        let wait = (next - now).to_std().unwrap_or_default();
        log::info!("Next report at {}", next.format("%Y-%m-%d %H:%M %Z"));

        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Report scheduler stopped");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {}
        }

        match job().await {
            Ok(()) => log::info!("Scheduled report completed"),
            Err(e) => log::error!("Scheduled report failed: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    fn monday_eight() -> WeeklySchedule {
        WeeklySchedule {
            weekday: Weekday::Mon,
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            tz: Kolkata,
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Kolkata.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_next_run_later_the_same_day() {
        // 2024-06-03 is a Monday
        let next = monday_eight().next_after(local(2024, 6, 3, 7, 59)).unwrap();
        assert_eq!(next, local(2024, 6, 3, 8, 0));
    }

    #[test]
    fn test_next_run_rolls_to_following_week() {
        let schedule = monday_eight();
        assert_eq!(schedule.next_after(local(2024, 6, 3, 8, 0)).unwrap(), local(2024, 6, 10, 8, 0));
        assert_eq!(schedule.next_after(local(2024, 6, 5, 12, 0)).unwrap(), local(2024, 6, 10, 8, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(monday_eight().to_string(), "every Mon at 08:00 (Asia/Kolkata)");
    }

    #[tokio::test]
    async fn test_scheduler_stops_on_shutdown() {
        let mut runs = 0;
        run_weekly(
            monday_eight(),
            || {
                runs += 1;
                async { Ok(()) }
            },
            async {},
        )
        .await
        .unwrap();
        assert_eq!(runs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_keeps_running_after_failed_job() {
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let mut stop = Some(stop);
        let mut runs = 0;
        run_weekly(
            monday_eight(),
            || {
                runs += 1;
                let result = if runs == 1 {
                    Err(anyhow::anyhow!("SMTP server unreachable"))
                } else {
                    if let Some(stop) = stop.take() {
                        let _ = stop.send(());
                    }
                    Ok(())
                };
                async move { result }
            },
            async move {
                let _ = stopped.await;
            },
        )
        .await
        .unwrap();
        assert_eq!(runs, 2);
    }
}
