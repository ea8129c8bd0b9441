use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::{error, info, warn};

use docket_db::Database;
use docket_db::models::UserRow;
use docket_types::models::Case;

use crate::transport::{EmailTransport, SmsTransport};

const EMAIL_SUBJECT: &str = "Upcoming Case Hearing";

#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Local wall-clock hour (0-23) at which the daily sweep fires.
    pub hour: u32,
    /// Look-ahead window in days. Only cases with a hearing between today
    /// and today + window are notified, so nobody gets re-notified about a
    /// hearing months away every single morning.
    pub window_days: i64,
    /// Upper bound on each email/SMS dispatch.
    pub dispatch_timeout: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            hour: 9,
            window_days: 7,
            dispatch_timeout: Duration::from_secs(30),
        }
    }
}

/// Daily notification sweep: queries upcoming hearings and fans out to the
/// email and SMS channels. One channel failing for one case never blocks
/// the rest of the run; only a store failure aborts it.
pub struct Sweeper {
    db: Arc<Database>,
    email: Arc<dyn EmailTransport>,
    sms: Arc<dyn SmsTransport>,
    config: SweepConfig,
    in_progress: AtomicBool,
}

impl Sweeper {
    pub fn new(
        db: Arc<Database>,
        email: Arc<dyn EmailTransport>,
        sms: Arc<dyn SmsTransport>,
        config: SweepConfig,
    ) -> Self {
        Self {
            db,
            email,
            sms,
            config,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Scheduler loop: sleep until the configured local hour, sweep, repeat.
    /// Spawned once at startup and aborted at shutdown.
    pub async fn run_daily(self: Arc<Self>) {
        loop {
            let wait = until_next_run(Local::now().naive_local(), self.config.hour);
            info!("next notification sweep in {}s", wait.as_secs());
            tokio::time::sleep(wait).await;

            match self.sweep().await {
                Ok(count) => info!("notification sweep complete, {count} cases notified"),
                Err(e) => error!("notification sweep aborted: {e:#}"),
            }
        }
    }

    /// One sweep pass. Returns the number of cases for which dispatch was
    /// attempted. Skips (with a warning) if a previous pass is still going.
    pub async fn sweep(&self) -> anyhow::Result<usize> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            warn!("previous sweep still in progress, skipping this trigger");
            return Ok(0);
        }
        let result = self.sweep_inner().await;
        self.in_progress.store(false, Ordering::SeqCst);
        result
    }

    async fn sweep_inner(&self) -> anyhow::Result<usize> {
        let today = Local::now().date_naive();
        let until = today + chrono::Duration::days(self.config.window_days);

        let db = self.db.clone();
        let cases = tokio::task::spawn_blocking(move || db.cases_due_between(today, until))
            .await??;
        info!(
            "sweep: {} cases with hearings between {today} and {until}",
            cases.len()
        );

        let mut notified = 0;
        for case in cases {
            let db = self.db.clone();
            let owner_id = case.user_id;
            let owner = tokio::task::spawn_blocking(move || db.find_user_by_id(owner_id)).await??;

            let Some(owner) = owner else {
                warn!(
                    case_id = case.case_id,
                    user_id = case.user_id,
                    "case owner missing, skipping"
                );
                continue;
            };

            self.notify_case(&case, &owner).await;
            notified += 1;
        }

        Ok(notified)
    }

    /// Dispatch the email/SMS pair for one case, back to back so two cases'
    /// channel calls are never interleaved. Failures are logged per channel
    /// and swallowed.
    async fn notify_case(&self, case: &Case, owner: &UserRow) {
        let body = format!(
            "Hello {},\nYour case '{}' has next hearing on {}.\nStatus: {}",
            owner.name, case.case_details, case.next_hearing_date, case.status
        );

        match tokio::time::timeout(
            self.config.dispatch_timeout,
            self.email.send(&owner.email, EMAIL_SUBJECT, &body),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(
                case_id = case.case_id,
                user_id = owner.id,
                channel = "email",
                "dispatch failed: {e}"
            ),
            Err(_) => error!(
                case_id = case.case_id,
                user_id = owner.id,
                channel = "email",
                "dispatch timed out"
            ),
        }

        match tokio::time::timeout(
            self.config.dispatch_timeout,
            self.sms.send(&owner.mobile, &body),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(
                case_id = case.case_id,
                user_id = owner.id,
                channel = "sms",
                "dispatch failed: {e}"
            ),
            Err(_) => error!(
                case_id = case.case_id,
                user_id = owner.id,
                channel = "sms",
                "dispatch timed out"
            ),
        }
    }
}

/// Time until the next occurrence of `hour:00` local time, strictly in the
/// future.
fn until_next_run(now: NaiveDateTime, hour: u32) -> Duration {
    let hour = hour.min(23);
    let Some(today_run) = now.date().and_hms_opt(hour, 0, 0) else {
        return Duration::from_secs(3600);
    };

    let next = if now < today_run {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };

    (next - now).to_std().unwrap_or_default()
}
