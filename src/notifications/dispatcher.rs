use std::{sync::Arc, time::Duration};

use time::{macros::format_description, OffsetDateTime};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::sms::SmsSender;
use crate::{appointments::repo_types::Appointment, users::repo_types::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentEvent {
    Booked,
    Cancelled,
}

impl AppointmentEvent {
    fn headline(self) -> &'static str {
        match self {
            AppointmentEvent::Booked => "Appointment Confirmed",
            AppointmentEvent::Cancelled => "Appointment Cancelled",
        }
    }
}

fn format_when(at: OffsetDateTime) -> String {
    let fmt = format_description!(
        "[month repr:short] [day padding:none] at [hour repr:12 padding:none]:[minute] [period]"
    );
    at.format(fmt).unwrap_or_else(|_| at.to_string())
}

pub fn appointment_message(event: AppointmentEvent, patient: &User, apt: &Appointment) -> String {
    format!(
        "{}: {} with {} on {}.",
        event.headline(),
        apt.service,
        patient.full_name,
        format_when(apt.start_time)
    )
}

/// Fire-and-forget SMS delivery.
///
/// Each message runs on its own task bounded by `timeout`; the outcome is only
/// logged and never reaches the operation that triggered it.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn SmsSender>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(sender: Arc<dyn SmsSender>, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    /// Returns the detached task, or `None` when the patient has no phone.
    pub fn notify_appointment(
        &self,
        event: AppointmentEvent,
        patient: &User,
        apt: &Appointment,
    ) -> Option<JoinHandle<()>> {
        let Some(phone) = patient.phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            info!(user_id = %patient.id, appointment_id = %apt.id, "sms not sent: patient has no phone number");
            return None;
        };
        let message = appointment_message(event, patient, apt);
        Some(self.dispatch(apt.id, phone.to_string(), message))
    }

    fn dispatch(&self, appointment_id: Uuid, phone: String, message: String) -> JoinHandle<()> {
        let sender = Arc::clone(&self.sender);
        let limit = self.timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(limit, sender.send(&phone, &message)).await {
                Ok(Ok(())) => info!(%appointment_id, "sms sent"),
                Ok(Err(e)) => error!(%appointment_id, error = %e, "sms delivery failed"),
                Err(_) => warn!(%appointment_id, timeout_secs = limit.as_secs(), "sms delivery timed out"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        appointments::repo_types::AppointmentStatus,
        memory::{FailingSms, RecordingSms, SlowSms},
        users::repo_types::Role,
    };
    use time::macros::datetime;

    fn patient(phone: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Jane Roe".into(),
            email: "jane@example.com".into(),
            password_hash: String::new(),
            role: Role::Client,
            phone: phone.map(Into::into),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn appointment(patient: &User) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            patient_name: patient.full_name.clone(),
            start_time: datetime!(2024-07-02 15:04 UTC),
            end_time: datetime!(2024-07-02 15:34 UTC),
            service: "Cleaning".into(),
            status: AppointmentStatus::scheduled(),
        }
    }

    #[test]
    fn formats_booking_and_cancellation_messages() {
        let p = patient(Some("+15555550100"));
        let apt = appointment(&p);
        assert_eq!(
            appointment_message(AppointmentEvent::Booked, &p, &apt),
            "Appointment Confirmed: Cleaning with Jane Roe on Jul 2 at 3:04 PM."
        );
        assert_eq!(
            appointment_message(AppointmentEvent::Cancelled, &p, &apt),
            "Appointment Cancelled: Cleaning with Jane Roe on Jul 2 at 3:04 PM."
        );
    }

    #[tokio::test]
    async fn skips_patient_without_phone() {
        let (sms, mut rx) = RecordingSms::new();
        let notifier = Notifier::new(Arc::new(sms), Duration::from_secs(1));
        let p = patient(None);
        assert!(notifier
            .notify_appointment(AppointmentEvent::Booked, &p, &appointment(&p))
            .is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn delivers_to_patient_phone() {
        let (sms, mut rx) = RecordingSms::new();
        let notifier = Notifier::new(Arc::new(sms), Duration::from_secs(1));
        let p = patient(Some("+15555550100"));
        let handle = notifier
            .notify_appointment(AppointmentEvent::Booked, &p, &appointment(&p))
            .expect("task spawned");
        handle.await.unwrap();
        let sent = rx.recv().await.unwrap();
        assert_eq!(sent.phone, "+15555550100");
        assert!(sent.message.starts_with("Appointment Confirmed"));
    }

    #[tokio::test]
    async fn failures_and_timeouts_stay_inside_the_task() {
        let p = patient(Some("+15555550100"));
        let apt = appointment(&p);

        let failing = Notifier::new(Arc::new(FailingSms), Duration::from_secs(1));
        let handle = failing
            .notify_appointment(AppointmentEvent::Booked, &p, &apt)
            .unwrap();
        assert!(handle.await.is_ok());

        let slow = Notifier::new(Arc::new(SlowSms), Duration::from_millis(20));
        let handle = slow
            .notify_appointment(AppointmentEvent::Cancelled, &p, &apt)
            .unwrap();
        assert!(handle.await.is_ok());
    }
}
