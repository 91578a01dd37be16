// Domain events
//
// Services publish after a successful commit. A background dispatcher turns
// each event into an audit record and, where the guest should hear about it,
// a notification. Sink failures never reach the caller.

pub mod audit;
pub mod notification;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::bookings::models::Booking;
use crate::payments::models::{Payment, Refund};

pub use audit::{AuditRecord, AuditSink, PgAuditSink};
pub use notification::{Notification, NotificationSink, PgNotificationSink};

pub const EMAIL_CHANNEL: &str = "Email";
pub const BOOKING_CONFIRMATION_TEMPLATE: &str = "BOOKING_CONFIRMATION";
pub const BOOKING_CANCELLED_TEMPLATE: &str = "BOOKING_CANCELLED";

/// Something that happened and has already been committed
#[derive(Debug, Clone)]
pub enum DomainEvent {
    BookingCreated {
        booking: Booking,
        actor: i32,
    },
    BookingCancelled {
        before: Booking,
        after: Booking,
        refund_amount: Decimal,
        actor: i32,
    },
    BookingCompleted {
        before: Booking,
        after: Booking,
        actor: i32,
    },
    PaymentRecorded {
        payment: Payment,
        actor: i32,
    },
    RefundRecorded {
        refund: Refund,
        actor: i32,
    },
}

fn snapshot<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::BookingCreated { .. } => "BookingCreated",
            DomainEvent::BookingCancelled { .. } => "BookingCancelled",
            DomainEvent::BookingCompleted { .. } => "BookingCompleted",
            DomainEvent::PaymentRecorded { .. } => "PaymentRecorded",
            DomainEvent::RefundRecorded { .. } => "RefundRecorded",
        }
    }

    pub fn audit_record(&self) -> AuditRecord {
        match self {
            DomainEvent::BookingCreated { booking, actor } => AuditRecord {
                action: "CREATE_BOOKING",
                entity_type: "Booking",
                entity_id: booking.id,
                actor_id: *actor,
                before_state: None,
                after_state: snapshot(booking),
            },
            DomainEvent::BookingCancelled {
                before,
                after,
                actor,
                ..
            } => AuditRecord {
                action: "CANCEL_BOOKING",
                entity_type: "Booking",
                entity_id: after.id,
                actor_id: *actor,
                before_state: snapshot(before),
                after_state: snapshot(after),
            },
            DomainEvent::BookingCompleted {
                before,
                after,
                actor,
            } => AuditRecord {
                action: "COMPLETE_BOOKING",
                entity_type: "Booking",
                entity_id: after.id,
                actor_id: *actor,
                before_state: snapshot(before),
                after_state: snapshot(after),
            },
            DomainEvent::PaymentRecorded { payment, actor } => AuditRecord {
                action: "RECORD_PAYMENT",
                entity_type: "Payment",
                entity_id: payment.id,
                actor_id: *actor,
                before_state: None,
                after_state: snapshot(payment),
            },
            DomainEvent::RefundRecorded { refund, actor } => AuditRecord {
                action: "RECORD_REFUND",
                entity_type: "Refund",
                entity_id: refund.id,
                actor_id: *actor,
                before_state: None,
                after_state: snapshot(refund),
            },
        }
    }

    /// Guest-facing message for this event, if any
    pub fn notification(&self) -> Option<Notification> {
        match self {
            DomainEvent::BookingCreated { booking, .. } => Some(Notification {
                recipient: booking.guest_email.clone(),
                channel: EMAIL_CHANNEL,
                template_key: BOOKING_CONFIRMATION_TEMPLATE,
                payload: json!({
                    "booking_id": booking.id,
                    "guest_name": booking.guest_name,
                    "check_in": booking.check_in,
                    "check_out": booking.check_out,
                    "total_price": booking.total_price,
                }),
            }),
            DomainEvent::BookingCancelled {
                after,
                refund_amount,
                ..
            } => Some(Notification {
                recipient: after.guest_email.clone(),
                channel: EMAIL_CHANNEL,
                template_key: BOOKING_CANCELLED_TEMPLATE,
                payload: json!({
                    "booking_id": after.id,
                    "guest_name": after.guest_name,
                    "check_in": after.check_in,
                    "refund_amount": refund_amount,
                    "reason": after.status_reason,
                }),
            }),
            _ => None,
        }
    }
}

/// Fire-and-forget handle held by the services
#[derive(Clone)]
pub struct EventPublisher {
    tx: UnboundedSender<DomainEvent>,
}

impl EventPublisher {
    pub fn channel() -> (Self, UnboundedReceiver<DomainEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn publish(&self, event: DomainEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            warn!("Event dispatcher is gone, dropping {} event", name);
        } else {
            debug!("Published {} event", name);
        }
    }
}

/// Deliver one event to both sinks
pub async fn dispatch(event: &DomainEvent, audit: &dyn AuditSink, notifier: &dyn NotificationSink) {
    let record = event.audit_record();
    if let Err(e) = audit.record(&record).await {
        error!(
            "Failed to write audit record {} for {} {}: {}",
            record.action, record.entity_type, record.entity_id, e
        );
    }

    if let Some(notification) = event.notification() {
        if let Err(e) = notifier.notify(&notification).await {
            warn!(
                "Failed to queue {} notification for {}: {}",
                notification.template_key, notification.recipient, e
            );
        }
    }
}

pub fn spawn_dispatcher(
    mut rx: UnboundedReceiver<DomainEvent>,
    audit: Arc<dyn AuditSink>,
    notifier: Arc<dyn NotificationSink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            dispatch(&event, audit.as_ref(), notifier.as_ref()).await;
        }
        info!("Event dispatcher stopped");
    })
}
