// src/notify/mod.rs

//! Operator notification: write a draft, hand it to the mail command, clean
//! up.
//!
//! Nothing in here is allowed to fail the caller. Each step's outcome is
//! logged and reported in a [`DispatchReport`].

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{ConfigFile, NotifySection};
use crate::fs::FileSystem;

pub mod mailer;

pub use mailer::{CommandMailer, Mailer};

/// A mail whose body lives in `draft`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub draft: PathBuf,
    pub subject: String,
    pub recipient: String,
}

/// Message text plus where and how to send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub mail: OutgoingMail,
}

impl Notification {
    /// The "daemon stopped, please restart" mail.
    pub fn daemon_stopped(notify: &NotifySection) -> Self {
        Self {
            message: notify.message.clone(),
            mail: OutgoingMail {
                draft: notify.draft.clone(),
                subject: notify.subject.clone(),
                recipient: notify.recipient.clone(),
            },
        }
    }

    /// The "no daemon is running" mail sent by `--check`.
    pub fn daemon_missing(cfg: &ConfigFile, draft: PathBuf) -> Self {
        Self {
            message: cfg.check.message.clone(),
            mail: OutgoingMail {
                draft,
                subject: cfg.check.subject.clone(),
                recipient: cfg.notify.recipient.clone(),
            },
        }
    }
}

/// What actually happened during [`dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    pub draft_written: bool,
    pub mail_sent: bool,
    pub draft_removed: bool,
}

/// Write the draft, send it, then remove the draft.
///
/// The mail is attempted even if the draft could not be written, and the
/// result of the mail command does not affect cleanup.
pub async fn dispatch<M>(
    fs: &dyn FileSystem,
    mailer: &mut M,
    notification: &Notification,
) -> DispatchReport
where
    M: Mailer + ?Sized,
{
    let mut report = DispatchReport::default();
    let draft = &notification.mail.draft;

    match fs.write(draft, notification.message.as_bytes()) {
        Ok(()) => report.draft_written = true,
        Err(err) => warn!(
            draft = %draft.display(),
            error = %err,
            "writing notification draft failed"
        ),
    }

    match mailer.send(&notification.mail).await {
        Ok(()) => {
            report.mail_sent = true;
            info!(
                recipient = %notification.mail.recipient,
                subject = %notification.mail.subject,
                "operator notification sent"
            );
        }
        Err(err) => warn!(
            recipient = %notification.mail.recipient,
            error = %err,
            "sending operator notification failed"
        ),
    }

    match fs.remove_file(draft) {
        Ok(()) => report.draft_removed = true,
        Err(err) => debug!(
            draft = %draft.display(),
            error = %err,
            "removing notification draft failed"
        ),
    }

    report
}
