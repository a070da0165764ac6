use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use sohd::errors::{Result, SohdError};
use sohd::fs::FileSystem;
use sohd::notify::{Mailer, OutgoingMail};

/// One captured `send` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub mail: OutgoingMail,
    /// Draft contents at the moment `send` was called (`None` if missing).
    pub body: Option<String>,
}

/// A fake mailer that records every mail instead of sending it.
pub struct RecordingMailer {
    fs: Arc<dyn FileSystem>,
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new(fs: Arc<dyn FileSystem>) -> (Self, Arc<Mutex<Vec<SentMail>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                fs,
                sent: Arc::clone(&sent),
                fail: false,
            },
            sent,
        )
    }

    /// Record the mail but report failure, like a mailer exiting non-zero.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Mailer for RecordingMailer {
    fn send<'a>(
        &'a mut self,
        mail: &'a OutgoingMail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let body = self.fs.read_to_string(&mail.draft).ok();
            self.sent.lock().unwrap().push(SentMail {
                mail: mail.clone(),
                body,
            });

            if self.fail {
                Err(SohdError::MailError("recording mailer told to fail".into()))
            } else {
                Ok(())
            }
        })
    }
}
