// src/notify/mailer.rs

//! Mail-sending backends.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, SohdError};
use crate::fs::FileSystem;
use crate::notify::OutgoingMail;

/// Trait abstracting how a drafted mail leaves the machine.
///
/// Production code uses [`CommandMailer`]; tests record what would have been
/// sent.
pub trait Mailer: Send {
    fn send<'a>(
        &'a mut self,
        mail: &'a OutgoingMail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Pipes the draft into a `mailx`-compatible command:
/// `<program> -s <subject> <recipient>`.
#[derive(Debug, Clone)]
pub struct CommandMailer {
    program: String,
    fs: Arc<dyn FileSystem>,
}

impl CommandMailer {
    pub fn new(program: impl Into<String>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            program: program.into(),
            fs,
        }
    }

    async fn send_inner(&self, mail: &OutgoingMail) -> Result<()> {
        let body = self.fs.read_to_string(&mail.draft)?;

        debug!(
            program = %self.program,
            recipient = %mail.recipient,
            subject = %mail.subject,
            "invoking mail command"
        );

        let mut child = Command::new(&self.program)
            .arg("-s")
            .arg(&mail.subject)
            .arg(&mail.recipient)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| SohdError::MailError(format!("spawning '{}': {e}", self.program)))?;

        let mut write_result = Ok(());
        if let Some(mut stdin) = child.stdin.take() {
            write_result = match stdin.write_all(body.as_bytes()).await {
                Ok(()) => stdin.shutdown().await,
                Err(err) => Err(err),
            };
            // Dropping closes the pipe so the mailer sees EOF.
        }

        // Reap the child even when it stopped reading early.
        let status = child.wait().await?;
        info!(
            program = %self.program,
            recipient = %mail.recipient,
            exit_code = ?status.code(),
            "mail command finished"
        );

        if let Err(err) = write_result {
            return Err(SohdError::MailError(format!(
                "piping draft into '{}' failed ({err}); it exited with {:?}",
                self.program,
                status.code()
            )));
        }

        if !status.success() {
            return Err(SohdError::MailError(format!(
                "'{}' exited with {:?}",
                self.program,
                status.code()
            )));
        }

        Ok(())
    }
}

impl Mailer for CommandMailer {
    fn send<'a>(
        &'a mut self,
        mail: &'a OutgoingMail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.send_inner(mail))
    }
}
