use nexus_kernel::Notification;
use url::Url;

/// Shows a message to the player. Called synchronously; the loop carries on
/// with the tick as soon as it returns.
pub trait Notifier {
    fn notify(&mut self, notification: &Notification);
}

/// Leaves the game for an external site. The loop stops after calling it.
pub trait Handoff {
    fn exit_process(&mut self, url: &Url);
}

/// Notifier that writes each message to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: &Notification) {
        tracing::info!(target: "nexus::notify", "{notification}");
    }
}

/// Hand-off that only logs the destination.
#[derive(Debug, Default)]
pub struct LogHandoff;

impl Handoff for LogHandoff {
    fn exit_process(&mut self, url: &Url) {
        tracing::info!(%url, "handing off to external site");
    }
}
