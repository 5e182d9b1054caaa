//! Asynchronous highlight color resolution
//!
//! A mode descriptor that carries a highlight id gets its cursor color
//! from an out-of-band lookup against the editor. The lookup is
//! fire-and-forget: the renderer issues a request and keeps processing
//! batches; the completion comes back as a [`ColorResolution`] message
//! that the session loop drains on the render thread between batches.
//! Completing on the render thread is what keeps mode lookups from ever
//! observing a half-written descriptor - there is no shared-state
//! mutation from a foreign completion context and no locking.
//!
//! There is no cancellation and no timeout: a request that never resolves
//! leaves that mode's color unset and cursor rendering falls back to the
//! default foreground.

use std::sync::mpsc::Sender;

use tracing::debug;

/// Completion message for one highlight-id lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorResolution {
    pub mode_name: String,
    /// Packed background color of the highlight group, when it has one
    pub background: Option<i64>,
}

/// Issues asynchronous highlight-id lookups, one per mode-info entry that
/// carries an id
pub trait ColorResolver {
    fn request(&mut self, mode_name: &str, hl_id: u64);
}

/// Resolver that answers every request through an mpsc channel
///
/// The lookup closure stands in for the editor request; the session
/// decides when to drain the receiving end, so tests can interleave
/// completions with later batches.
pub struct ChannelResolver<F> {
    lookup: F,
    tx: Sender<ColorResolution>,
}

impl<F> ChannelResolver<F>
where
    F: Fn(u64) -> Option<i64>,
{
    pub fn new(lookup: F, tx: Sender<ColorResolution>) -> Self {
        Self { lookup, tx }
    }
}

impl<F> ColorResolver for ChannelResolver<F>
where
    F: Fn(u64) -> Option<i64>,
{
    fn request(&mut self, mode_name: &str, hl_id: u64) {
        let background = (self.lookup)(hl_id);
        debug!(mode = mode_name, hl_id, ?background, "color lookup answered");
        let resolution = ColorResolution {
            mode_name: mode_name.to_string(),
            background,
        };
        if self.tx.send(resolution).is_err() {
            debug!(mode = mode_name, "resolution receiver dropped");
        }
    }
}

/// Resolver whose requests never complete
///
/// Models the editor never answering; affected modes keep rendering the
/// cursor with the default foreground.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl ColorResolver for NullResolver {
    fn request(&mut self, mode_name: &str, hl_id: u64) {
        debug!(mode = mode_name, hl_id, "dropping color lookup");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_channel_resolver_delivers_completion() {
        let (tx, rx) = mpsc::channel();
        let mut resolver = ChannelResolver::new(|hl_id| Some(hl_id as i64 * 2), tx);
        resolver.request("insert", 21);
        assert_eq!(
            rx.try_recv().unwrap(),
            ColorResolution {
                mode_name: "insert".to_string(),
                background: Some(42),
            }
        );
    }

    #[test]
    fn test_channel_resolver_reports_missing_background() {
        let (tx, rx) = mpsc::channel();
        let mut resolver = ChannelResolver::new(|_| None, tx);
        resolver.request("normal", 7);
        assert_eq!(rx.try_recv().unwrap().background, None);
    }

    #[test]
    fn test_dropped_receiver_is_not_fatal() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut resolver = ChannelResolver::new(|_| None, tx);
        resolver.request("normal", 7);
    }
}
