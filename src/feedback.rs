use tracing::debug;

/// Device feedback for counting. Implementations must never fail back
/// into the mutation path; a missing device is a silent no-op.
pub trait Feedback: Send {
    fn tone(&self);
    fn pulse(&self);
}

pub struct NoopFeedback;

impl Feedback for NoopFeedback {
    fn tone(&self) {}

    fn pulse(&self) {}
}

/// Server-side stand-in: the actual tone and vibration happen in the
/// browser, so the binary only traces the cue.
pub struct TraceFeedback;

impl Feedback for TraceFeedback {
    fn tone(&self) {
        debug!("feedback tone");
    }

    fn pulse(&self) {
        debug!("feedback pulse");
    }
}
