use serde::Serialize;

/// What the reserve call-to-action currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunnelState {
    Idle,
    RetryDialog,
    Terminal,
}

/// Counts reserve attempts and degrades deterministically: the first attempt
/// gets a recoverable dialog, anything after that the outage page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFunnel {
    clicks: u32,
    retried: bool,
}

impl ReservationFunnel {
    pub fn reserve(&mut self) -> FunnelState {
        self.clicks += 1;
        self.state()
    }

    /// The retry button in the dialog is another attempt and always ends
    /// on the outage page.
    pub fn retry(&mut self) -> FunnelState {
        self.clicks += 1;
        self.retried = true;
        self.state()
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn state(&self) -> FunnelState {
        match self.clicks {
            0 => FunnelState::Idle,
            1 if !self.retried => FunnelState::RetryDialog,
            _ => FunnelState::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_step_degrade() {
        let mut funnel = ReservationFunnel::default();
        assert_eq!(funnel.state(), FunnelState::Idle);
        assert_eq!(funnel.reserve(), FunnelState::RetryDialog);
        assert_eq!(funnel.reserve(), FunnelState::Terminal);
        assert_eq!(funnel.reserve(), FunnelState::Terminal);
        assert_eq!(funnel.clicks(), 3);
    }

    #[test]
    fn test_retry_goes_straight_to_terminal() {
        let mut funnel = ReservationFunnel::default();
        funnel.reserve();
        assert_eq!(funnel.retry(), FunnelState::Terminal);
        assert_eq!(funnel.clicks(), 2);
    }

    #[test]
    fn test_closing_the_dialog_keeps_the_count() {
        let mut funnel = ReservationFunnel::default();
        funnel.reserve();
        // dialog dismissed without retry; the next reserve is the second attempt
        assert_eq!(funnel.reserve(), FunnelState::Terminal);
    }
}
