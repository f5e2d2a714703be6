//! The audit board's ballot-by-ballot flow.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStage {
    Start,
    List,
    BallotAudit,
    Review,
}

impl WizardStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::List => "list",
            Self::BallotAudit => "ballot-audit",
            Self::Review => "review",
        }
    }
}

type TransitionTable = [(WizardStage, WizardStage); 4];

pub const NEXT: TransitionTable = [
    (WizardStage::Start, WizardStage::List),
    (WizardStage::List, WizardStage::BallotAudit),
    (WizardStage::BallotAudit, WizardStage::Review),
    (WizardStage::Review, WizardStage::BallotAudit),
];

pub const PREV: TransitionTable = [
    (WizardStage::Start, WizardStage::Start),
    (WizardStage::List, WizardStage::Start),
    (WizardStage::BallotAudit, WizardStage::List),
    (WizardStage::Review, WizardStage::BallotAudit),
];

fn lookup(table: &TransitionTable, stage: WizardStage) -> WizardStage {
    table
        .iter()
        .find(|(from, _)| *from == stage)
        .map(|(_, to)| *to)
        .unwrap_or(stage)
}

/// Local to one audit session; never stored in [`crate::state::AppState`].
/// Whether the round is over is decided by the county selectors, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditWizard {
    stage: WizardStage,
}

impl Default for AuditWizard {
    fn default() -> Self {
        Self {
            stage: WizardStage::Start,
        }
    }
}

impl AuditWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn next_stage(&mut self) -> WizardStage {
        self.stage = lookup(&NEXT, self.stage);
        self.stage
    }

    pub fn prev_stage(&mut self) -> WizardStage {
        self.stage = lookup(&PREV, self.stage);
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_between_audit_and_review() {
        let mut wizard = AuditWizard::new();
        let stages: Vec<_> = (0..5).map(|_| wizard.next_stage().as_str()).collect();
        assert_eq!(
            stages,
            vec!["list", "ballot-audit", "review", "ballot-audit", "review"]
        );
    }

    #[test]
    fn prev_walks_back_to_start_and_stays() {
        let mut wizard = AuditWizard::new();
        wizard.next_stage();
        wizard.next_stage();
        wizard.next_stage();
        assert_eq!(wizard.stage(), WizardStage::Review);
        assert_eq!(wizard.prev_stage(), WizardStage::BallotAudit);
        assert_eq!(wizard.prev_stage(), WizardStage::List);
        assert_eq!(wizard.prev_stage(), WizardStage::Start);
        assert_eq!(wizard.prev_stage(), WizardStage::Start);
    }

    #[test]
    fn tables_cover_every_stage() {
        for stage in [
            WizardStage::Start,
            WizardStage::List,
            WizardStage::BallotAudit,
            WizardStage::Review,
        ] {
            assert!(NEXT.iter().any(|(from, _)| *from == stage));
            assert!(PREV.iter().any(|(from, _)| *from == stage));
        }
    }
}
