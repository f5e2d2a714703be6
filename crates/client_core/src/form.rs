//! Form state for the screens that submit data. Each form validates its
//! own input and produces the request body only when valid.

use std::collections::BTreeMap;

use shared::{
    domain::{AuditReason, ContestId},
    protocol::{
        AuditBoardMemberJson, ContestToAuditJson, ElectorJson, RandomSeedJson, RiskLimitJson,
    },
};

use crate::{
    adapter::{county, dos, risk_limit},
    model::{AuditBoardMember, Contest, ContestSelection, DosDashboard, Elector},
    selector::{
        county::is_valid_audit_board,
        dos::{contest_selection_warnings, SelectionWarning},
    },
};

const MIN_SEED_DIGITS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditBoardForm {
    pub members: [AuditBoardMember; 2],
}

impl AuditBoardForm {
    pub fn member_mut(&mut self, index: usize) -> Option<&mut AuditBoardMember> {
        self.members.get_mut(index)
    }

    pub fn is_valid(&self) -> bool {
        is_valid_audit_board(&self.members)
    }

    /// Names are trimmed on the way out.
    pub fn body(&self) -> Option<Vec<AuditBoardMemberJson>> {
        self.is_valid().then(|| county::format_audit_board(&self.members))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOffForm {
    pub electors: [Elector; 2],
}

impl SignOffForm {
    pub fn is_valid(&self) -> bool {
        self.electors
            .iter()
            .all(|e| !e.first_name.trim().is_empty() && !e.last_name.trim().is_empty())
    }

    pub fn body(&self) -> Option<Vec<ElectorJson>> {
        self.is_valid().then(|| county::format_electors(&self.electors))
    }
}

/// Risk limit entered as a percentage, sent as a fraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskLimitForm {
    pub percent: String,
}

impl Default for RiskLimitForm {
    fn default() -> Self {
        Self::from_fraction(risk_limit::DEFAULT_RISK_LIMIT)
    }
}

impl RiskLimitForm {
    pub fn from_fraction(fraction: f64) -> Self {
        Self {
            percent: format!("{}", risk_limit::to_percent(fraction)),
        }
    }

    pub fn value(&self) -> Option<f64> {
        let percent: f64 = self.percent.trim().trim_end_matches('%').trim().parse().ok()?;
        let fraction = risk_limit::from_percent(percent);
        risk_limit::is_in_range(fraction).then_some(fraction)
    }

    pub fn body(&self) -> Option<RiskLimitJson> {
        self.value().map(risk_limit::format)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedForm {
    pub seed: String,
}

impl SeedForm {
    pub fn is_valid(&self) -> bool {
        let seed = self.seed.trim();
        seed.len() >= MIN_SEED_DIGITS && seed.chars().all(|c| c.is_ascii_digit())
    }

    pub fn body(&self) -> Option<RandomSeedJson> {
        self.is_valid().then(|| dos::format_seed(&self.seed))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectContestsForm {
    pub selections: BTreeMap<ContestId, ContestSelection>,
}

impl SelectContestsForm {
    /// One unselected row per known contest, with contests the dashboard
    /// already lists as audited pre-selected.
    pub fn new(contests: &BTreeMap<ContestId, Contest>, dashboard: &DosDashboard) -> Self {
        let selections = contests
            .keys()
            .map(|id| {
                let audited = dashboard.audited_contests.get(id).copied();
                let selection = ContestSelection {
                    audit: audited.is_some(),
                    hand_count: dashboard.hand_count_contests.contains(id),
                    reason: audited.unwrap_or(AuditReason::CountyWideContest),
                };
                (*id, selection)
            })
            .collect();
        Self { selections }
    }

    pub fn select(&mut self, id: ContestId, reason: AuditReason) {
        let row = self.selections.entry(id).or_insert(ContestSelection {
            audit: false,
            hand_count: false,
            reason,
        });
        row.audit = true;
        row.reason = reason;
    }

    pub fn deselect(&mut self, id: ContestId) {
        if let Some(row) = self.selections.get_mut(&id) {
            row.audit = false;
            row.hand_count = false;
        }
    }

    pub fn set_hand_count(&mut self, id: ContestId, hand_count: bool) {
        if let Some(row) = self.selections.get_mut(&id) {
            row.hand_count = hand_count;
        }
    }

    pub fn warnings(&self) -> Vec<SelectionWarning> {
        contest_selection_warnings(&self.selections)
    }

    pub fn body(&self) -> Vec<ContestToAuditJson> {
        dos::format_selected_contests(&self.selections)
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::AuditType;

    use super::*;

    fn member(first: &str, last: &str, party: &str) -> AuditBoardMember {
        AuditBoardMember {
            first_name: first.into(),
            last_name: last.into(),
            party: party.into(),
        }
    }

    #[test]
    fn audit_board_body_is_trimmed() {
        let mut form = AuditBoardForm::default();
        assert!(form.body().is_none());

        *form.member_mut(0).expect("slot") = member(" Ada ", "Lovelace", "Democratic Party");
        *form.member_mut(1).expect("slot") = member("Alan", " Turing", "Unaffiliated");
        assert!(form.member_mut(2).is_none());

        let body = form.body().expect("valid");
        assert_eq!(body[0].first_name, "Ada");
        assert_eq!(body[1].last_name, "Turing");
    }

    #[test]
    fn sign_off_needs_both_names() {
        let mut form = SignOffForm::default();
        form.electors[0] = Elector {
            first_name: "A".into(),
            last_name: "B".into(),
        };
        assert!(!form.is_valid());
        form.electors[1] = Elector {
            first_name: "C".into(),
            last_name: "D".into(),
        };
        assert_eq!(form.body().map(|b| b.len()), Some(2));
    }

    #[test]
    fn risk_limit_percent_text() {
        let form = RiskLimitForm::default();
        assert_eq!(form.percent, "5");
        assert_eq!(form.value(), Some(0.05));

        let form = RiskLimitForm {
            percent: "10 %".into(),
        };
        assert_eq!(form.body().map(|b| b.risk_limit), Some(0.1));

        for bad in ["0", "100", "abc", ""] {
            let form = RiskLimitForm {
                percent: bad.into(),
            };
            assert_eq!(form.value(), None, "{bad}");
        }
    }

    #[test]
    fn seed_must_be_long_numeral() {
        let short = SeedForm {
            seed: "1234".into(),
        };
        assert!(!short.is_valid());
        let letters = SeedForm {
            seed: "0123456789abcdefghij".into(),
        };
        assert!(!letters.is_valid());
        let good = SeedForm {
            seed: " 01234567890123456789 ".into(),
        };
        assert_eq!(
            good.body().map(|b| b.seed),
            Some("01234567890123456789".to_string())
        );
    }

    #[test]
    fn contest_selection_body_and_warnings() {
        let mut form = SelectContestsForm::default();
        form.select(ContestId(1), AuditReason::StateWideContest);
        form.select(ContestId(2), AuditReason::CountyWideContest);
        form.set_hand_count(ContestId(2), true);
        assert!(form.warnings().is_empty());

        let body = form.body();
        assert_eq!(body.len(), 2);
        assert_eq!(body[1].audit, AuditType::HandCount);

        form.deselect(ContestId(1));
        assert_eq!(form.warnings(), vec![SelectionWarning::NoStateWideContest]);
    }
}
