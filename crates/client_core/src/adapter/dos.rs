use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use shared::{
    domain::{AuditType, ContestId},
    protocol::{AuditInfoJson, ContestToAuditJson, DosDashboardJson, RandomSeedJson},
};

use super::{county, format_timestamp, parse_timestamp};
use crate::model::{ContestSelection, DosDashboard, Election};

pub fn parse_dashboard(json: &DosDashboardJson) -> DosDashboard {
    let no_defs = BTreeMap::new();
    let info = json.audit_info.clone().unwrap_or_default();

    DosDashboard {
        asm_state: json.asm_state,
        audited_contests: json.audited_contests.clone(),
        audit_types: json.audit_types.clone(),
        county_status: json
            .county_status
            .iter()
            .map(|(id, status)| (*id, county::parse_dashboard(status, &no_defs)))
            .collect(),
        discrepancy_counts: json.discrepancy_count.clone(),
        estimated_ballots_to_audit: json.estimated_ballots_to_audit.clone(),
        hand_count_contests: json.hand_count_contests.clone(),
        election: json.audit_info.as_ref().map(county::parse_election),
        public_meeting_date: parse_timestamp(info.public_meeting_date.as_deref()),
        risk_limit: info.risk_limit,
        seed: info.seed,
    }
}

pub fn format_audit_info(
    election: &Election,
    public_meeting_date: Option<&DateTime<Utc>>,
    risk_limit: Option<f64>,
) -> AuditInfoJson {
    AuditInfoJson {
        election_date: election.date.as_ref().map(format_timestamp),
        election_type: election.kind,
        public_meeting_date: public_meeting_date.map(format_timestamp),
        risk_limit,
        seed: None,
    }
}

pub fn format_seed(seed: &str) -> RandomSeedJson {
    RandomSeedJson {
        seed: seed.trim().to_string(),
    }
}

/// Only contests marked for audit are sent. Hand-count selections are
/// sent with the hand-count audit type.
pub fn format_selected_contests(
    selections: &BTreeMap<ContestId, ContestSelection>,
) -> Vec<ContestToAuditJson> {
    selections
        .iter()
        .filter(|(_, s)| s.audit)
        .map(|(id, s)| ContestToAuditJson {
            contest: *id,
            reason: s.reason,
            audit: if s.hand_count {
                AuditType::HandCount
            } else {
                AuditType::Comparison
            },
        })
        .collect()
}
