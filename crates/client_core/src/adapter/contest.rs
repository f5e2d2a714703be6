use std::collections::BTreeMap;

use shared::{domain::ContestId, protocol::ContestJson};

use crate::model::{Contest, ContestChoice};

pub fn parse(json: &ContestJson) -> Contest {
    Contest {
        id: json.id,
        county_id: json.county_id,
        name: json.name.clone(),
        description: json.description.clone(),
        choices: json
            .choices
            .iter()
            .map(|c| ContestChoice {
                name: c.name.clone(),
                description: c.description.clone(),
            })
            .collect(),
        votes_allowed: json.votes_allowed,
    }
}

/// Indexes contests by id; later duplicates win.
pub fn pivot(contests: &[ContestJson]) -> BTreeMap<ContestId, Contest> {
    contests.iter().map(|c| (c.id, parse(c))).collect()
}
