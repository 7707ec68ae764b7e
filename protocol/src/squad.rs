//! Squad slot assignment.

use serde::Serialize;
use crate::party::Party;

/// One entry of `RawSquadAssignments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquadAssignment {
  #[serde(rename = "memberId")]
  pub member_id: String,
  #[serde(rename = "absoluteMemberIdx")]
  pub absolute_member_idx: u32,
}

/// Assigns lobby slots: the leader always takes slot 0, everyone else follows
/// in member order.
pub fn assign_member_indexes(party: &Party) -> Vec<SquadAssignment> {
  let leader = party.leader_id();
  let mut assignments = Vec::with_capacity(party.members.len() + 1);

  if let Some(leader) = leader {
    assignments.push(SquadAssignment {
      member_id: leader.to_string(),
      absolute_member_idx: 0,
    });
  }

  let mut index = if leader.is_some() { 1 } else { 0 };
  for member in &party.members {
    if Some(member.account_id.as_str()) == leader {
      continue;
    }
    assignments.push(SquadAssignment {
      member_id: member.account_id.clone(),
      absolute_member_idx: index,
    });
    index += 1;
  }

  assignments
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::party::PartyMember;

  fn party(leader: Option<&str>, members: &[&str]) -> Party {
    let party = members.iter()
      .fold(Party::new("party"), |party, id| party.with_member(PartyMember::new(*id)));
    match leader {
      Some(leader) => party.with_leader(leader),
      None => party,
    }
  }

  fn slots(assignments: &[SquadAssignment]) -> Vec<(&str, u32)> {
    assignments.iter()
      .map(|a| (a.member_id.as_str(), a.absolute_member_idx))
      .collect()
  }

  #[test]
  fn it_puts_leader_first_wherever_it_joined() {
    let expected = vec![("L", 0), ("A", 1), ("B", 2), ("C", 3)];

    for members in [["L", "A", "B", "C"], ["A", "L", "B", "C"], ["A", "B", "C", "L"]] {
      let assignments = assign_member_indexes(&party(Some("L"), &members));
      assert_eq!(slots(&assignments), expected, "members {:?}", members);
    }
  }

  #[test]
  fn it_starts_at_zero_without_leader() {
    let assignments = assign_member_indexes(&party(None, &["A", "B", "C"]));
    assert_eq!(slots(&assignments), vec![("A", 0), ("B", 1), ("C", 2)]);
  }

  #[test]
  fn it_assigns_leader_missing_from_members() {
    let assignments = assign_member_indexes(&party(Some("L"), &["A", "B"]));
    assert_eq!(slots(&assignments), vec![("L", 0), ("A", 1), ("B", 2)]);
  }

  #[test]
  fn it_is_deterministic() {
    let party = party(Some("B"), &["C", "A", "B", "D"]);
    assert_eq!(assign_member_indexes(&party), assign_member_indexes(&party));
  }

  #[test]
  fn it_handles_empty_party() {
    assert!(assign_member_indexes(&party(None, &[])).is_empty());
  }
}
