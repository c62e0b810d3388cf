//! Roster container
//!
//! The roster holds every participating employee together with the career
//! state the engine mutates. One roster lives for exactly one run: the
//! orchestrator owns it and lends it to each step.
//!
//! Members keep the order of the input snapshot. Steps that emit events
//! without a ranking (retirements) emit them in this order, which keeps
//! output deterministic.

use crate::models::employee::{CareerState, Employee};

/// One employee and their career state for the run
#[derive(Debug, Clone, PartialEq)]
pub struct RosterMember {
    pub employee: Employee,
    pub state: CareerState,
}

impl RosterMember {
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

/// All employees taking part in one run
///
/// # Example
///
/// ```rust
/// use promotion_projection_core::models::roster::Roster;
///
/// let roster = Roster::new(Vec::new());
/// assert_eq!(roster.len(), 0);
/// assert_eq!(roster.num_active(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    members: Vec<RosterMember>,
}

impl Roster {
    pub fn new(members: Vec<RosterMember>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [RosterMember] {
        &mut self.members
    }

    /// Get reference to a member by employee ID
    pub fn get(&self, emp_id: &str) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.employee.emp_id == emp_id)
    }

    /// Number of members who have not retired
    pub fn num_active(&self) -> usize {
        self.members.iter().filter(|m| m.is_active()).count()
    }

    /// Number of active members occupying the post with this sequence number
    pub fn occupants_of(&self, seq_no: u32) -> usize {
        self.members
            .iter()
            .filter(|m| m.is_active() && m.state.post().is(seq_no))
            .count()
    }
}
