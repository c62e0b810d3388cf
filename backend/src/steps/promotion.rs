//! Promotion step
//!
//! Once per simulated year, at the checkpoint, posts are processed from most
//! senior (lowest sequence number) to most junior. For each post:
//!
//! ```text
//! 1. Skip if quota is 0 or there are no feeders
//! 2. occupants   = active employees in the post
//! 3. max         = ceil(headcount × quota / 100)
//! 4. vacancy     = headcount − occupants            (skip if ≤ 0)
//! 5. slots       = min(vacancy, max(0, max − occupants))  (skip if ≤ 0)
//! 6. candidates  = active employees in any feeder post
//!                  (same track only, unless the post is a merge point)
//! 7. eligible    = candidates with tenure ≥ years required
//! 8. rank        = original grade ↑, seniority rank ↑ (absent last), emp_id ↑
//! 9. winners     = first `slots` eligible candidates
//! ```
//!
//! Winners move into the post immediately. Posts processed later in the same
//! year therefore no longer see them in their feeder pools, which makes the
//! processing order part of the semantics.

use crate::catalog::PostCatalog;
use crate::core::calendar::tenure_years;
use crate::models::employee::{Employee, Track};
use crate::models::event::{GradeLabel, PredictedEvent};
use crate::models::post::OrganizationalPost;
use crate::models::roster::{Roster, RosterMember};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Number of promotions a post can take this year
///
/// Returns 0 when the post is full, has no promotion rule, or its quota is
/// already consumed by current occupants.
pub fn promotion_slots(post: &OrganizationalPost, occupants: usize) -> usize {
    if !post.accepts_promotions() {
        return 0;
    }
    let headcount = post.authorized_headcount as usize;
    if occupants >= headcount {
        return 0;
    }
    let vacancy = headcount - occupants;
    let quota_room = (post.max_promotable() as usize).saturating_sub(occupants);
    vacancy.min(quota_room)
}

/// Track winners of this post compete on from now on
pub fn target_track(post: &OrganizationalPost) -> Track {
    post.track
}

/// Candidate ordering: original grade, then seniority rank, then employee ID
pub fn rank_candidates(a: &Employee, b: &Employee) -> Ordering {
    a.grade_no
        .cmp(&b.grade_no)
        .then_with(|| {
            let a_rank = a.seniority_rank.unwrap_or(u32::MAX);
            let b_rank = b.seniority_rank.unwrap_or(u32::MAX);
            a_rank.cmp(&b_rank)
        })
        .then_with(|| a.emp_id.cmp(&b.emp_id))
}

fn is_candidate(member: &RosterMember, post: &OrganizationalPost, checkpoint: NaiveDate) -> bool {
    if !member.is_active() {
        return false;
    }
    let fed = match member.state.post().seq_no() {
        Some(seq_no) => post.is_fed_by(seq_no),
        None => false,
    };
    if !fed {
        return false;
    }
    if !post.is_merge_point() && member.state.track() != target_track(post) {
        return false;
    }
    tenure_years(member.state.last_promotion(), checkpoint) >= f64::from(post.years_required)
}

/// Fill one post; returns the events for its winners
pub fn promote_into(
    roster: &mut Roster,
    post: &OrganizationalPost,
    checkpoint: NaiveDate,
) -> Vec<PredictedEvent> {
    let slots = promotion_slots(post, roster.occupants_of(post.seq_no));
    if slots == 0 {
        return Vec::new();
    }

    let members = roster.members_mut();
    let mut eligible: Vec<usize> = members
        .iter()
        .enumerate()
        .filter(|(_, member)| is_candidate(member, post, checkpoint))
        .map(|(index, _)| index)
        .collect();
    eligible.sort_by(|&a, &b| rank_candidates(&members[a].employee, &members[b].employee));
    eligible.truncate(slots);

    let new_track = if post.is_merge_point() {
        Track::General
    } else {
        target_track(post)
    };

    let mut events = Vec::with_capacity(eligible.len());
    for index in eligible {
        let winner = &mut members[index];
        events.push(PredictedEvent {
            emp_id: winner.employee.emp_id.clone(),
            name: winner.employee.name.clone(),
            from_grade: GradeLabel::Grade(winner.state.grade_no()),
            to_grade: GradeLabel::Grade(post.grade_no),
            new_designation: post.designation_name.clone(),
            predicted_date: checkpoint,
        });
        winner.state.promote(post.grade_no, post.seq_no, new_track, checkpoint);
    }
    events
}

/// Run the promotion step for every post, most senior first
pub fn run_promotions(
    roster: &mut Roster,
    catalog: &PostCatalog,
    checkpoint: NaiveDate,
) -> Vec<PredictedEvent> {
    let mut events = Vec::new();
    for post in catalog.posts() {
        events.extend(promote_into(roster, post, checkpoint));
    }
    events
}
