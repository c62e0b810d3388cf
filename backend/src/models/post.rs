//! Organizational post model
//!
//! A post is one slot definition in the hierarchy (grade + designation) with
//! the rule that governs promotion into it. Posts are read-only for the whole
//! run; the sequence number orders them by seniority (lower = more senior).

use crate::catalog::rules::{
    parse_feeder_posts, parse_promotion_quota, parse_track, parse_years_required,
};
use crate::models::employee::Track;
use serde::{Deserialize, Serialize};

/// Grade number at or below which a general-track post merges both tracks
pub const MERGE_GRADE_THRESHOLD: u32 = 2;

/// A post definition with its parsed promotion rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationalPost {
    /// Unique sequence number (lower = more senior)
    pub seq_no: u32,

    pub grade_no: u32,

    pub desg_no: u32,

    pub designation_name: String,

    pub track: Track,

    /// Total authorized headcount
    pub authorized_headcount: u32,

    /// Minimum years in the feeder post before eligibility
    pub years_required: u32,

    /// Sequence numbers of the posts that feed this one
    pub feeder_posts: Vec<u32>,

    /// Share of the headcount fillable by promotion per year, in percent (0..=100)
    pub promotion_quota: u32,
}

/// A catalog row with its rule columns still in free text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPost {
    pub seq_no: u32,
    pub grade_no: u32,
    pub desg_no: u32,
    pub designation_name: String,
    pub track: Option<String>,
    pub authorized_headcount: u32,
    pub years_required: Option<String>,
    pub feeder_posts: Option<String>,
    pub promotion_quota: Option<String>,
}

impl From<RawPost> for OrganizationalPost {
    fn from(raw: RawPost) -> Self {
        Self {
            seq_no: raw.seq_no,
            grade_no: raw.grade_no,
            desg_no: raw.desg_no,
            designation_name: raw.designation_name,
            track: parse_track(raw.track.as_deref()),
            authorized_headcount: raw.authorized_headcount,
            years_required: raw.years_required.as_deref().map(parse_years_required).unwrap_or(0),
            feeder_posts: raw.feeder_posts.as_deref().map(parse_feeder_posts).unwrap_or_default(),
            promotion_quota: raw.promotion_quota.as_deref().map(parse_promotion_quota).unwrap_or(0),
        }
    }
}

impl OrganizationalPost {
    /// Create a post with no promotion rule (no feeders, zero quota)
    ///
    /// # Example
    ///
    /// ```rust
    /// use promotion_projection_core::models::post::OrganizationalPost;
    ///
    /// let post = OrganizationalPost::new(5, 4, 101, "Deputy Manager")
    ///     .with_headcount(3)
    ///     .with_rule(vec![10], 100, 3);
    /// assert!(post.accepts_promotions());
    /// assert_eq!(post.max_promotable(), 3);
    /// ```
    pub fn new(seq_no: u32, grade_no: u32, desg_no: u32, designation_name: &str) -> Self {
        Self {
            seq_no,
            grade_no,
            desg_no,
            designation_name: designation_name.to_string(),
            track: Track::General,
            authorized_headcount: 0,
            years_required: 0,
            feeder_posts: Vec::new(),
            promotion_quota: 0,
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.track = track;
        self
    }

    pub fn with_headcount(mut self, headcount: u32) -> Self {
        self.authorized_headcount = headcount;
        self
    }

    /// Set feeders, quota (capped at 100) and years required
    pub fn with_rule(mut self, feeder_posts: Vec<u32>, quota: u32, years_required: u32) -> Self {
        self.feeder_posts = feeder_posts;
        self.promotion_quota = quota.min(crate::catalog::rules::MAX_QUOTA_PERCENT);
        self.years_required = years_required;
        self
    }

    /// Posts with no feeders or a zero quota never receive promotions
    pub fn accepts_promotions(&self) -> bool {
        self.promotion_quota > 0 && !self.feeder_posts.is_empty()
    }

    /// True when both tracks compete for this post
    pub fn is_merge_point(&self) -> bool {
        self.grade_no <= MERGE_GRADE_THRESHOLD && self.track == Track::General
    }

    /// Ceiling of headcount × quota / 100
    pub fn max_promotable(&self) -> u32 {
        let scaled = u64::from(self.authorized_headcount) * u64::from(self.promotion_quota);
        scaled.div_ceil(100) as u32
    }

    /// True when `seq_no` is one of this post's feeders
    pub fn is_fed_by(&self, seq_no: u32) -> bool {
        self.feeder_posts.contains(&seq_no)
    }
}
