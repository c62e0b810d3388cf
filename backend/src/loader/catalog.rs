//! Post catalog loader
//!
//! Columns: `SL_No, grade_no, desg_no, desg_nm, IT_or_General, TotalPost,
//! YearNeedtobepromoted, PromotionFromPostSL, PreviousPostPercentise`. The
//! rule columns stay free text here and are parsed by `catalog::rules`.

use super::{csv_reader, is_blank, open, required_u32, LoadError};
use crate::models::post::{OrganizationalPost, RawPost};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PostRow {
    #[serde(rename = "SL_No", default)]
    sl_no: Option<String>,
    #[serde(default)]
    grade_no: Option<String>,
    #[serde(default)]
    desg_no: Option<String>,
    #[serde(default)]
    desg_nm: Option<String>,
    #[serde(rename = "IT_or_General", default)]
    track: Option<String>,
    #[serde(rename = "TotalPost", default)]
    total_post: Option<String>,
    #[serde(rename = "YearNeedtobepromoted", default)]
    years_needed: Option<String>,
    #[serde(rename = "PromotionFromPostSL", default)]
    feeder_posts: Option<String>,
    #[serde(rename = "PreviousPostPercentise", default)]
    quota: Option<String>,
}

impl PostRow {
    fn into_raw(self, row: usize) -> Result<RawPost, LoadError> {
        let authorized_headcount = if is_blank(self.total_post.as_deref()) {
            0
        } else {
            required_u32(row, "TotalPost", &self.total_post)?
        };

        Ok(RawPost {
            seq_no: required_u32(row, "SL_No", &self.sl_no)?,
            grade_no: required_u32(row, "grade_no", &self.grade_no)?,
            desg_no: required_u32(row, "desg_no", &self.desg_no)?,
            designation_name: self.desg_nm.unwrap_or_default(),
            track: self.track,
            authorized_headcount,
            years_required: self.years_needed,
            feeder_posts: self.feeder_posts,
            promotion_quota: self.quota,
        })
    }
}

/// Read every catalog row from CSV text, parsing the rule columns
pub fn read_posts<R: Read>(reader: R) -> Result<Vec<OrganizationalPost>, LoadError> {
    let mut csv = csv_reader(reader);
    let mut posts = Vec::new();
    for (index, record) in csv.deserialize::<PostRow>().enumerate() {
        let raw = record?.into_raw(index + 1)?;
        posts.push(OrganizationalPost::from(raw));
    }
    Ok(posts)
}

/// Load the catalog file at `path`
pub fn load_posts(path: impl AsRef<Path>) -> Result<Vec<OrganizationalPost>, LoadError> {
    let path = path.as_ref();
    let posts = read_posts(open(path)?)?;
    info!(path = %path.display(), rows = posts.len(), "post catalog loaded");
    Ok(posts)
}
