//! Post catalog
//!
//! The catalog is the read-only set of posts for one run. It is stored in
//! ascending sequence-number order, which is also the order the promotion
//! step processes posts in (most senior first).
//!
//! # Critical Invariants
//!
//! 1. **Unique sequence numbers**: a sequence number identifies one post
//! 2. **Unique (grade, designation) keys**: an employee maps to at most one post
//! 3. **Seniority order**: `posts()` is sorted by sequence number

pub mod rules;

use crate::models::post::OrganizationalPost;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a catalog
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate post sequence number {seq_no}")]
    DuplicateSequence { seq_no: u32 },

    #[error("Duplicate post for grade {grade_no}, designation {desg_no}")]
    DuplicatePost { grade_no: u32, desg_no: u32 },
}

/// Validated, seniority-ordered set of posts
///
/// # Example
///
/// ```rust
/// use promotion_projection_core::catalog::PostCatalog;
/// use promotion_projection_core::models::post::OrganizationalPost;
///
/// let catalog = PostCatalog::new(vec![
///     OrganizationalPost::new(10, 5, 200, "Officer"),
///     OrganizationalPost::new(5, 4, 100, "Senior Officer"),
/// ])
/// .unwrap();
///
/// assert_eq!(catalog.posts()[0].seq_no, 5);
/// assert_eq!(catalog.find_by_grade(5, 200).map(|p| p.seq_no), Some(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostCatalog {
    /// Posts sorted by sequence number
    posts: Vec<OrganizationalPost>,

    /// (grade, designation) -> index into `posts`
    by_grade: HashMap<(u32, u32), usize>,
}

impl PostCatalog {
    /// Build a catalog, rejecting duplicate keys
    pub fn new(mut posts: Vec<OrganizationalPost>) -> Result<Self, CatalogError> {
        posts.sort_by_key(|p| p.seq_no);

        if let Some(pair) = posts.windows(2).find(|w| w[0].seq_no == w[1].seq_no) {
            return Err(CatalogError::DuplicateSequence {
                seq_no: pair[0].seq_no,
            });
        }

        let mut by_grade = HashMap::with_capacity(posts.len());
        for (index, post) in posts.iter().enumerate() {
            if by_grade.insert((post.grade_no, post.desg_no), index).is_some() {
                return Err(CatalogError::DuplicatePost {
                    grade_no: post.grade_no,
                    desg_no: post.desg_no,
                });
            }
        }

        Ok(Self { posts, by_grade })
    }

    /// All posts, most senior first
    pub fn posts(&self) -> &[OrganizationalPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Post matching an employee's (grade, designation)
    pub fn find_by_grade(&self, grade_no: u32, desg_no: u32) -> Option<&OrganizationalPost> {
        self.by_grade
            .get(&(grade_no, desg_no))
            .map(|&index| &self.posts[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_sequence_rejected() {
        let result = PostCatalog::new(vec![
            OrganizationalPost::new(3, 5, 1, "A"),
            OrganizationalPost::new(3, 6, 2, "B"),
        ]);
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateSequence { seq_no: 3 });
    }

    #[test]
    fn test_duplicate_grade_designation_rejected() {
        let result = PostCatalog::new(vec![
            OrganizationalPost::new(1, 5, 7, "A"),
            OrganizationalPost::new(2, 5, 7, "B"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicatePost { grade_no: 5, desg_no: 7 }
        );
    }
}
