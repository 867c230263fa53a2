//! Member-selection criteria for the object graph walker.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::{MemberKind, Visibility};

/// Which declared visibilities the walker considers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityScope {
    Public,
    NonPublic,
    All,
}

impl VisibilityScope {
    /// Whether a member with the given visibility falls inside this scope.
    pub fn admits(self, visibility: Visibility) -> bool {
        match self {
            Self::Public => visibility == Visibility::Public,
            Self::NonPublic => visibility == Visibility::NonPublic,
            Self::All => true,
        }
    }
}

/// Configuration for the object graph walker. Immutable per comparison call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Consider field members.
    pub include_fields: bool,
    /// Consider property members.
    pub include_properties: bool,
    /// Visibility scope for considered members.
    pub visibility: VisibilityScope,
    /// Raw member names to skip entirely.
    pub excluded_names: BTreeSet<String>,
    /// When set, members present on the actual side but absent on the
    /// expected side are not reported.
    pub ignore_extra_members: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            include_fields: true,
            include_properties: true,
            visibility: VisibilityScope::Public,
            excluded_names: BTreeSet::new(),
            ignore_extra_members: false,
        }
    }
}

impl Criteria {
    /// Build criteria, failing fast on a selection that can never admit a
    /// member.
    pub fn new(
        include_fields: bool,
        include_properties: bool,
        visibility: VisibilityScope,
        excluded_names: BTreeSet<String>,
        ignore_extra_members: bool,
    ) -> Result<Self, TypeError> {
        if !include_fields && !include_properties {
            return Err(TypeError::InvalidCriteria(
                "neither fields nor properties are included".into(),
            ));
        }
        Ok(Self {
            include_fields,
            include_properties,
            visibility,
            excluded_names,
            ignore_extra_members,
        })
    }

    /// Public fields only.
    pub fn fields() -> Self {
        Self {
            include_properties: false,
            ..Self::default()
        }
    }

    /// Every member, regardless of kind or visibility.
    pub fn all_members() -> Self {
        Self {
            visibility: VisibilityScope::All,
            ..Self::default()
        }
    }

    /// Whether a member with the given kind, visibility and raw name is
    /// admitted by this criteria.
    pub fn admits(&self, kind: MemberKind, visibility: Visibility, raw_name: &str) -> bool {
        let kind_ok = match kind {
            MemberKind::Field => self.include_fields,
            MemberKind::Property => self.include_properties,
        };
        kind_ok && self.visibility.admits(visibility) && !self.excluded_names.contains(raw_name)
    }
}
