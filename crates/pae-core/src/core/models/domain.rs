use std::fmt;

/// A contiguous residue range modelled as moving as one rigid unit.
///
/// `start` and `end` are positional identifiers from the coordinate source,
/// not sequential residue numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RigidDomain {
    pub start: i64,
    pub end: i64,
    pub segment_id: String,
}

impl RigidDomain {
    pub fn new(start: i64, end: i64, segment_id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            segment_id: segment_id.into(),
        }
    }

    /// `true` once boundary adjustments have left the range without residues.
    pub fn is_collapsed(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for RigidDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.start, self.end, self.segment_id)
    }
}

/// Rigid domains derived from one cluster, treated as a single fixed or mobile unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RigidBody {
    pub domains: Vec<RigidDomain>,
}

impl RigidBody {
    pub fn new(domains: Vec<RigidDomain>) -> Self {
        Self { domains }
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RigidDomain> {
        self.domains.iter()
    }
}

impl From<Vec<RigidDomain>> for RigidBody {
    fn from(domains: Vec<RigidDomain>) -> Self {
        Self::new(domains)
    }
}

impl<'a> IntoIterator for &'a RigidBody {
    type Item = &'a RigidDomain;
    type IntoIter = std::slice::Iter<'a, RigidDomain>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.iter()
    }
}

/// The rigid bodies to be written as constraints, split by role.
///
/// Roles follow list position: the body at position 0 is the fixed reference,
/// every later body is mobile. Empty bodies are dropped on construction, so an
/// empty body at position 0 leaves the document without a fixed reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintDocument {
    fixed: Option<RigidBody>,
    mobile: Vec<RigidBody>,
}

impl ConstraintDocument {
    pub fn new(bodies: impl IntoIterator<Item = RigidBody>) -> Self {
        let mut bodies = bodies.into_iter();
        let fixed = bodies.next().filter(|b| !b.is_empty());
        Self {
            fixed,
            mobile: bodies.filter(|b| !b.is_empty()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_none() && self.mobile.is_empty()
    }

    /// Number of bodies that will produce a block.
    pub fn len(&self) -> usize {
        usize::from(self.fixed.is_some()) + self.mobile.len()
    }

    pub fn fixed_body(&self) -> Option<&RigidBody> {
        self.fixed.as_ref()
    }

    pub fn mobile_bodies(&self) -> &[RigidBody] {
        &self.mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_domain_is_detected() {
        assert!(!RigidDomain::new(5, 5, "A").is_collapsed());
        assert!(RigidDomain::new(6, 5, "A").is_collapsed());
    }

    #[test]
    fn document_assigns_roles_by_position_and_drops_empty_bodies() {
        let document = ConstraintDocument::new(vec![
            RigidBody::new(vec![RigidDomain::new(1, 10, "A")]),
            RigidBody::default(),
            RigidBody::new(vec![RigidDomain::new(20, 30, "B")]),
        ]);
        assert_eq!(document.len(), 2);
        assert_eq!(document.fixed_body().unwrap().domains[0].segment_id, "A");
        assert_eq!(document.mobile_bodies().len(), 1);
        assert_eq!(document.mobile_bodies()[0].domains[0].start, 20);
    }

    #[test]
    fn empty_first_body_leaves_no_fixed_reference() {
        let document = ConstraintDocument::new(vec![
            RigidBody::default(),
            RigidBody::new(vec![RigidDomain::new(1, 10, "A")]),
        ]);
        assert!(document.fixed_body().is_none());
        assert_eq!(document.mobile_bodies().len(), 1);
        assert!(!document.is_empty());
    }

    #[test]
    fn empty_document_has_no_roles() {
        let document = ConstraintDocument::new(Vec::new());
        assert!(document.is_empty());
        assert!(document.fixed_body().is_none());
        assert!(document.mobile_bodies().is_empty());
    }
}
