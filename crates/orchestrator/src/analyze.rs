//! Topology analysis of live networks
//!
//! Reads network memberships back from a runtime, treats each non-empty
//! network as a base and reports on the complex they generate.

use complex::{Base, Skeleton, TopologyReport, VertexIndex};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The resources attached to one live network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub network: String,
    pub members: Vec<String>,
}

impl Membership {
    pub fn new<I, S>(network: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            network: network.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resource names indexed in first-discovery order
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: IndexSet<String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, assigning the next one on first sight
    pub fn index(&mut self, name: &str) -> VertexIndex {
        let position = match self.names.get_index_of(name) {
            Some(position) => position,
            None => self.names.insert_full(name.to_string()).0,
        };
        VertexIndex(position as i64)
    }

    pub fn name(&self, vertex: VertexIndex) -> Option<&str> {
        let position = usize::try_from(vertex.get()).ok()?;
        self.names.get_index(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One base per non-empty membership, in input order
pub fn bases_from_memberships(memberships: &[Membership], names: &mut NameIndex) -> Vec<Base> {
    memberships
        .iter()
        .filter(|m| {
            if m.members.is_empty() {
                debug!(network = %m.network, "Skipping empty network");
            }
            !m.members.is_empty()
        })
        .map(|m| m.members.iter().map(|name| names.index(name)).collect::<Base>())
        .collect()
}

/// Report on the complex generated by `memberships`, or `None` when no network has members
pub fn analyze(memberships: &[Membership]) -> Option<TopologyReport> {
    let mut names = NameIndex::new();
    let bases = bases_from_memberships(memberships, &mut names);
    if bases.is_empty() {
        return None;
    }

    let skeleton = Skeleton::from_bases(bases);
    Some(TopologyReport::with_labels(&skeleton, |v| {
        names.name(v).map(str::to_string).unwrap_or_else(|| v.to_string())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_indexed_by_first_discovery() {
        let mut names = NameIndex::new();
        assert_eq!(names.index("web"), VertexIndex(0));
        assert_eq!(names.index("db"), VertexIndex(1));
        assert_eq!(names.index("web"), VertexIndex(0));
        assert_eq!(names.name(VertexIndex(1)), Some("db"));
        assert_eq!(names.name(VertexIndex(-1)), None);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_empty_networks_are_skipped() {
        let memberships = vec![
            Membership::new("none", Vec::<String>::new()),
            Membership::new("pair", ["a", "b"]),
        ];
        let mut names = NameIndex::new();
        let bases = bases_from_memberships(&memberships, &mut names);
        assert_eq!(bases, vec![Base::new([0, 1])]);
    }

    #[test]
    fn test_analyze_ring_of_services() {
        let memberships = vec![
            Membership::new("n1", ["web", "api"]),
            Membership::new("n2", ["api", "db"]),
            Membership::new("n3", ["db", "web"]),
            Membership::new("host", Vec::<String>::new()),
        ];
        let report = analyze(&memberships).unwrap();

        assert_eq!(report.vertex_count, 3);
        assert_eq!(report.network_count, 3);
        assert_eq!(report.components, 1);
        assert_eq!(report.minimal_paths, vec!["web->api->db->web".to_string()]);
    }

    #[test]
    fn test_analyze_without_members() {
        assert!(analyze(&[]).is_none());
        assert!(analyze(&[Membership::new("bridge", Vec::<String>::new())]).is_none());
    }
}
