//! Version selection over a discovered candidate set
//!
//! Backtracking search that assigns one descriptor per required id, trying
//! the lowest version that satisfies every range reaching the id first. Only
//! ids required by the chosen assignment end up in the result, so candidates
//! nothing depends on are pruned.

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

use super::discovery::CandidateSet;
use crate::package::{
    PackageDescriptor, PackageError, ResolvedSet, RootSource, VersionRange, normalize_id,
};

const ROOT_REQUEST: &str = "the root request";

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("No version of {id} satisfies {}", describe_constraints(.constraints))]
    UnsatisfiableConstraint {
        id: String,
        /// `(required by, range)` for every edge that reached `id`
        constraints: Vec<(String, VersionRange)>,
    },

    #[error("Circular dependency detected: {}", .cycle.join(" → "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Root package {id} is missing from the candidate set")]
    MissingRoot { id: String },

    #[error("Invalid resolution result: {source}")]
    Package {
        #[from]
        source: PackageError,
    },
}

fn describe_constraints(constraints: &[(String, VersionRange)]) -> String {
    constraints
        .iter()
        .map(|(required_by, range)| format!("{} (required by {})", range, required_by))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone)]
struct Requirement {
    /// Target id as declared
    target: String,
    required_by: String,
    range: VersionRange,
}

type Assignment = BTreeMap<String, Arc<PackageDescriptor>>;

/// Backtracking state
///
/// `required` grows as descriptors are assigned and shrinks as they are
/// taken back, so each step only touches the edges of one descriptor. The
/// search itself stays exponential in the worst case: every combination of
/// candidate versions may be visited before a conflict is proven. Discovery
/// keeps that space small by fetching only the hinted versions of each id.
struct Search {
    /// Candidate versions per normalized id, lowest first
    versions: BTreeMap<String, Vec<Arc<PackageDescriptor>>>,
    /// Requirements of the root request and every assigned descriptor, by target
    required: BTreeMap<String, Vec<Requirement>>,
    /// First dead end met, reported when the whole search fails
    conflict: Option<ResolutionError>,
}

impl Search {
    fn require(&mut self, requirement: Requirement) {
        self.required
            .entry(normalize_id(&requirement.target))
            .or_default()
            .push(requirement);
    }

    /// Add the edges declared by a newly assigned descriptor
    fn assign_edges(&mut self, descriptor: &PackageDescriptor) {
        for edge in descriptor.dependencies() {
            self.require(Requirement {
                target: edge.target_id().to_string(),
                required_by: descriptor.identity().to_string(),
                range: edge.range().clone(),
            });
        }
    }

    /// Undo [`assign_edges`](Self::assign_edges) for the most recent assignment
    fn release_edges(&mut self, descriptor: &PackageDescriptor) {
        for edge in descriptor.dependencies().iter().rev() {
            let key = normalize_id(edge.target_id());
            if let Some(requirements) = self.required.get_mut(&key) {
                requirements.pop();
                if requirements.is_empty() {
                    self.required.remove(&key);
                }
            }
        }
    }

    fn record_conflict(&mut self, id: &str, requirements: &[Requirement]) {
        if self.conflict.is_none() {
            self.conflict = Some(ResolutionError::UnsatisfiableConstraint {
                id: id.to_string(),
                constraints: requirements
                    .iter()
                    .map(|r| (r.required_by.clone(), r.range.clone()))
                    .collect(),
            });
        }
    }

    /// Whether `option` agrees with every package already chosen
    fn consistent(&mut self, option: &PackageDescriptor, assignment: &Assignment) -> bool {
        for edge in option.dependencies() {
            let target = normalize_id(edge.target_id());
            let Some(chosen) = assignment.get(&target) else {
                continue;
            };
            if edge.range().satisfies(chosen.identity().version()) {
                continue;
            }

            trace!(
                "{} rejected: needs {} but {} is chosen",
                option.identity(),
                edge,
                chosen.identity()
            );
            let mut requirements = self.required.get(&target).cloned().unwrap_or_default();
            requirements.push(Requirement {
                target: edge.target_id().to_string(),
                required_by: option.identity().to_string(),
                range: edge.range().clone(),
            });
            self.record_conflict(chosen.id(), &requirements);
            return false;
        }
        true
    }

    fn solve(&mut self, assignment: &mut Assignment) -> bool {
        let Some((key, requirements)) = self
            .required
            .iter()
            .find(|(key, _)| !assignment.contains_key(key.as_str()))
            .map(|(key, requirements)| (key.clone(), requirements.clone()))
        else {
            return true;
        };

        let options: Vec<Arc<PackageDescriptor>> = self
            .versions
            .get(&key)
            .map(|versions| {
                versions
                    .iter()
                    .filter(|candidate| {
                        requirements
                            .iter()
                            .all(|r| r.range.satisfies(candidate.identity().version()))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for option in options {
            if !self.consistent(&option, assignment) {
                continue;
            }

            trace!("Trying {}", option.identity());
            self.assign_edges(&option);
            assignment.insert(key.clone(), Arc::clone(&option));
            if self.solve(assignment) {
                return true;
            }
            assignment.remove(&key);
            self.release_edges(&option);
        }

        let id = requirements
            .first()
            .map(|r| r.target.clone())
            .unwrap_or_else(|| key.clone());
        self.record_conflict(&id, &requirements);
        false
    }
}

/// Picks one version per package id from a [`CandidateSet`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Resolver;

impl Resolver {
    pub fn new() -> Self {
        Self
    }

    /// Choose the lowest satisfying version of every id the root needs
    ///
    /// `keep_ids` must appear in the result in addition to the root. A local
    /// root takes part as a stand-in candidate; the result carries the
    /// caller's descriptor for it.
    pub fn resolve<S: AsRef<str>>(
        &self,
        keep_ids: &[S],
        candidates: &CandidateSet,
    ) -> Result<ResolvedSet, ResolutionError> {
        let root = candidates.root();
        let root_key = normalize_id(root.identity().id());

        let solver_root = match root {
            RootSource::Feed(descriptor) => candidates
                .get(descriptor.identity())
                .cloned()
                .ok_or_else(|| ResolutionError::MissingRoot {
                    id: descriptor.identity().to_string(),
                })?,
            RootSource::LocalArtifact(descriptor) => Arc::new(descriptor.as_ref().clone()),
        };

        let mut versions: BTreeMap<String, Vec<Arc<PackageDescriptor>>> = BTreeMap::new();
        for descriptor in candidates.iter() {
            let key = normalize_id(descriptor.id());
            if key != root_key {
                versions.entry(key).or_default().push(Arc::clone(descriptor));
            }
        }
        versions.insert(root_key.clone(), vec![Arc::clone(&solver_root)]);

        let mut search = Search {
            versions,
            required: BTreeMap::new(),
            conflict: None,
        };
        for id in keep_ids.iter().map(AsRef::as_ref) {
            if normalize_id(id) != root_key {
                search.require(Requirement {
                    target: id.to_string(),
                    required_by: ROOT_REQUEST.to_string(),
                    range: VersionRange::all(),
                });
            }
        }
        search.assign_edges(&solver_root);

        let mut assignment = Assignment::new();
        assignment.insert(root_key.clone(), solver_root);

        if !search.solve(&mut assignment) {
            return Err(search.conflict.unwrap_or(ResolutionError::MissingRoot {
                id: root.identity().to_string(),
            }));
        }

        assignment.remove(&root_key);
        let resolved = ResolvedSet::new(Arc::clone(root.descriptor()), assignment.into_values())?;

        if let Some(cycle) = resolved.find_cycle() {
            return Err(ResolutionError::CyclicDependency { cycle });
        }

        debug!(
            "Resolved {} packages for {}",
            resolved.len(),
            root.identity()
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    include!("resolver.test.rs");
}
