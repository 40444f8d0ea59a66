//! Permissions and the scopes they grant.
//!
//! Resources:
//! * [Assigning permissions to jobs](https://docs.github.com/en/actions/writing-workflows/choosing-what-your-workflow-does/controlling-permissions-for-github_token)

use std::fmt::{self, Display};

use ghlint_models::common::{self, BasePermission, Permission};
use indexmap::IndexSet;
use serde::Serialize;

/// A single `GITHUB_TOKEN` capability.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Actions,
    Attestations,
    Checks,
    Contents,
    Deployments,
    Discussions,
    IdToken,
    Issues,
    Packages,
    Pages,
    PullRequests,
    RepositoryProjects,
    SecurityEvents,
    Statuses,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 14] = [
        Capability::Actions,
        Capability::Attestations,
        Capability::Checks,
        Capability::Contents,
        Capability::Deployments,
        Capability::Discussions,
        Capability::IdToken,
        Capability::Issues,
        Capability::Packages,
        Capability::Pages,
        Capability::PullRequests,
        Capability::RepositoryProjects,
        Capability::SecurityEvents,
        Capability::Statuses,
    ];

    /// The capability's key in a `permissions:` block, e.g. `id-token`.
    pub fn key(&self) -> &'static str {
        match self {
            Capability::Actions => "actions",
            Capability::Attestations => "attestations",
            Capability::Checks => "checks",
            Capability::Contents => "contents",
            Capability::Deployments => "deployments",
            Capability::Discussions => "discussions",
            Capability::IdToken => "id-token",
            Capability::Issues => "issues",
            Capability::Packages => "packages",
            Capability::Pages => "pages",
            Capability::PullRequests => "pull-requests",
            Capability::RepositoryProjects => "repository-projects",
            Capability::SecurityEvents => "security-events",
            Capability::Statuses => "statuses",
        }
    }

    /// Looks up a capability by its `permissions:` key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.key() == key)
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The access a token has to a single capability.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    #[default]
    None,
    Read,
    Write,
}

impl From<Permission> for Access {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::None => Access::None,
            Permission::Read => Access::Read,
            Permission::Write => Access::Write,
        }
    }
}

/// A fixed record of the access granted to each [`Capability`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Permissions {
    pub actions: Access,
    pub attestations: Access,
    pub checks: Access,
    pub contents: Access,
    pub deployments: Access,
    pub discussions: Access,
    pub id_token: Access,
    pub issues: Access,
    pub packages: Access,
    pub pages: Access,
    pub pull_requests: Access,
    pub repository_projects: Access,
    pub security_events: Access,
    pub statuses: Access,
}

impl Permissions {
    /// Grants the same access to every capability.
    pub fn uniform(access: Access) -> Self {
        let mut permissions = Self::default();
        for capability in Capability::ALL {
            *permissions.access_mut(capability) = access;
        }
        permissions
    }

    /// Builds the record described by a `permissions:` block.
    ///
    /// Returns `None` when the block is absent, since what's granted then
    /// depends on repository settings. Capabilities missing from an explicit
    /// block get no access.
    pub fn from_model(permissions: &common::Permissions) -> Option<Self> {
        match permissions {
            common::Permissions::Base(BasePermission::Default) => None,
            common::Permissions::Base(BasePermission::ReadAll) => Some(Self::uniform(Access::Read)),
            common::Permissions::Base(BasePermission::WriteAll) => {
                Some(Self::uniform(Access::Write))
            }
            common::Permissions::Explicit(explicit) => {
                let mut record = Self::default();
                for (key, permission) in explicit {
                    match Capability::from_key(key) {
                        Some(capability) => *record.access_mut(capability) = (*permission).into(),
                        None => tracing::debug!("ignoring unknown permission: {key}"),
                    }
                }
                Some(record)
            }
        }
    }

    /// The access granted to `capability`.
    pub fn access(&self, capability: Capability) -> Access {
        match capability {
            Capability::Actions => self.actions,
            Capability::Attestations => self.attestations,
            Capability::Checks => self.checks,
            Capability::Contents => self.contents,
            Capability::Deployments => self.deployments,
            Capability::Discussions => self.discussions,
            Capability::IdToken => self.id_token,
            Capability::Issues => self.issues,
            Capability::Packages => self.packages,
            Capability::Pages => self.pages,
            Capability::PullRequests => self.pull_requests,
            Capability::RepositoryProjects => self.repository_projects,
            Capability::SecurityEvents => self.security_events,
            Capability::Statuses => self.statuses,
        }
    }

    fn access_mut(&mut self, capability: Capability) -> &mut Access {
        match capability {
            Capability::Actions => &mut self.actions,
            Capability::Attestations => &mut self.attestations,
            Capability::Checks => &mut self.checks,
            Capability::Contents => &mut self.contents,
            Capability::Deployments => &mut self.deployments,
            Capability::Discussions => &mut self.discussions,
            Capability::IdToken => &mut self.id_token,
            Capability::Issues => &mut self.issues,
            Capability::Packages => &mut self.packages,
            Capability::Pages => &mut self.pages,
            Capability::PullRequests => &mut self.pull_requests,
            Capability::RepositoryProjects => &mut self.repository_projects,
            Capability::SecurityEvents => &mut self.security_events,
            Capability::Statuses => &mut self.statuses,
        }
    }

    /// See [`effective_scopes`].
    pub fn effective_scopes(&self) -> IndexSet<Scope> {
        effective_scopes(self)
    }
}

/// A single (capability, access) grant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Scope {
    pub capability: Capability,
    pub access: Access,
}

impl Scope {
    pub fn new(capability: Capability, access: Access) -> Self {
        Self { capability, access }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let access = match self.access {
            Access::None => "none",
            Access::Read => "read",
            Access::Write => "write",
        };
        write!(f, "{}: {access}", self.capability)
    }
}

/// Every scope `permissions` grants, including the reads implied by writes.
///
/// Each capability appears at its declared access, and every capability
/// declared `write` also appears at `read`. A capability may therefore
/// appear twice.
pub fn effective_scopes(permissions: &Permissions) -> IndexSet<Scope> {
    let declared = Capability::ALL
        .into_iter()
        .map(|capability| Scope::new(capability, permissions.access(capability)));

    let implied = Capability::ALL
        .into_iter()
        .filter(|capability| permissions.access(*capability) == Access::Write)
        .map(|capability| Scope::new(capability, Access::Read));

    declared.chain(implied).collect()
}
