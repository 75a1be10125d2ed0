//! Top-level administrative repositories.
//!
//! Projects, accounts, and roles have no owner and need no extra access
//! patterns; they are plain instantiations of [`TopLevelRepository`].

use carepulse_types::{Account, Project, Role};

use crate::composer::BasicKeys;
use crate::top_level::TopLevelRepository;

/// Tenant projects.
pub type ProjectRepository<S> = TopLevelRepository<Project, S, BasicKeys<Project>>;

/// User accounts.
pub type AccountRepository<S> = TopLevelRepository<Account, S, BasicKeys<Account>>;

/// Authorization roles.
pub type RoleRepository<S> = TopLevelRepository<Role, S, BasicKeys<Role>>;
