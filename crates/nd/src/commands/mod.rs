//! CLI command implementations.

pub(crate) mod dev;
pub(crate) mod seed;

pub(crate) use dev::DevArgs;
pub(crate) use seed::SeedArgs;
