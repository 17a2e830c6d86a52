//! # ARCHMAP
//!
//! Component discovery and dependency mapping for Spring codebases.
//!
//! archmap scans Java sources for Spring stereotype annotations, registers a
//! component for every marked type under its public contract, and walks the
//! static type-reference graph to infer which components depend on which.
//! Explicit `@SoftwareSystemDependency` and `@ContainerDependency` markers
//! attach the dependencies that reference scanning cannot see.
//!
//! ## Pipeline
//!
//! 1. Index: parse sources into a queryable type index
//! 2. Discover: register components from stereotype markers
//! 3. Resolve: transitive reference walk + cross-cutting markers
//! 4. Format: markdown or compact JSON architecture documents

pub mod core;
pub mod formatters;
pub mod index;
