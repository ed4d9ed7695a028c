//! dboptima - SQL workload analyzer and index advisor
//!
//! Reads uploaded SQL statements, extracts their structure with textual
//! patterns, synthesizes an illustrative execution plan and recommends
//! B-tree, hash or bitmap indexes with ready-to-run DDL.

pub mod advisor;
pub mod analyzer;
pub mod cli;
pub mod dashboard;
pub mod ingest;
pub mod observability;
pub mod orchestrator;
pub mod planner;
pub mod store;
