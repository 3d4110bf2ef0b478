//! Resource families
//!
//! Each family knows its API version, resource path and scope, and exposes
//! its operations as free functions over a [`ServiceClient`](crate::client::ServiceClient).

pub mod clusters;
pub mod loadbalancers;
pub mod regions;
pub mod tasks;
