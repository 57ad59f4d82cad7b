//! Roadmap Core
//!
//! Layered architecture:
//! - domain: roadmap entities, progress statistics, path-addressed updates
//! - validation: raw JSON edits checked before they reach the store
//! - gateway: CRUD over named collections of a hosted table store
//! - store: optimistic roadmap collection + active selection
//! - view: view-local state and intent dispatch

pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod store;
pub mod validation;
pub mod view;

pub use config::{ConfigError, DashboardConfig, StoreConfig};
pub use domain::{
    compute_progress, ProgressStats, RoadmapData, RoadmapId, RoadmapItem, SubTopic, SubtopicPath,
    Topic, TopicProgress,
};
pub use error::{GatewayError, StoreError};
pub use gateway::{MemoryGateway, PersistenceGateway, RestGateway};
pub use store::{RoadmapSnapshot, RoadmapStore};
pub use validation::{validate, ValidationError};
pub use view::{dispatch, DispatchOutcome, DisplayedRoadmap, RoadmapIntent, TopicExpansion};
