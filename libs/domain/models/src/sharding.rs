// [libs/domain/models/src/sharding.rs]
//! Shard and service assignment maps.

use std::collections::HashMap;

/// `node_id -> ordered shard tokens`.
pub type ShardAssignments = HashMap<String, Vec<String>>;

/// `service_name -> node_id`.
pub type ServiceAssignments = HashMap<String, String>;
