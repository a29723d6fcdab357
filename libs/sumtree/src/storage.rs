use cl_types::Dec;
use soroban_sdk::{contracttype, Env, Vec};

/// Storage keys for sumtree nodes
#[contracttype]
#[derive(Clone)]
pub enum SumtreeKey {
    /// (namespace, level, key prefix) -> child sums (Persistent storage)
    SumtreeNode(u64, u32, u64),
}

const PERSISTENT_TTL_THRESHOLD: u32 = 17280; // ~1 day
const PERSISTENT_TTL_EXTEND: u32 = 518400; // ~30 days

pub fn get_node(env: &Env, namespace: u64, level: u32, prefix: u64) -> Option<Vec<Dec>> {
    let key = SumtreeKey::SumtreeNode(namespace, level, prefix);
    env.storage().persistent().get(&key)
}

pub fn set_node(env: &Env, namespace: u64, level: u32, prefix: u64, node: &Vec<Dec>) {
    let key = SumtreeKey::SumtreeNode(namespace, level, prefix);
    env.storage().persistent().set(&key, node);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
