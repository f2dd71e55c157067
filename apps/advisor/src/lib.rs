//! Career advisor core: skill extraction, skill-set clustering into careers,
//! grounded retrieval for question answering, and skill-based ranking of jobs,
//! courses and roles.

pub mod careers;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod handlers;
pub mod llm_client;
pub mod ranking;
pub mod retrieval;
pub mod similarity;
pub mod skills;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;
