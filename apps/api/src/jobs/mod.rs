// Job application records: model, validation, id generation, and the
// list/create/update/delete operations exposed under /jobs.

pub mod handlers;
pub mod ids;
pub mod models;
pub mod repository;
pub mod validation;
