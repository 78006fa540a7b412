//! # aula-entity
//!
//! Domain entity models for the Aula academic client: the canonical user
//! record with its derived role, and the course/task shapes needed for
//! ownership checks. All entities derive `Debug`, `Clone`, `Serialize`,
//! and `Deserialize`.

pub mod course;
pub mod user;
