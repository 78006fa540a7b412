//! Course (asignatura) and task (tarea) shapes used for ownership checks.

use serde::{Deserialize, Serialize};

use aula_core::types::{AsignaturaId, TareaId, UserId};

/// An entity with a single responsible teacher.
pub trait Responsible {
    /// Id of the teacher bound to the entity, if any.
    fn responsible_id(&self) -> Option<&UserId>;
}

/// A course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asignatura {
    /// Course id.
    pub id: AsignaturaId,
    /// Course name.
    #[serde(default)]
    pub nombre: String,
    /// Teacher responsible for the course.
    #[serde(default, alias = "docente", alias = "teacher_id")]
    pub docente_id: Option<UserId>,
}

impl Responsible for Asignatura {
    fn responsible_id(&self) -> Option<&UserId> {
        self.docente_id.as_ref()
    }
}

/// A task assigned within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tarea {
    /// Task id.
    pub id: TareaId,
    /// Task title.
    #[serde(default)]
    pub titulo: String,
    /// Course the task belongs to.
    #[serde(default, alias = "asignatura")]
    pub asignatura_id: Option<AsignaturaId>,
    /// Teacher who owns the task.
    #[serde(default, alias = "docente", alias = "creado_por")]
    pub docente_id: Option<UserId>,
}

impl Responsible for Tarea {
    fn responsible_id(&self) -> Option<&UserId> {
        self.docente_id.as_ref()
    }
}
