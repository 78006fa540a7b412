//! Access-check CLI commands.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use aula_auth::PermissionEvaluator;
use aula_client::ApiClient;
use aula_core::error::AppError;
use aula_entity::course::{Asignatura, Tarea};
use aula_entity::user::UserRecord;

/// Arguments for the can command
#[derive(Debug, Args)]
pub struct CanArgs {
    /// Action keys to evaluate (all known actions when omitted)
    pub actions: Vec<String>,
}

/// Arguments for the permissions command
#[derive(Debug, Args)]
pub struct PermissionsArgs {
    /// Permission codes to check (lists held codes when omitted)
    pub codes: Vec<String>,
    /// Require every code instead of any one of them
    #[arg(long)]
    pub all: bool,
}

/// Entity kinds that carry an owning teacher
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EditTarget {
    /// A course
    Asignatura,
    /// A task
    Tarea,
}

/// Arguments for the can-edit command
#[derive(Debug, Args)]
pub struct CanEditArgs {
    /// Entity kind
    #[arg(value_enum)]
    pub target: EditTarget,
    /// Entity ID
    pub id: String,
}

/// Decision display row
#[derive(Debug, Serialize, Tabled)]
struct DecisionRow {
    /// Action or permission code
    name: String,
    /// Allowed
    allowed: String,
}

impl DecisionRow {
    fn new(name: &str, allowed: bool) -> Self {
        Self {
            name: name.to_string(),
            allowed: output::mark(allowed).to_string(),
        }
    }
}

/// Execute the can command
pub fn can(args: &CanArgs, client: &ApiClient, format: OutputFormat) -> Result<(), AppError> {
    let session = super::require_session(client)?;
    let evaluator = PermissionEvaluator::new();
    let user = Some(&session.user);

    let rows: Vec<DecisionRow> = if args.actions.is_empty() {
        evaluator
            .policies()
            .actions()
            .into_iter()
            .map(|action| DecisionRow::new(action, evaluator.can(user, action)))
            .collect()
    } else {
        args.actions
            .iter()
            .map(|action| {
                if !evaluator.policies().contains(action) {
                    output::print_warning(&format!("Unknown action '{}'", action));
                }
                DecisionRow::new(action, evaluator.can(user, action))
            })
            .collect()
    };

    output::print_rows(&rows, format, "No actions to evaluate.");
    Ok(())
}

/// Aggregate outcome of a permissions check
#[derive(Debug, Serialize)]
struct PermissionCheck<'a> {
    /// "all" when every code is required, "any" otherwise
    mode: &'static str,
    /// Whether the aggregate check passes
    granted: bool,
    /// Per-code decisions
    codes: &'a [DecisionRow],
}

impl<'a> PermissionCheck<'a> {
    fn evaluate(
        evaluator: &PermissionEvaluator,
        user: Option<&UserRecord>,
        codes: &[&str],
        all: bool,
        rows: &'a [DecisionRow],
    ) -> Self {
        if all {
            Self {
                mode: "all",
                granted: evaluator.has_all_permissions(user, codes),
                codes: rows,
            }
        } else {
            Self {
                mode: "any",
                granted: evaluator.has_any_permission(user, codes),
                codes: rows,
            }
        }
    }

    fn label(&self) -> &'static str {
        if self.mode == "all" { "All held" } else { "Any held" }
    }
}

/// Execute the permissions command
pub fn permissions(
    args: &PermissionsArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let session = super::require_session(client)?;
    let evaluator = PermissionEvaluator::new();
    let user = Some(&session.user);

    if args.codes.is_empty() {
        let rows: Vec<DecisionRow> = session
            .user
            .permissions()
            .iter()
            .map(|code| DecisionRow::new(code, true))
            .collect();
        output::print_rows(&rows, format, "No permission codes held.");
        if format == OutputFormat::Table && (session.user.is_superuser() || session.user.is_staff()) {
            output::print_kv("Note", "superuser/staff holds every permission");
        }
        return Ok(());
    }

    let codes: Vec<&str> = args.codes.iter().map(String::as_str).collect();
    let rows: Vec<DecisionRow> = codes
        .iter()
        .map(|code| DecisionRow::new(code, evaluator.has_permission(user, code)))
        .collect();
    let check = PermissionCheck::evaluate(&evaluator, user, &codes, args.all, &rows);

    match format {
        OutputFormat::Table => {
            output::print_rows(check.codes, format, "");
            output::print_kv(check.label(), output::mark(check.granted));
        }
        OutputFormat::Json => output::print_json(&check),
    }
    Ok(())
}

/// Execute the can-edit command
pub async fn can_edit(
    args: &CanEditArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let session = super::require_session(client)?;
    let evaluator = PermissionEvaluator::new();
    let user = Some(&session.user);

    let (name, allowed) = match args.target {
        EditTarget::Asignatura => {
            let asignatura: Asignatura = client
                .get_json(&format!("/api/asignaturas/{}/", args.id))
                .await?;
            (
                format!("asignatura {} ({})", asignatura.id.as_str(), asignatura.nombre),
                evaluator.can_edit_asignatura(user, &asignatura),
            )
        }
        EditTarget::Tarea => {
            let tarea: Tarea = client
                .get_json(&format!("/api/tareas/{}/", args.id))
                .await?;
            (
                format!("tarea {} ({})", tarea.id.as_str(), tarea.titulo),
                evaluator.can_edit_tarea(user, &tarea),
            )
        }
    };

    output::print_rows(&[DecisionRow::new(&name, allowed)], format, "");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::types::UserId;
    use aula_entity::user::RoleHints;

    fn alumno() -> UserRecord {
        UserRecord::new(
            Some(UserId::from(6)),
            "alumno",
            RoleHints::default(),
            ["view_own_grades".to_string()],
        )
    }

    #[test]
    fn test_permission_check_json_carries_aggregate() {
        let evaluator = PermissionEvaluator::new();
        let user = alumno();
        let codes = ["view_own_grades", "grade_submissions"];
        let rows: Vec<DecisionRow> = codes
            .iter()
            .map(|code| DecisionRow::new(code, evaluator.has_permission(Some(&user), code)))
            .collect();

        let any = PermissionCheck::evaluate(&evaluator, Some(&user), &codes, false, &rows);
        let json = serde_json::to_value(&any).unwrap();
        assert_eq!(json["mode"], "any");
        assert_eq!(json["granted"], true);
        assert_eq!(json["codes"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["codes"][1]["name"], "grade_submissions");
        assert_eq!(json["codes"][1]["allowed"], "✗");

        let all = PermissionCheck::evaluate(&evaluator, Some(&user), &codes, true, &rows);
        assert_eq!(all.label(), "All held");
        let json = serde_json::to_value(&all).unwrap();
        assert_eq!(json["mode"], "all");
        assert_eq!(json["granted"], false);
    }
}
