//! Plain-text rendering of the panel view.

use std::fmt::Write as _;

use client_core::{DialogState, LoadStatus, NotificationKind, PanelView};

pub fn render_view(view: &PanelView) -> String {
    let mut out = String::new();

    if let Some(notification) = &view.notification {
        let label = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        };
        let _ = writeln!(out, "[{label}] {}", notification.text);
    }

    match &view.dialog {
        DialogState::None => {}
        DialogState::EditingDraft { draft, .. } => {
            let _ = writeln!(out, "(editing disease {} is still open)", draft.id);
        }
        DialogState::ConfirmingDelete { id, .. } => {
            let _ = writeln!(out, "(delete of disease {id} was not completed)");
        }
    }

    if let LoadStatus::Failed(reason) = &view.status {
        let _ = writeln!(out, "Could not refresh diseases: {reason}");
    }

    if view.records.is_empty() {
        match view.status {
            LoadStatus::Idle | LoadStatus::Loading => out.push_str("Loading diseases...\n"),
            _ => out.push_str("No diseases found. Add one above.\n"),
        }
        return out;
    }

    let name_width = view
        .records
        .iter()
        .map(|record| record.name.chars().count())
        .chain(std::iter::once("Disease Name".len()))
        .max()
        .unwrap_or_default();
    let id_width = view
        .records
        .iter()
        .map(|record| record.id.to_string().len())
        .chain(std::iter::once("ID".len()))
        .max()
        .unwrap_or_default();
    // `edit`/`delete` take the ID column, not the row number.
    let _ = writeln!(
        out,
        "{:>3}  {:>id_width$}  {:<name_width$}  Symptoms",
        "#", "ID", "Disease Name"
    );
    for (index, record) in view.records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:>id_width$}  {:<name_width$}  {}",
            index + 1,
            record.id,
            record.name,
            record.symptoms
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{CreateForm, Notification};
    use shared::domain::{Disease, DiseaseId};

    fn view(records: Vec<Disease>, status: LoadStatus) -> PanelView {
        PanelView {
            records,
            status,
            form: CreateForm::default(),
            dialog: DialogState::None,
            notification: None,
        }
    }

    #[test]
    fn renders_numbered_rows_in_server_order() {
        let mut view = view(
            vec![
                Disease {
                    id: DiseaseId(2),
                    name: "Mange".into(),
                    symptoms: "itching".into(),
                },
                Disease {
                    id: DiseaseId(1),
                    name: "Rabies".into(),
                    symptoms: "fever,aggression".into(),
                },
            ],
            LoadStatus::Ready,
        );
        view.notification = Some(Notification::success("Disease added successfully!"));

        let text = render_view(&view);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "[ok] Disease added successfully!");
        assert!(lines[1].contains("ID  Disease Name"));
        assert!(lines[2].starts_with("  1   2  Mange"));
        assert!(lines[3].starts_with("  2   1  Rabies"));
        assert!(lines[3].ends_with("fever,aggression"));
    }

    #[test]
    fn rows_carry_the_ids_edit_and_delete_expect() {
        let text = render_view(&view(
            vec![
                Disease {
                    id: DiseaseId(17),
                    name: "Mange".into(),
                    symptoms: "itching".into(),
                },
                Disease {
                    id: DiseaseId(3),
                    name: "Rabies".into(),
                    symptoms: "fever".into(),
                },
            ],
            LoadStatus::Ready,
        ));
        let rows: Vec<Vec<&str>> = text
            .lines()
            .skip(1)
            .map(|line| line.split_whitespace().collect())
            .collect();
        assert_eq!(rows[0][..3], ["1", "17", "Mange"]);
        assert_eq!(rows[1][..3], ["2", "3", "Rabies"]);
    }

    #[test]
    fn empty_ready_catalog_shows_hint() {
        let text = render_view(&view(Vec::new(), LoadStatus::Ready));
        assert_eq!(text, "No diseases found. Add one above.\n");
    }

    #[test]
    fn failed_refresh_is_reported_above_stale_rows() {
        let text = render_view(&view(
            vec![Disease {
                id: DiseaseId(1),
                name: "Rabies".into(),
                symptoms: "fever".into(),
            }],
            LoadStatus::Failed("request failed: connection refused".into()),
        ));
        assert!(text.starts_with("Could not refresh diseases: request failed"));
        assert!(text.contains("Rabies"));
    }
}
