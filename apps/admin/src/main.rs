use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    HttpDiseaseBackend, NotificationKind, PanelConfig, PanelController, PanelIntent, RecordStore,
};
use shared::domain::DiseaseId;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "animalcare-admin", about = "Manage the AnimalCare disease catalog")]
struct Args {
    /// Base URL of the disease API (the collection lives at `<url>/diseases`).
    #[arg(long, env = "ANIMALCARE_API_URL", default_value = "http://127.0.0.1:8080/api")]
    server_url: String,
    #[arg(long, default_value_t = 3)]
    notification_secs: u64,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the catalog.
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symptoms: String,
    },
    /// Edit an existing disease by its ID; omitted fields keep their current value.
    Edit {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        symptoms: Option<String>,
    },
    /// Delete a disease by its ID.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let backend = HttpDiseaseBackend::new(&args.server_url)?;
    tracing::debug!(url = backend.diseases_url(), "using disease api");
    let store = Arc::new(RecordStore::new(Arc::new(backend)));
    let mut controller = PanelController::new(
        store,
        PanelConfig {
            notification_lifetime: Duration::from_secs(args.notification_secs),
        },
    );

    controller.dispatch(PanelIntent::Refresh);
    controller.settle().await;

    match args.command.unwrap_or(Command::List) {
        Command::List => {}
        Command::Add { name, symptoms } => {
            controller.dispatch(PanelIntent::SetFormName(name));
            controller.dispatch(PanelIntent::SetFormSymptoms(symptoms));
            controller.dispatch(PanelIntent::SubmitCreate);
        }
        Command::Edit { id, name, symptoms } => {
            let record = controller
                .view()
                .await
                .records
                .into_iter()
                .find(|record| record.id == DiseaseId(id))
                .ok_or_else(|| anyhow!("no disease with id {id} in the catalog"))?;
            controller.dispatch(PanelIntent::OpenEdit(record));
            if let Some(name) = name {
                controller.dispatch(PanelIntent::SetDraftName(name));
            }
            if let Some(symptoms) = symptoms {
                controller.dispatch(PanelIntent::SetDraftSymptoms(symptoms));
            }
            controller.dispatch(PanelIntent::SubmitEdit);
        }
        Command::Delete { id } => {
            controller.dispatch(PanelIntent::OpenDelete(DiseaseId(id)));
            controller.dispatch(PanelIntent::ConfirmDelete);
        }
    }
    controller.settle().await;

    let view = controller.view().await;
    print!("{}", render::render_view(&view));

    let failed = matches!(
        view.notification.as_ref().map(|n| n.kind),
        Some(NotificationKind::Error | NotificationKind::Warning)
    );
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
