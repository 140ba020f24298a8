use anyhow::Context;
use serde::de::DeserializeOwned;
use std::env;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub mod config;
pub mod organization;
pub mod projection;
pub mod schema;
pub mod selection;
pub mod session;

pub use crate::config::TransferConfig;
pub use crate::organization::{build_selection_tree, BuildOptions, NodeKey, SelectionTree};
pub use crate::projection::{project_selections, TransferContext, TransferPayload};
pub use crate::selection::{Role, SelectionEngine, SelectionEntry, SelectionSets, ToggleOutcome};
pub use crate::session::{SessionAction, TransferSession};

const DEFAULT_UNITS_FILE: &str = "demos/units.json";
const DEFAULT_STAFF_FILE: &str = "demos/staff.json";

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let data = std::fs::read(Path::new(path)).with_context(|| format!("failed to read {}", path))?;
    serde_json::from_slice(&data).with_context(|| format!("failed to parse {}", path))
}

/// Replay a recorded selection against JSON directory exports and print the
/// resulting tree and payload.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if env::var("TRANSFER_PRINT_SCHEMA")
        .ok()
        .and_then(|v| config::parse_flag(&v))
        .unwrap_or(false)
    {
        println!("{}", schema::schema_json()?);
        return Ok(());
    }

    let config = TransferConfig::from_env()?;
    let units_file = env::var("TRANSFER_UNITS_FILE").unwrap_or_else(|_| DEFAULT_UNITS_FILE.to_string());
    let staff_file = env::var("TRANSFER_STAFF_FILE").unwrap_or_else(|_| DEFAULT_STAFF_FILE.to_string());

    let units: Vec<organization::OrgUnit> = read_json(&units_file)?;
    let staff: Vec<organization::StaffMember> = read_json(&staff_file)?;
    log::info!("Loaded {} units from {}, {} staff from {}", units.len(), units_file, staff.len(), staff_file);

    let context = TransferContext::new(Uuid::new_v4(), env::var("TRANSFER_WORKFLOW_NODE").ok());
    let mut session = TransferSession::open(context, config, &units, &staff)
        .with_delegate_picker(Arc::new(selection::FirstDelegate));

    if let Ok(script_file) = env::var("TRANSFER_SCRIPT_FILE") {
        let actions: Vec<SessionAction> = read_json(&script_file)?;
        for action in &actions {
            match session.apply(action).await {
                Ok(outcome) => log::info!("{:?} -> {:?}", action, outcome),
                Err(e) => log::warn!("{:?} rejected: {}", action, e),
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(session.tree())?);
    println!("{}", serde_json::to_string_pretty(&session.project())?);
    Ok(())
}
