//! Command-line interface for headless data inspection.
//!
//! Running without a subcommand launches the game window; the subcommands
//! here are for checking the shipped master data and looking at the save
//! file without starting the GUI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::masterdata::{MasterData, StageCatalog};
use crate::save::{JsonSaveStore, SaveStore, is_stage_unlocked};

/// Skybreaker - stage-based boss-battle game
#[derive(Parser, Debug)]
#[command(name = "skybreaker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stages with save progress
    Stages,

    /// Validate master data cross-references
    CheckData,

    /// Print the persisted save record
    ShowSave,
}

#[derive(Serialize)]
struct StageRow<'a> {
    id: &'a str,
    display_name: &'a str,
    unlocked: bool,
    cleared: bool,
    best_rank: &'static str,
}

/// Execute a subcommand. Returns an error exit for inconsistent data.
pub fn run(command: &Commands, json: bool) -> Result<()> {
    match command {
        Commands::Stages => list_stages(json),
        Commands::CheckData => check_data(json),
        Commands::ShowSave => show_save(json),
    }
}

fn list_stages(json: bool) -> Result<()> {
    let data = MasterData::embedded();
    let store = JsonSaveStore::at_default_location()?;
    let save = store.load_or_create_default();

    let stages = data.all_stages();
    let rows: Vec<StageRow> = stages
        .iter()
        .map(|stage| {
            let progress = save.find_stage(&stage.id);
            StageRow {
                id: &stage.id,
                display_name: &stage.display_name,
                unlocked: is_stage_unlocked(&save, stages, &stage.id),
                cleared: progress.is_some_and(|p| p.cleared),
                best_rank: progress.map(|p| p.best_rank.letter()).unwrap_or("-"),
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{:<12} {:<20} {:<9} {:<8} {}", "ID", "NAME", "UNLOCKED", "CLEARED", "RANK");
        for row in &rows {
            println!(
                "{:<12} {:<20} {:<9} {:<8} {}",
                row.id, row.display_name, row.unlocked, row.cleared, row.best_rank
            );
        }
    }
    Ok(())
}

fn check_data(json: bool) -> Result<()> {
    let data = MasterData::embedded();
    let problems = data.validate_references();

    if json {
        println!("{}", serde_json::to_string_pretty(&problems)?);
    } else if problems.is_empty() {
        println!("Master data OK: {} stages", data.all_stages().len());
    } else {
        for problem in &problems {
            println!("PROBLEM: {}", problem);
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} master data problem(s) found", problems.len())
    }
}

fn show_save(json: bool) -> Result<()> {
    let store = JsonSaveStore::at_default_location()?;
    let save = store.load_or_create_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&save)?);
    } else {
        println!("Save file: {:?}", store.file_path());
        println!("Version: {}", save.version);
        println!("Saved at: {}", save.saved_at);
        println!(
            "Settings: {}x{} fullscreen={} bgm={:.2} se={:.2}",
            save.settings.graphics.width,
            save.settings.graphics.height,
            save.settings.graphics.fullscreen,
            save.settings.volume.bgm_volume,
            save.settings.volume.se_volume,
        );
        if save.stages.is_empty() {
            println!("No stage progress recorded");
        }
        for progress in &save.stages {
            println!(
                "  {}: unlocked={} cleared={} rank={}",
                progress.stage_id,
                progress.unlocked,
                progress.cleared,
                progress.best_rank.letter()
            );
        }
    }
    Ok(())
}
