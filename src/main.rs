use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;

use ilre::cli::{Cli, Command};
use ilre::commands::{self, AppContext};
use ilre::models::CatalogEntry;
use ilre::utils::{config, media};

#[tokio::main]
async fn main() {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()).await {
        log::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(config::default_data_dir);
    let json = cli.json;

    // Opened per command; config edits never touch the database.
    let open = || AppContext::open(&data_dir);

    match cli.command {
        Command::Config { url, key, table } => {
            let path = commands::settings::update_remote_settings(&data_dir, url, key, table)?;
            println!("settings written to {}", path.display());
        }
        Command::List { category, search } => {
            let ctx = open()?;
            let entries = commands::entry::get_entries(&ctx, category, search)?;
            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("no entries");
            } else {
                for entry in &entries {
                    print_summary(entry);
                }
            }
        }
        Command::Show { id } => {
            let ctx = open()?;
            let entry = commands::entry::get_entry(&ctx, &id)?;
            if json {
                print_json(&entry)?;
            } else {
                print_detail(&entry);
            }
        }
        Command::Add {
            title,
            body,
            category,
            fields,
        } => {
            let ctx = open()?;
            let entry = commands::entry::create_entry(&ctx, title, body, category, fields.into_patch())?;
            if json {
                print_json(&entry)?;
            } else {
                println!("added {}", entry.id);
            }
        }
        Command::Edit {
            id,
            title,
            body,
            category,
            fields,
        } => {
            let ctx = open()?;
            let mut patch = fields.into_patch();
            patch.title = title;
            patch.body = body;
            patch.category = category;
            let entry = commands::entry::update_entry(&ctx, &id, patch)?;
            if json {
                print_json(&entry)?;
            } else {
                println!("updated {}", entry.id);
            }
        }
        Command::Remove { id } => {
            let ctx = open()?;
            commands::entry::delete_entry(&ctx, &id)?;
            println!("removed {}", id);
        }
        Command::Push => {
            let ctx = open()?;
            let report = commands::sync::push_to_cloud(&ctx).await?;
            if json {
                print_json(&report)?;
            } else {
                println!("{}", ctx.status.current().message());
            }
        }
        Command::Pull { yes } => {
            if !yes {
                bail!("pull replaces all local data with the cloud copy; re-run with --yes to confirm");
            }
            let ctx = open()?;
            let count = commands::sync::restore_from_cloud(&ctx).await?;
            if json {
                print_json(&serde_json::json!({ "restored": count }))?;
            } else {
                println!("{}", ctx.status.current().message());
            }
        }
        Command::Status => {
            let ctx = open()?;
            let report = commands::storage::get_storage_stats(&ctx)?;
            if json {
                print_json(&report)?;
            } else {
                println!("entries:         {}", report.stats.entries_count);
                println!("unsynced:        {}", report.stats.dirty_count);
                println!("pending deletes: {}", report.stats.pending_deletes);
                println!("size:            {}", report.total_size);
                println!(
                    "cloud:           {}",
                    if report.connected { "configured" } else { "offline" }
                );
            }
        }
        Command::Ping => {
            let ctx = open()?;
            commands::sync::test_connection(&ctx).await?;
            println!("cloud connection ok");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(entry: &CatalogEntry) {
    let marker = if entry.dirty { "*" } else { " " };
    let kind = if media::is_video(entry) { " [video]" } else { "" };
    let tag = entry
        .tags
        .first()
        .map(|t| format!(" #{}", t))
        .unwrap_or_default();
    println!(
        "{} {}  [{}] {}{}{}",
        marker, entry.id, entry.category, entry.title, kind, tag
    );
}

fn print_detail(entry: &CatalogEntry) {
    println!("id:        {}", entry.id);
    println!("title:     {}", entry.title);
    println!("category:  {}", entry.category);
    println!("created:   {}", entry.created_at.to_rfc3339());
    println!("synced:    {}", if entry.dirty { "no" } else { "yes" });
    if !entry.tags.is_empty() {
        println!("tags:      {}", entry.tags.join(", "));
    }
    if let Some(media_ref) = &entry.primary_media_ref {
        let kind = if media::is_video(entry) { "video" } else { "image" };
        println!("media:     {} ({})", media_ref, kind);
    }
    if let Some(input) = &entry.secondary_media_ref {
        println!("input:     {}", input);
    }
    println!();
    println!("{}", entry.body);
    if let Some(negative) = &entry.negative_body {
        println!();
        println!("negative: {}", negative);
    }
}
