use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

mod config;
mod logger;
mod reconcile;
mod source;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::Config::parse();
    logger::init(&cfg.log_file)?;

    dotenvy::dotenv().ok();

    let mut db = coursehub_shared::db::DBConnection::new()?;

    let catalog_source = source::Source::detect(&cfg.source);
    let client = reqwest::Client::builder()
        .user_agent("coursehub-catalog")
        .build()?;

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_chars("◜◠◝◞◡◟✔"),
    );
    pb.set_message("Fetching course catalog...");
    let batch = catalog_source.fetch(&client).await?;
    pb.finish_with_message(format!("Fetched {} records", batch.records.len()));

    let mode = if cfg.replace {
        reconcile::Mode::Replace
    } else {
        reconcile::Mode::Merge
    };
    let report = reconcile::reconcile(&mut db, batch, mode)?;

    println!("{} {}", console::style("✔").green(), report.summary());
    println!(
        "Done: total number of courses in database: {}",
        db.count_courses()?
    );

    Ok(())
}
