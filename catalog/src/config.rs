#[derive(clap::Parser, Debug, Clone)]
#[command(version, about = "Populate the course catalog from an external source")]
pub struct Config {
    /// Catalog source: a sitemap XML file, a bulk JSON dump, or an https URL
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Delete the current catalog and repopulate it from this source
    #[arg(short, long, default_value_t = false)]
    pub replace: bool,

    /// Log file
    #[arg(short, long, value_name = "FILE", default_value = "coursehub-catalog.log")]
    pub log_file: String,
}
