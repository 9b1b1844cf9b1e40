use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("catalog source unreachable")]
    File(#[from] std::io::Error),

    #[error("network error")]
    Network(#[from] reqwest::Error),

    #[error("catalog endpoint answered {0}")]
    Status(reqwest::StatusCode),

    #[error("catalog document is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("catalog document is not a sitemap: {0}")]
    Sitemap(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One course as every source format normalizes to.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct CourseRecord {
    pub code: String,
    pub title: String,
    pub description: String,
    pub subjects: Vec<String>,
    pub prerequisites: String,
    pub external_ref: Option<String>,
}

/// A fetched batch. `skipped` holds the identifiers of entries that failed
/// field extraction; a bad entry never aborts the batch.
#[derive(Debug, Default)]
pub struct Batch {
    pub records: Vec<CourseRecord>,
    pub skipped: Vec<String>,
}

#[derive(PartialEq, Clone, Debug)]
pub enum Source {
    SitemapFile(PathBuf),
    JsonFile(PathBuf),
    RemoteJson(String),
}

impl Source {
    /// A URL means the remote JSON API; otherwise the file extension picks
    /// between the sitemap and the bulk JSON dump.
    pub fn detect(raw: &str) -> Source {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::RemoteJson(raw.to_string())
        } else if Path::new(raw)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            Source::SitemapFile(PathBuf::from(raw))
        } else {
            Source::JsonFile(PathBuf::from(raw))
        }
    }

    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Batch> {
        match self {
            Source::SitemapFile(path) => {
                let text = std::fs::read_to_string(path)?;
                parse_sitemap(&text)
            }
            Source::JsonFile(path) => {
                let text = std::fs::read_to_string(path)?;
                parse_json(&text)
            }
            Source::RemoteJson(url) => {
                log::trace!("Reqwest: GET {url:?}");
                let response = client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(Error::Status(response.status()));
                }
                parse_json(&response.text().await?)
            }
        }
    }
}

/// Join subject tokens with `"_"`, then append the course number:
/// `["COMPSCI"] + "300"` becomes `"COMPSCI_300"`. Consumers key on this
/// string, so the derivation must not change.
pub fn derive_course_code(subjects: &[String], course_number: &str) -> String {
    if subjects.is_empty() {
        return course_number.to_string();
    }

    let mut code = subjects.join("_");
    code.push('_');
    code.push_str(course_number);
    code
}

/// Sitemap XML (`<url><loc>.../CODE</loc></url>` repeated): the last path
/// segment of each location is the course code, used verbatim. A document
/// without a `urlset` root or without a single `<loc>` entry is fatal, so a
/// wrong or corrupted file can never read as an empty catalog.
pub fn parse_sitemap(text: &str) -> Result<Batch> {
    let dom = scraper::Html::parse_document(text);

    let urlset_selector = scraper::Selector::parse("urlset").unwrap();
    if dom.select(&urlset_selector).next().is_none() {
        return Err(Error::Sitemap("missing urlset root"));
    }

    let loc_selector = scraper::Selector::parse("url > loc").unwrap();

    let mut batch = Batch::default();
    for loc in dom.select(&loc_selector) {
        let location = loc.text().collect::<String>();
        let location = location.trim();

        let code = location.rsplit('/').next().unwrap_or_default();
        if code.is_empty() {
            log::warn!("sitemap: no course code in {location:?}");
            batch.skipped.push(location.to_string());
            continue;
        }

        batch.records.push(CourseRecord {
            code: code.to_string(),
            ..Default::default()
        });
    }

    if batch.records.is_empty() && batch.skipped.is_empty() {
        return Err(Error::Sitemap("no url entries"));
    }

    Ok(batch)
}

#[derive(serde::Deserialize)]
struct RawCourse {
    course_reference: Option<RawReference>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    prerequisites: Option<RawPrerequisites>,
}

#[derive(serde::Deserialize)]
struct RawReference {
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    course_number: String,
}

#[derive(serde::Deserialize)]
struct RawPrerequisites {
    #[serde(default)]
    prerequisites_text: String,
}

/// Bulk JSON dump: a mapping of course identifier to course fields. An
/// unparseable document is fatal; a single malformed entry is skipped.
/// Entries keep document order (serde_json `preserve_order`); the
/// reconciler's first-occurrence rule for duplicate codes depends on it.
pub fn parse_json(text: &str) -> Result<Batch> {
    let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;

    let mut batch = Batch::default();
    for (key, value) in raw {
        let Ok(course) = serde_json::from_value::<RawCourse>(value) else {
            log::warn!("catalog: entry {key:?} does not parse");
            batch.skipped.push(key);
            continue;
        };
        let Some(reference) = course.course_reference else {
            log::warn!("catalog: entry {key:?} has no course_reference");
            batch.skipped.push(key);
            continue;
        };
        if reference.course_number.is_empty() {
            log::warn!("catalog: entry {key:?} has no course_number");
            batch.skipped.push(key);
            continue;
        }

        batch.records.push(CourseRecord {
            code: derive_course_code(&reference.subjects, &reference.course_number),
            title: course.title,
            description: course.description,
            subjects: reference.subjects,
            prerequisites: course
                .prerequisites
                .map(|p| p.prerequisites_text)
                .unwrap_or_default(),
            external_ref: Some(key),
        });
    }

    Ok(batch)
}
