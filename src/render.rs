use anyhow::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::record::{Dimension, JobRecord};
use crate::store::Facets;

/// Receives everything the user gets to see.
pub trait Presenter {
    fn show_options(&mut self, facets: &Facets) -> Result<()>;
    fn show_listing(&mut self, jobs: &[&JobRecord]) -> Result<()>;
    fn show_detail(&mut self, job: &JobRecord) -> Result<()>;
    fn hide_detail(&mut self) -> Result<()>;
    fn notify(&mut self, message: &str) -> Result<()>;
}

/// Where listings go. File targets are rewritten on every listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    JsonStdout,
    JsonFile(PathBuf),
    JsonlFile(PathBuf),
    CsvFile(PathBuf),
    TsvFile(PathBuf),
    HtmlFile(PathBuf),
}

impl OutputTarget {
    pub fn parse(output_arg: &str) -> Option<Self> {
        let target = match output_arg {
            "stdout" => OutputTarget::Stdout,
            "json" => OutputTarget::JsonStdout,
            path if path.ends_with(".json") => OutputTarget::JsonFile(path.into()),
            path if path.ends_with(".jsonl") || path.ends_with(".ndjson") => {
                OutputTarget::JsonlFile(path.into())
            }
            path if path.ends_with(".csv") => OutputTarget::CsvFile(path.into()),
            path if path.ends_with(".tsv") => OutputTarget::TsvFile(path.into()),
            path if path.ends_with(".html") || path.ends_with(".htm") => {
                OutputTarget::HtmlFile(path.into())
            }
            // Default to JSON file if it looks like a path
            path if path.contains('/') || path.contains('\\') || path.contains('.') => {
                OutputTarget::JsonFile(path.into())
            }
            _ => return None,
        };
        Some(target)
    }

    fn file(&self) -> Option<&Path> {
        match self {
            OutputTarget::Stdout | OutputTarget::JsonStdout => None,
            OutputTarget::JsonFile(p)
            | OutputTarget::JsonlFile(p)
            | OutputTarget::CsvFile(p)
            | OutputTarget::TsvFile(p)
            | OutputTarget::HtmlFile(p) => Some(p),
        }
    }
}

/// Presenter writing listings to an [`OutputTarget`]; options, details and
/// notices go to the console, or to `side` when the console carries a JSON
/// listing.
pub struct Writer<W: Write, E: Write = io::Stderr> {
    target: OutputTarget,
    console: W,
    side: E,
}

impl Writer<io::Stdout> {
    pub fn create(output_arg: &str) -> Result<Self> {
        let target = OutputTarget::parse(output_arg).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown output format: {}. Use 'stdout', 'json', or a file path",
                output_arg
            )
        })?;
        Ok(Self::with_console(target, io::stdout()))
    }
}

impl<W: Write> Writer<W> {
    pub fn with_console(target: OutputTarget, console: W) -> Self {
        Self::with_streams(target, console, io::stderr())
    }
}

impl<W: Write, E: Write> Writer<W, E> {
    pub fn with_streams(target: OutputTarget, console: W, side: E) -> Self {
        Self {
            target,
            console,
            side,
        }
    }

    pub fn into_console(self) -> W {
        self.console
    }

    pub fn into_parts(self) -> (W, E) {
        (self.console, self.side)
    }

    /// Stream for everything but the listing itself.
    fn notices(&mut self) -> &mut dyn Write {
        match self.target {
            OutputTarget::JsonStdout => &mut self.side,
            _ => &mut self.console,
        }
    }

    fn write_listing(&self, out: &mut dyn Write, jobs: &[&JobRecord]) -> Result<()> {
        match &self.target {
            OutputTarget::Stdout => write_text_listing(out, jobs),
            OutputTarget::JsonStdout | OutputTarget::JsonFile(_) => write_json_listing(out, jobs),
            OutputTarget::JsonlFile(_) => write_jsonl_listing(out, jobs),
            OutputTarget::CsvFile(_) => write_csv_listing(out, jobs),
            OutputTarget::TsvFile(_) => write_tsv_listing(out, jobs),
            OutputTarget::HtmlFile(_) => write_html_listing(out, jobs),
        }
    }
}

impl<W: Write, E: Write> Presenter for Writer<W, E> {
    fn show_options(&mut self, facets: &Facets) -> Result<()> {
        let out = self.notices();
        for dim in Dimension::ALL {
            write!(out, "{}: All", dim.name())?;
            for v in facets.values(dim) {
                write!(out, " | {}", v)?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    fn show_listing(&mut self, jobs: &[&JobRecord]) -> Result<()> {
        match self.target.file().map(Path::to_path_buf) {
            Some(path) => {
                create_parent_dirs(&path)?;
                let mut file = BufWriter::new(File::create(&path)?);
                self.write_listing(&mut file, jobs)?;
                file.flush()?;
                writeln!(
                    self.console,
                    "wrote {} listings to {}",
                    jobs.len(),
                    path.display()
                )?;
            }
            None => {
                let mut buf = Vec::new();
                self.write_listing(&mut buf, jobs)?;
                self.console.write_all(&buf)?;
            }
        }
        self.console.flush()?;
        Ok(())
    }

    fn show_detail(&mut self, job: &JobRecord) -> Result<()> {
        let json = matches!(
            self.target,
            OutputTarget::JsonStdout | OutputTarget::JsonFile(_) | OutputTarget::JsonlFile(_)
        );
        let html = matches!(self.target, OutputTarget::HtmlFile(_));
        let out = self.notices();
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(job)?)?;
        } else if html {
            write_html_detail(out, job)?;
        } else {
            write_text_detail(out, job)?;
        }
        out.flush()?;
        Ok(())
    }

    fn hide_detail(&mut self) -> Result<()> {
        let out = self.notices();
        writeln!(out, "(details closed)")?;
        out.flush()?;
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        let out = self.notices();
        writeln!(out, "! {}", message)?;
        out.flush()?;
        Ok(())
    }
}

fn write_text_listing(w: &mut dyn Write, jobs: &[&JobRecord]) -> Result<()> {
    if jobs.is_empty() {
        writeln!(w, "(no listings)")?;
        return Ok(());
    }
    for (i, job) in jobs.iter().enumerate() {
        writeln!(w, "[{}] {}", i + 1, job.title)?;
        writeln!(w, "    Posted: {} minutes ago", job.posted_minutes)?;
        writeln!(w, "    Type: {}", job.employment_type)?;
        writeln!(w, "    Level: {}", job.experience_level)?;
        writeln!(w, "    Skill: {}", job.skill_tag)?;
    }
    Ok(())
}

fn write_text_detail(w: &mut dyn Write, job: &JobRecord) -> Result<()> {
    writeln!(w, "== {} ==", job.title)?;
    writeln!(w, "Job No: {}", job.id)?;
    writeln!(w, "Type: {}", job.employment_type)?;
    writeln!(w, "Level: {}", job.experience_level)?;
    writeln!(w, "Skill: {}", job.skill_tag)?;
    writeln!(w, "Estimated Time: {}", job.estimated_duration)?;
    writeln!(w, "Details:")?;
    for line in job.description_lines() {
        writeln!(w, "  {}", line)?;
    }
    writeln!(w, "Posted: {} minutes ago", job.posted_minutes)?;
    writeln!(w, "Link: {}", job.detail_page_url)?;
    Ok(())
}

fn write_json_listing(w: &mut dyn Write, jobs: &[&JobRecord]) -> Result<()> {
    write!(w, "[")?;
    for (i, job) in jobs.iter().enumerate() {
        if i > 0 {
            write!(w, ",")?;
        }
        let serialized = serde_json::to_string_pretty(job)?;
        write!(w, "\n{}", serialized)?;
    }
    writeln!(w, "\n]")?;
    Ok(())
}

fn write_jsonl_listing(w: &mut dyn Write, jobs: &[&JobRecord]) -> Result<()> {
    for job in jobs {
        let serialized = serde_json::to_string(job)?;
        writeln!(w, "{}", serialized)?;
    }
    Ok(())
}

const HEADER_FIELDS: [&str; 9] = [
    "job_no",
    "title",
    "posted_minutes",
    "type",
    "level",
    "estimated_time",
    "skill",
    "link",
    "detail",
];

fn row(job: &JobRecord) -> [String; 9] {
    [
        job.id.clone(),
        job.title.clone(),
        job.posted_minutes.to_string(),
        job.employment_type.clone(),
        job.experience_level.clone(),
        job.estimated_duration.clone(),
        job.skill_tag.clone(),
        job.detail_page_url.clone(),
        job.description.clone(),
    ]
}

fn write_csv_listing(w: &mut dyn Write, jobs: &[&JobRecord]) -> Result<()> {
    writeln!(w, "{}", HEADER_FIELDS.join(","))?;
    for job in jobs {
        let fields: Vec<String> = row(job).iter().map(|f| escape_csv_field(f)).collect();
        writeln!(w, "{}", fields.join(","))?;
    }
    Ok(())
}

fn write_tsv_listing(w: &mut dyn Write, jobs: &[&JobRecord]) -> Result<()> {
    writeln!(w, "{}", HEADER_FIELDS.join("\t"))?;
    for job in jobs {
        let fields: Vec<String> = row(job).iter().map(|f| escape_tsv_field(f)).collect();
        writeln!(w, "{}", fields.join("\t"))?;
    }
    Ok(())
}

fn write_html_listing(w: &mut dyn Write, jobs: &[&JobRecord]) -> Result<()> {
    writeln!(w, "<div id=\"jobListing\">")?;
    for (i, job) in jobs.iter().enumerate() {
        writeln!(w, "  <div class=\"job-item\" data-index=\"{}\">", i)?;
        writeln!(w, "    <h3>{}</h3>", escape_html(&job.title))?;
        writeln!(
            w,
            "    <p><strong>Posted:</strong> {} minutes ago</p>",
            job.posted_minutes
        )?;
        writeln!(w, "    <p><strong>Type:</strong> {}</p>", escape_html(&job.employment_type))?;
        writeln!(w, "    <p><strong>Level:</strong> {}</p>", escape_html(&job.experience_level))?;
        writeln!(w, "    <p><strong>Skill:</strong> {}</p>", escape_html(&job.skill_tag))?;
        writeln!(w, "  </div>")?;
    }
    writeln!(w, "</div>")?;
    Ok(())
}

fn write_html_detail(w: &mut dyn Write, job: &JobRecord) -> Result<()> {
    let details: Vec<String> = job.description_lines().into_iter().map(escape_html).collect();
    writeln!(w, "<div id=\"modal\">")?;
    writeln!(w, "  <h2>{}</h2>", escape_html(&job.title))?;
    writeln!(w, "  <p><strong>Type:</strong> {}</p>", escape_html(&job.employment_type))?;
    writeln!(w, "  <p><strong>Level:</strong> {}</p>", escape_html(&job.experience_level))?;
    writeln!(w, "  <p><strong>Skill:</strong> {}</p>", escape_html(&job.skill_tag))?;
    writeln!(w, "  <p><strong>Details:</strong> {}</p>", details.join("<br>"))?;
    writeln!(
        w,
        "  <p><strong>Posted:</strong> {} minutes ago</p>",
        job.posted_minutes
    )?;
    writeln!(
        w,
        "  <p><a href=\"{}\">Job page</a></p>",
        escape_html(&job.detail_page_url)
    )?;
    writeln!(w, "</div>")?;
    Ok(())
}

fn create_parent_dirs(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn escape_tsv_field(field: &str) -> String {
    field
        .replace('\t', " ")
        .replace('\n', " ")
        .replace('\r', " ")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
