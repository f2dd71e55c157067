use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use advisor::handlers::Document;
use advisor::ranking::DEFAULT_TEXT_FIELD;
use advisor::state::Settings;

#[derive(Parser)]
#[command(name = "advisor")]
#[command(author, version, about = "Career advisor: skills, careers, jobs and grounded answers", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Per-invocation overrides for values otherwise taken from the environment.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Minimum phrase/skill similarity for extraction
    #[arg(long, global = true)]
    pub threshold: Option<f32>,

    /// Number of clusters for career suggestion
    #[arg(long, global = true)]
    pub clusters: Option<usize>,

    /// Number of ranked records or roles to return
    #[arg(long, global = true)]
    pub top_n: Option<usize>,

    /// Number of corpus chunks retrieved for grounding
    #[arg(long, global = true)]
    pub top_k: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(threshold) = self.threshold {
            settings.extraction_threshold = threshold;
        }
        if let Some(k) = self.clusters {
            settings.cluster_k = k;
        }
        if let Some(n) = self.top_n {
            settings.rank_top_n = n;
        }
        if let Some(k) = self.top_k {
            settings.retrieval_top_k = k;
        }
    }
}

/// Text from an inline argument, a file, or stdin when neither is given.
#[derive(Args, Debug)]
pub struct TextInput {
    /// Inline text
    pub text: Option<String>,

    /// Read text from a file instead
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

impl TextInput {
    pub fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => read_file(path),
            (None, None) => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read text from stdin")?;
                Ok(buffer)
            }
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract vocabulary skills from a document
    Extract(TextInput),

    /// Cluster several documents and suggest a career for each
    Suggest {
        /// Plain-text documents, one per file
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Rank job or course records (JSON array of objects) against skills
    Recommend {
        /// JSON file with the records to rank
        #[arg(short, long)]
        records: PathBuf,

        /// Comma-separated skills; extracted from --resume when omitted
        #[arg(short, long, value_delimiter = ',')]
        skills: Vec<String>,

        /// Document to extract skills from
        #[arg(long, conflicts_with = "skills")]
        resume: Option<PathBuf>,

        /// Record field holding the skills text
        #[arg(long, default_value = DEFAULT_TEXT_FIELD)]
        field: String,
    },

    /// Rank career roles against a resume or a list of interests
    Roles(TextInput),

    /// Answer one question using retrieved context
    Ask {
        query: String,
    },

    /// Interactive question loop; type 'exit' or 'quit' to leave
    Chat,
}

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_documents(files: &[PathBuf]) -> Result<Vec<Document>> {
    files
        .iter()
        .map(|path| {
            Ok(Document {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                text: read_file(path)?,
            })
        })
        .collect()
}
