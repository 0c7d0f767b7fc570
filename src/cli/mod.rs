use clap::{Parser, Subcommand};

use crate::analysis::Keyword;

#[derive(Parser)]
#[command(name = "semalign")]
#[command(author = "Semalign Team")]
#[command(version)]
#[command(about = "Semantic keyword-alignment scoring and content improvement", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a text against weighted keywords and a competitor text
    Analyze {
        /// Keywords as "text:weight" pairs, comma separated (e.g. "seo:3,content:1")
        #[arg(short, long, required = true)]
        keywords: String,

        /// Path to the main text file
        #[arg(short, long, required = true)]
        main: String,

        /// Path to the competitor text file
        #[arg(short, long, required = true)]
        competitor: String,

        /// Analyze per section instead of whole-document
        #[arg(long)]
        chunked: bool,

        /// Emit the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite the main text to incorporate recommended keywords
    Enhance {
        /// Keywords as "text:weight" pairs, comma separated
        #[arg(short, long, required = true)]
        keywords: String,

        /// Path to the main text file
        #[arg(short, long, required = true)]
        main: String,

        /// Path to the competitor text file
        #[arg(short, long, required = true)]
        competitor: String,

        /// Write the rewritten text here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show current configuration
    Config,
}

/// Parse a "text:weight,text:weight" keyword specification. Weight is
/// optional and defaults to 1.
pub fn parse_keywords(spec: &str) -> Result<Vec<Keyword>, String> {
    let mut keywords = Vec::new();
    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (text, weight) = match entry.rsplit_once(':') {
            Some((text, weight_str)) => {
                let weight: f32 = weight_str
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid weight in \"{}\"", entry))?;
                (text.trim(), weight)
            }
            None => (entry, 1.0),
        };
        if text.is_empty() {
            return Err(format!("empty keyword in \"{}\"", entry));
        }
        keywords.push(Keyword::new(text, weight));
    }
    if keywords.is_empty() {
        return Err("no keywords given".to_string());
    }
    Ok(keywords)
}
