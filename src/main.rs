use std::{fs, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use leetcode_sync::{
    derive_path, render_preview, ClientConfig, ClientConfigBuilder, FileKind, Language,
    ManualProblem, Placement, ProblemRecord, PublishTargetBuilder, SolutionDraft, SolutionRecord,
    SyncClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "leetcode-sync")]
#[command(about = "Document a solved LeetCode problem and publish it to GitHub")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Attempts per LeetCode request
    #[arg(long, global = true, default_value_t = 3)]
    retries: u32,

    /// Request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 10_000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a problem and show its parsed content
    Fetch {
        number: String,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the README preview
    Preview {
        #[command(flatten)]
        problem: ProblemArgs,
        #[command(flatten)]
        solution: SolutionArgs,
    },
    /// Commit README and solution to a repository
    Publish {
        #[command(flatten)]
        problem: ProblemArgs,
        #[command(flatten)]
        solution: SolutionArgs,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
        #[arg(long, default_value = "main")]
        branch: String,
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Check a GitHub token
    Validate {
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Print the repository paths a solution would be written to
    Path {
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        subcategory: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "typescript")]
        language: String,
    },
}

#[derive(Args, Debug)]
struct ProblemArgs {
    /// Problem number to fetch from LeetCode
    #[arg(long, conflicts_with = "problem_file")]
    number: Option<String>,
    /// JSON file with a manually entered problem
    #[arg(long)]
    problem_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SolutionArgs {
    /// File holding the solution source
    #[arg(long)]
    code_file: Option<PathBuf>,
    #[arg(long)]
    language: Option<Language>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    subcategory: Option<String>,
    #[arg(long)]
    approach: Option<String>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    space: Option<String>,
}

impl SolutionArgs {
    fn code(&self) -> Result<Option<String>> {
        self.code_file
            .as_ref()
            .map(|path| {
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
            })
            .transpose()
    }

    fn draft(&self) -> Result<SolutionDraft> {
        Ok(SolutionDraft {
            code: self.code()?,
            language: self.language,
            approach: self.approach.clone(),
            time_complexity: self.time.clone(),
            space_complexity: self.space.clone(),
        })
    }

    fn record(&self) -> Result<SolutionRecord> {
        let Some(code) = self.code()? else {
            bail!("--code-file is required to publish");
        };
        let Some(category) = self.category.as_deref() else {
            bail!("--category is required to publish");
        };
        let placement = Placement::parse(category, self.subcategory.as_deref().unwrap_or(""))?;
        Ok(SolutionRecord {
            code,
            language: self.language.unwrap_or(Language::TypeScript),
            category: placement.category,
            subcategory: placement.subcategory,
            approach: self.approach.clone().unwrap_or_default(),
            time_complexity: self.time.clone().unwrap_or_default(),
            space_complexity: self.space.clone().unwrap_or_default(),
        })
    }
}

impl ProblemArgs {
    async fn resolve(&self, client: &SyncClient) -> Result<Option<ProblemRecord>> {
        if let Some(number) = &self.number {
            return Ok(Some(client.fetch_problem(number).await?));
        }
        match &self.problem_file {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let manual: ManualProblem = serde_json::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(Some(manual.into()))
            }
            None => Ok(None),
        }
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_config(cli: &Cli) -> Result<ClientConfig> {
    Ok(ClientConfigBuilder::default()
        .retry_count(cli.retries)
        .timeout(Duration::from_millis(cli.timeout_ms))
        .build()?)
}

fn print_problem(problem: &ProblemRecord) {
    let parsed = problem.parsed();
    println!("# {}. {} ({})", problem.frontend_id, problem.title, problem.difficulty);
    println!("{}", problem.url);
    if !problem.topic_tags.is_empty() {
        println!("Topics: {}", problem.topic_tags.join(", "));
    }
    println!("\n{}", parsed.statement);
    for (i, example) in parsed.examples.iter().enumerate() {
        println!("\nExample {}:", i + 1);
        println!("  Input: {}", example.input);
        println!("  Output: {}", example.output);
        if let Some(explanation) = &example.explanation {
            println!("  Explanation: {}", explanation);
        }
    }
    if !parsed.constraints.is_empty() {
        println!("\nConstraints:\n{}", parsed.constraints);
    }
    for hint in &problem.hints {
        println!("\nHint: {}", hint);
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let client = SyncClient::new(build_config(&cli)?)?;

    match cli.command {
        Command::Fetch { number, json } => {
            let problem = client.fetch_problem(&number).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&problem)?);
            } else {
                print_problem(&problem);
            }
        }
        Command::Preview { problem, solution } => {
            let problem = problem.resolve(&client).await?;
            print!("{}", render_preview(problem.as_ref(), &solution.draft()?)?);
        }
        Command::Publish {
            problem,
            solution,
            owner,
            repo,
            branch,
            token,
        } => {
            let Some(problem) = problem.resolve(&client).await? else {
                bail!("either --number or --problem-file is required");
            };
            let solution = solution.record()?;
            let target = PublishTargetBuilder::default()
                .owner(owner)
                .repo(repo)
                .branch(branch)
                .token(token)
                .build()?;
            let result = client.publish(&target, &problem, &solution).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Validate { token } => {
            let result = client.validate_token(&token).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Path {
            category,
            subcategory,
            number,
            title,
            language,
        } => {
            let placement = Placement::parse(&category, &subcategory)?;
            let (category, subcategory) = (
                placement.category.to_string(),
                placement.subcategory.to_string(),
            );
            for kind in [FileKind::Readme, FileKind::Solution(&language)] {
                println!(
                    "{}",
                    derive_path(&category, &subcategory, &number, &title, kind)
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    run(cli).await
}
