// main.rs — Thin CLI shell over the optimization pipeline

use clap::Parser;
use nefron::{
    OptimizationRequest, PromptOptimizer, Session, Settings, StyleOption,
    DEFAULT_MAX_OUTPUT_TOKENS,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nefron", about = "Optimize a task description into an LLM prompt")]
struct Args {
    /// Task description to optimize
    task: String,

    /// Prompt style: creative, step-by-step or structured
    #[arg(long, default_value = "structured")]
    style: String,

    /// Maximum output tokens (1-2048)
    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_TOKENS)]
    max_tokens: u32,

    /// Skip the quality judge
    #[arg(long)]
    no_judge: bool,

    /// Escalate to the secondary provider when the judge flags the draft
    #[arg(long)]
    escalate: bool,

    /// Decompose the optimized prompt and run each subtask
    #[arg(long)]
    decompose: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nefron=info")),
        )
        .init();

    let args = Args::parse();

    let style: StyleOption = match args.style.parse() {
        Ok(style) => style,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let request = match OptimizationRequest::new(&args.task, style, args.max_tokens) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let settings = Settings {
        judge_quality: !args.no_judge,
        escalate_on_low_quality: args.escalate,
        ..Settings::default()
    };

    let optimizer = PromptOptimizer::new(nefron::FallbackOrchestrator::from_env(), settings);
    let mut session = Session::new();

    if args.decompose {
        let report = optimizer.decompose_and_run(&mut session, &request).await;

        if report.results.is_empty() {
            println!("{}", report.optimized);
        } else {
            println!("{}", report.document);
        }
    } else {
        let report = optimizer.optimize(&mut session, &request).await;

        println!("## Draft\n{}", report.optimized);
        if let Some(verdict) = &report.verdict {
            println!("\n## Judge\n{}", verdict.raw);
        }
        if let Some(revised) = &report.escalated {
            println!("\n## Revised\n{}", revised);
        }
    }
}
