use anyhow::Result;
use chrono::Utc;
#[cfg(feature = "colors")]
use owo_colors::OwoColorize;
#[cfg(feature = "git")]
use std::path::Path;

use claude_line::cli::Args;
#[cfg(not(feature = "colors"))]
use claude_line::display::color_shim::ColorizeShim;
use claude_line::display::{render_line, resolve_style};
use claude_line::extract::{derive_metrics, select_extractor};
use claude_line::segments::{assemble, RenderContext};
use claude_line::session::resolve_session;
use claude_line::utils::{format_path, read_stdin};

fn main() -> Result<()> {
    let args = Args::parse();
    let features = args.features();
    let style = resolve_style(&args);

    let stdin = read_stdin()?;
    if stdin.is_empty() {
        println!("{} {}", "❯".cyan(), "[waiting for session]".dimmed());
        return Ok(());
    }

    let extractor = select_extractor();
    let fields = extractor.extract(&stdin);

    let mut metrics = derive_metrics(&fields, &features);
    metrics.session = resolve_session(Utc::now().timestamp(), &features);

    // Git info from project_dir or current_dir (feature-gated)
    let git = {
        #[cfg(feature = "git")]
        {
            let dir = fields
                .project_dir
                .as_deref()
                .or(fields.current_dir.as_deref());
            dir.and_then(|d| claude_line::git::read_git_info(Path::new(d)))
                .and_then(|info| claude_line::display::format_git(&info))
        }
        #[cfg(not(feature = "git"))]
        {
            None
        }
    };

    let ctx = RenderContext {
        directory: fields.current_dir.as_deref().map(format_path),
        git,
        model: fields.model_display_name.clone(),
    };

    let segments = assemble(&ctx, &metrics, &features);
    println!("{}", render_line(&segments, &style));

    if args.debug {
        eprintln!();
        eprintln!("{}", "=== Debug Information ===".bright_black());
        eprintln!("Extractor: {}", extractor.name());
        eprintln!(
            "Fields: cost={:?} duration_ms={:?} input={:?} output={:?}",
            fields.cost_usd,
            fields.total_duration_ms,
            fields.total_input_tokens,
            fields.total_output_tokens
        );
        eprintln!(
            "Derived: cost/h={:?} tokens={:?} tok/min={:?}",
            metrics.cost_per_hour, metrics.total_tokens, metrics.tokens_per_minute
        );
        match &metrics.session {
            Some(s) => eprintln!(
                "Session: {}% elapsed, {}s remaining",
                s.elapsed_pct, s.remaining_seconds
            ),
            None => eprintln!("Session: no active window"),
        }
        eprintln!("Segments: {}", segments.len());
        eprintln!("{}", "========================".bright_black());
    }

    Ok(())
}
