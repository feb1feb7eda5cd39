#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelsArg {
    Emoji,
    Text,
}

#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Hide the cost segment
    #[arg(long, env = "CLAUDE_LINE_HIDE_COST")]
    pub hide_cost: bool,

    /// Hide the token segment
    #[arg(long, env = "CLAUDE_LINE_HIDE_TOKENS")]
    pub hide_tokens: bool,

    /// Drop burn rates ($/h, tok/min) from the cost and token segments
    #[arg(long, env = "CLAUDE_LINE_HIDE_BURN_RATE")]
    pub hide_burn_rate: bool,

    /// Hide the session countdown segment
    #[arg(long, env = "CLAUDE_LINE_HIDE_SESSION")]
    pub hide_session: bool,

    /// Hide the session progress bar
    #[arg(long, env = "CLAUDE_LINE_HIDE_PROGRESS_BAR")]
    pub hide_progress_bar: bool,

    /// Segment labels: emoji|text
    #[arg(long, value_enum, default_value_t = LabelsArg::Emoji)]
    pub labels: LabelsArg,

    /// Debug mode: print extraction and resolver details to stderr
    #[arg(long, env = "CLAUDE_LINE_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }

    pub fn features(&self) -> FeatureConfig {
        FeatureConfig {
            show_cost: !self.hide_cost,
            show_tokens: !self.hide_tokens,
            show_burn_rate: !self.hide_burn_rate,
            show_session: !self.hide_session,
            show_progress_bar: !self.hide_progress_bar,
        }
    }
}

/// Which optional segments a render should produce. Threaded explicitly
/// through every component; there is no process-wide display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureConfig {
    pub show_cost: bool,
    pub show_tokens: bool,
    pub show_burn_rate: bool,
    pub show_session: bool,
    pub show_progress_bar: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            show_cost: true,
            show_tokens: true,
            show_burn_rate: true,
            show_session: true,
            show_progress_bar: true,
        }
    }
}

impl FeatureConfig {
    /// The session countdown and progress bar are the only segments backed by
    /// the external usage tool. Checked before any subprocess is spawned.
    pub fn needs_usage_query(&self) -> bool {
        self.show_session || self.show_progress_bar
    }
}
