//! # Display Module
//!
//! Maps assembled segments to labeled, colorized strings and joins them into
//! the final line. Color is a presentation concern only: the segment content
//! is identical with colors on or off, and `NO_COLOR` disables all
//! colorization regardless of configuration.

use std::env;

#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

// Provide a no-op color shim when "colors" feature is disabled
#[cfg(not(feature = "colors"))]
pub mod color_shim {
    use std::fmt::{self, Display, Formatter};

    #[derive(Clone)]
    pub struct Plain(pub String);

    impl Display for Plain {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    pub trait ColorizeShim {
        fn as_str(&self) -> &str;

        fn red(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn green(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn yellow(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn cyan(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_black(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_cyan(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_green(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_yellow(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_magenta(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_white(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn dimmed(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
    }

    impl ColorizeShim for &str {
        fn as_str(&self) -> &str {
            self
        }
    }
    impl ColorizeShim for String {
        fn as_str(&self) -> &str {
            self.as_str()
        }
    }
    impl ColorizeShim for Plain {
        fn as_str(&self) -> &str {
            &self.0
        }
    }
}

#[cfg(not(feature = "colors"))]
use color_shim::ColorizeShim as OwoColorize;

use crate::cli::{Args, LabelsArg};
use crate::segments::Segment;
use crate::utils::{bar_tier, format_currency, format_tokens, BarTier, BAR_FILLED};

#[cfg(feature = "git")]
use crate::models::GitInfo;

/// Presentation options for one render, resolved once in main.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub use_color: bool,
    pub labels: LabelsArg,
}

pub fn resolve_style(args: &Args) -> Style {
    // NO_COLOR is a universal override, checked before any segment is painted
    let use_color = cfg!(feature = "colors") && env::var("NO_COLOR").is_err();
    Style {
        use_color,
        labels: args.labels,
    }
}

pub fn render_line(segments: &[Segment], style: &Style) -> String {
    segments
        .iter()
        .map(|s| render_segment(s, style))
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_segment(segment: &Segment, style: &Style) -> String {
    match segment {
        Segment::Directory(dir) => {
            let value = if style.use_color {
                dir.bright_cyan().to_string()
            } else {
                dir.clone()
            };
            prefixed(style, "📁", "", &value)
        }
        Segment::Git(git) => {
            let value = if style.use_color {
                git.green().to_string()
            } else {
                git.clone()
            };
            prefixed(style, "🌿", "git:", &value)
        }
        Segment::Model(model) => {
            let value = model_colored_name(model, style);
            prefixed(style, "🤖", "", &value)
        }
        Segment::Session {
            text,
            bar,
            elapsed_pct,
        } => {
            let mut parts = Vec::new();
            if let Some(text) = text {
                let value = if style.use_color {
                    paint_session_text(text, *elapsed_pct)
                } else {
                    text.clone()
                };
                parts.push(prefixed(style, "⌛", "session:", &value));
            }
            if let Some(bar) = bar {
                parts.push(paint_bar(bar, *elapsed_pct, style.use_color));
            }
            parts.join(" ")
        }
        Segment::Cost { usd, per_hour } => {
            let plain = match per_hour {
                Some(rate) => format!(
                    "${} (${}/h)",
                    format_currency(*usd),
                    format_currency(*rate)
                ),
                None => format!("${}", format_currency(*usd)),
            };
            let value = if style.use_color {
                plain.bright_yellow().to_string()
            } else {
                plain
            };
            prefixed(style, "💵", "", &value)
        }
        Segment::Tokens { total, per_minute } => {
            let plain = match per_minute {
                Some(rate) => format!("{} tok ({:.0} tpm)", format_tokens(*total), rate),
                None => format!("{} tok", format_tokens(*total)),
            };
            let value = if style.use_color {
                plain.bright_magenta().to_string()
            } else {
                plain
            };
            prefixed(style, "📊", "tok:", &value)
        }
    }
}

fn prefixed(style: &Style, emoji: &str, text_label: &str, value: &str) -> String {
    let label = match style.labels {
        LabelsArg::Emoji => emoji,
        LabelsArg::Text => text_label,
    };
    if label.is_empty() {
        value.to_string()
    } else {
        format!("{label} {value}")
    }
}

fn model_colored_name(display: &str, style: &Style) -> String {
    if !style.use_color {
        return display.to_string();
    }
    let lower = display.to_lowercase();
    if lower.contains("opus") {
        display.bright_magenta().to_string()
    } else if lower.contains("sonnet") {
        display.bright_yellow().to_string()
    } else if lower.contains("haiku") {
        display.bright_cyan().to_string()
    } else {
        display.bright_white().to_string()
    }
}

/// Countdown accent tracks how much of the window is left: under 10%
/// remaining reads as red, under 25% as yellow, otherwise green.
fn paint_session_text(text: &str, elapsed_pct: u8) -> String {
    let remaining_pct = 100u8.saturating_sub(elapsed_pct);
    if remaining_pct <= 10 {
        text.red().to_string()
    } else if remaining_pct <= 25 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

fn paint_bar(bar: &str, pct: u8, use_color: bool) -> String {
    if !use_color {
        return format!("[{bar}]");
    }
    let filled: String = bar.chars().take_while(|c| *c == BAR_FILLED).collect();
    let empty: String = bar.chars().skip(filled.chars().count()).collect();
    let filled = match bar_tier(pct) {
        BarTier::Danger => filled.red().to_string(),
        BarTier::Caution => filled.yellow().to_string(),
        BarTier::Healthy => filled.green().to_string(),
    };
    format!("[{}{}]", filled, empty.bright_black())
}

/// Collapse git info into the one-line form the git segment shows: branch
/// (or short commit when detached) plus a dirty marker.
#[cfg(feature = "git")]
pub fn format_git(info: &GitInfo) -> Option<String> {
    let mut seg = match (&info.branch, &info.short_commit) {
        (Some(branch), _) => branch.clone(),
        (None, Some(commit)) => format!("(detached@{commit})"),
        (None, None) => return None,
    };
    if info.is_clean == Some(false) {
        seg.push('*');
    }
    Some(seg)
}
