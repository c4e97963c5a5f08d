// crates/puli-cli/src/output.rs - Styled terminal output
//
// Renderers produce lines containing style tags (`<c1>`, `<bad>`, ...). This
// is the only place where tags become ANSI colors, or disappear when colors
// are off. Unbalanced tags such as the `<uuid>` placeholder in hints are
// printed literally.

use anyhow::Result;
use console::Style;
use indexmap::IndexMap;
use std::io::Write;

use puli_core::config::{ColorChoice, PuliConfig};
use puli_core::width::segments;

/// Result of a command: styled lines, or raw text printed untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Lines(Vec<String>),
    Raw(String),
}

/// Turns style tags into terminal styles
#[derive(Debug, Clone)]
pub struct Styler {
    enabled: bool,
    styles: IndexMap<String, String>,
}

impl Styler {
    pub fn new(config: &PuliConfig) -> Self {
        let enabled = match config.output.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => console::colors_enabled(),
        };
        Self {
            enabled,
            styles: config.styles.clone(),
        }
    }

    /// Render one line: apply the styles of active tags, drop markup
    pub fn apply(&self, line: &str) -> String {
        let mut rendered = String::with_capacity(line.len());
        for segment in segments(line) {
            match self.style_for(&segment.tags) {
                Some(style) if self.enabled => {
                    rendered.push_str(&style.apply_to(segment.text).to_string());
                }
                _ => rendered.push_str(segment.text),
            }
        }
        rendered
    }

    /// Combined style of nested tags; unknown tags contribute nothing
    fn style_for(&self, tags: &[&str]) -> Option<Style> {
        let specs: Vec<&str> = tags
            .iter()
            .filter_map(|tag| self.styles.get(*tag).map(String::as_str))
            .collect();
        if specs.is_empty() {
            return None;
        }
        Some(Style::from_dotted_str(&specs.join(".")).force_styling(true))
    }
}

/// Writes command output through a styler
pub struct Output<W: Write> {
    writer: W,
    styler: Styler,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, styler: Styler) -> Self {
        Self { writer, styler }
    }

    pub fn write(&mut self, output: &CommandOutput) -> Result<()> {
        match output {
            CommandOutput::Lines(lines) => {
                for line in lines {
                    writeln!(self.writer, "{}", self.styler.apply(line))?;
                }
            }
            CommandOutput::Raw(text) => writeln!(self.writer, "{}", text)?,
        }
        self.writer.flush()?;
        Ok(())
    }
}
