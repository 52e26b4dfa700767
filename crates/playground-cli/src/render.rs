//! Plain-text rendering of trace snapshots.

use colored::{Color, Colorize};
use playground_snapshot::{presentable, DisplayElement, Outcome, ScriptElement};
use playground_taxonomy::Category;
use playground_trace::{Navigation, ReadyTrace, StreamStatus};

fn category_color(category: Category) -> Color {
    match category {
        Category::Values => Color::Yellow,
        Category::StackOps => Color::Cyan,
        Category::CryptoOps => Color::Magenta,
        Category::ConstantOps => Color::Blue,
        Category::BitwiseLogicOps => Color::Green,
        Category::ArithmeticOps => Color::BrightGreen,
        Category::FlowControlOps => Color::Red,
        Category::LocktimeOps => Color::BrightBlue,
        Category::PseudoOps => Color::BrightBlack,
        Category::ReservedOps => Color::BrightRed,
        Category::SpliceOps => Color::BrightCyan,
    }
}

/// Renders snapshots, coloring elements by category when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Create a renderer, coloring output by opcode category when `color` is set.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn element(&self, element: &DisplayElement) -> String {
        match element.category {
            Some(category) if self.color => element
                .label
                .color(category_color(category))
                .to_string(),
            _ => element.label.clone(),
        }
    }

    fn elements(&self, elements: &[ScriptElement]) -> String {
        let shown = presentable(elements);
        if shown.is_empty() {
            return "-".to_string();
        }
        shown
            .iter()
            .map(|e| self.element(e))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn headline(&self, ready: &ReadyTrace) -> String {
        let headline = ready.headline();
        if !self.color {
            return headline;
        }
        match ready.snapshot.outcome {
            Outcome::Pending => headline.bold().to_string(),
            Outcome::Result(true) => headline.green().bold().to_string(),
            Outcome::Result(false) => headline.red().bold().to_string(),
        }
    }

    /// Headline, stacks and remaining script of a snapshot.
    pub fn snapshot(&self, ready: &ReadyTrace) -> String {
        let snapshot = &ready.snapshot;
        let mut lines = vec![self.headline(ready)];

        let mut field = |name: &str, elements: &[ScriptElement]| {
            lines.push(format!("  {:<16}{}", format!("{name}:"), self.elements(elements)));
        };
        field("main stack", &snapshot.main_stack);
        field("alt stack", &snapshot.alt_stack);
        field("remaining", &snapshot.remaining_script());
        if let Some(script) = &snapshot.p2sh_script {
            field("p2sh script", script);
        }
        if let Some(script) = &snapshot.witness_script {
            field("witness script", script);
        }
        if let Some(items) = &snapshot.witness_stack_items {
            field("witness stack", items);
        }

        if ready.stream == Some(StreamStatus::Cancelled) {
            lines.push("  (stream cancelled)".to_string());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Previous and next links of a stepped snapshot.
    pub fn navigation(&self, navigation: &Navigation) -> String {
        let mut out = String::new();
        if let Some(previous) = &navigation.previous {
            out.push_str(&format!("previous: {previous}\n"));
        }
        if let Some(next) = &navigation.next {
            out.push_str(&format!("next:     {next}\n"));
        }
        out
    }
}
