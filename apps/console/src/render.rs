use std::fmt::Write as _;

use fluxgate_domain::{DashboardStats, Rule, SimulationInput, SimulationResult};

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";
const DIM: &str = "2";

/// Plain-text dashboard renderer.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_owned()
        }
    }

    pub fn stats(&self, stats: &DashboardStats) -> String {
        format!(
            "Total rules:  {}\nActive:       {}\nDisabled:     {}\nRule sets:    {}\nLast updated: {}",
            stats.total_rules,
            self.paint(GREEN, &stats.active_rules.to_string()),
            self.paint(DIM, &stats.disabled_rules.to_string()),
            stats.total_rule_sets,
            stats.last_updated.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }

    pub fn rule_table(&self, rules: &[Rule]) -> String {
        if rules.is_empty() {
            return "No rules found.".to_owned();
        }

        let id_width = rules.iter().map(|rule| rule.id.len()).max().unwrap_or(0);
        let mut output = String::new();
        for rule in rules {
            let status = if rule.enabled {
                self.paint(GREEN, "on ")
            } else {
                self.paint(DIM, "off")
            };
            let _ = writeln!(
                output,
                "{status}  {:<id_width$}  {}  {}  [{}]",
                rule.id,
                rule.name,
                rule.scope.as_str(),
                rule.rule_set_id.as_deref().unwrap_or("-"),
            );
        }
        output.trim_end().to_owned()
    }

    pub fn rule_detail(&self, rule: &Rule) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{} ({})", rule.name, rule.id);
        let _ = writeln!(
            output,
            "  status:    {}",
            if rule.enabled {
                self.paint(GREEN, "enabled")
            } else {
                self.paint(DIM, "disabled")
            }
        );
        let _ = writeln!(output, "  scope:     {}", rule.scope.as_str());
        let _ = writeln!(output, "  key:       {}", rule.key_strategy_id);
        let _ = writeln!(
            output,
            "  on limit:  {}",
            rule.on_limit_exceed_policy.as_str()
        );
        let _ = writeln!(
            output,
            "  rule set:  {}",
            rule.rule_set_id.as_deref().unwrap_or("-")
        );
        if !rule.tags.is_empty() {
            let _ = writeln!(output, "  tags:      {}", rule.tags.join(", "));
        }
        if !rule.attributes.is_empty() {
            let attributes = serde_json::Value::Object(rule.attributes.clone());
            let _ = writeln!(output, "  attributes: {attributes}");
        }
        let _ = writeln!(output, "  bands:");
        for band in &rule.bands {
            let _ = writeln!(
                output,
                "    {} req / {}s  {}",
                band.capacity, band.window_seconds, band.label
            );
        }
        output.trim_end().to_owned()
    }

    pub fn simulation(
        &self,
        rule: &Rule,
        input: &SimulationInput,
        result: &SimulationResult,
    ) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Simulating {} requests from {} to {} against {}",
            input.burst, input.key, input.path, rule.id
        );
        let verdict = if result.allowed {
            self.paint(GREEN, "Request Allowed")
        } else {
            self.paint(RED, "Rate Limit Exceeded")
        };
        let _ = writeln!(
            output,
            "{verdict}  consumed {} remaining {}",
            result.consumed, result.remaining
        );
        for band in &result.bands {
            let usage = format!("{}/{}", band.consumed, band.capacity);
            let usage = if band.exceeded {
                self.paint(RED, &usage)
            } else {
                usage
            };
            let _ = writeln!(output, "  {:<20} {usage}", band.label);
        }
        if let Some(band) = result.first_exceeded_band() {
            let _ = writeln!(
                output,
                "{}",
                self.paint(YELLOW, &format!("First exceeded band: {}", band.label))
            );
        }
        output.trim_end().to_owned()
    }

    pub fn error_banner(&self, message: &str) -> String {
        self.paint(RED, &format!("error: {message}"))
    }
}
