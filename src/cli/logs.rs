use super::ui;
use crate::core::ActivityLog;

/// Prints the most recent activity, newest first.
pub fn run(log: &dyn ActivityLog, count: usize) -> Vec<String> {
    let lines = log.last_lines(count);
    if lines.is_empty() {
        println!("{}", ui::style_text("No activity yet.", ui::StyleType::Subtle));
    }
    for line in &lines {
        println!("{line}");
    }
    lines
}
