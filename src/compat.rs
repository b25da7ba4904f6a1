//! Pairwise compatibility rules over selected candidates.
//!
//! Rules are stateless and independent: every applicable rule runs even when
//! an earlier one fails, so the report is always complete. A missing
//! component or attribute yields `Skipped`, never a silent omission and
//! never `Fail`.

use crate::models::{ComponentCandidate, CompatibilityReport, RuleStatus};

pub const RULE_CPU_MOTHERBOARD: &str = "cpu_motherboard";
pub const RULE_RAM_MOTHERBOARD: &str = "ram_motherboard";
pub const RULE_CASE_MOTHERBOARD: &str = "case_motherboard";

/// Evaluate all compatibility rules over one selected candidate per category.
pub fn check(candidates: &[ComponentCandidate]) -> CompatibilityReport {
    let cpu = find(candidates, "cpu");
    let motherboard = find(candidates, "motherboard");
    let ram = find(candidates, "ram");
    let case = find(candidates, "case");

    let mut report = CompatibilityReport::default();
    socket_rule(&mut report, cpu, motherboard);
    memory_rule(&mut report, ram, motherboard);
    form_factor_rule(&mut report, case, motherboard);
    report
}

fn find<'a>(
    candidates: &'a [ComponentCandidate],
    category: &str,
) -> Option<&'a ComponentCandidate> {
    candidates
        .iter()
        .find(|c| c.category.trim().eq_ignore_ascii_case(category))
}

/// Pass iff cpu.socket == motherboard.socket, case-insensitive and trimmed.
fn socket_rule(
    report: &mut CompatibilityReport,
    cpu: Option<&ComponentCandidate>,
    motherboard: Option<&ComponentCandidate>,
) {
    let (cpu, motherboard) = match require_pair(report, RULE_CPU_MOTHERBOARD, cpu, "cpu", motherboard) {
        Some(pair) => pair,
        None => return,
    };

    let cpu_socket = match cpu.attr("socket") {
        Some(s) => s,
        None => return skip_attr(report, RULE_CPU_MOTHERBOARD, &cpu.name, "socket"),
    };
    let mb_socket = match motherboard.attr("socket") {
        Some(s) => s,
        None => return skip_attr(report, RULE_CPU_MOTHERBOARD, &motherboard.name, "socket"),
    };

    if cpu_socket.eq_ignore_ascii_case(mb_socket) {
        report.insert(
            RULE_CPU_MOTHERBOARD,
            RuleStatus::Pass,
            format!("socket {cpu_socket} matches"),
        );
    } else {
        report.insert(
            RULE_CPU_MOTHERBOARD,
            RuleStatus::Fail,
            format!("cpu socket {cpu_socket} does not fit motherboard socket {mb_socket}"),
        );
    }
}

/// Pass iff ram fits the motherboard's memory ceiling and slot count.
fn memory_rule(
    report: &mut CompatibilityReport,
    ram: Option<&ComponentCandidate>,
    motherboard: Option<&ComponentCandidate>,
) {
    let (ram, motherboard) = match require_pair(report, RULE_RAM_MOTHERBOARD, ram, "ram", motherboard)
    {
        Some(pair) => pair,
        None => return,
    };

    let capacity = match ram.numeric_attr("capacity_total") {
        Some(v) => v,
        None => return skip_attr(report, RULE_RAM_MOTHERBOARD, &ram.name, "capacity_total"),
    };
    let modules = match ram.numeric_attr("module_count") {
        Some(v) => v,
        None => return skip_attr(report, RULE_RAM_MOTHERBOARD, &ram.name, "module_count"),
    };
    let max_memory = match motherboard.numeric_attr("max_memory") {
        Some(v) => v,
        None => return skip_attr(report, RULE_RAM_MOTHERBOARD, &motherboard.name, "max_memory"),
    };
    let slots = match motherboard.numeric_attr("memory_slots") {
        Some(v) => v,
        None => return skip_attr(report, RULE_RAM_MOTHERBOARD, &motherboard.name, "memory_slots"),
    };

    if capacity > max_memory {
        report.insert(
            RULE_RAM_MOTHERBOARD,
            RuleStatus::Fail,
            format!("{capacity} GB exceeds motherboard maximum of {max_memory} GB"),
        );
    } else if modules > slots {
        report.insert(
            RULE_RAM_MOTHERBOARD,
            RuleStatus::Fail,
            format!("{modules} modules exceed the {slots} available memory slots"),
        );
    } else {
        report.insert(
            RULE_RAM_MOTHERBOARD,
            RuleStatus::Pass,
            format!("{capacity} GB in {modules} modules fits {max_memory} GB / {slots} slots"),
        );
    }
}

/// Pass iff the case's supported form factor set contains the motherboard's.
fn form_factor_rule(
    report: &mut CompatibilityReport,
    case: Option<&ComponentCandidate>,
    motherboard: Option<&ComponentCandidate>,
) {
    let (case, motherboard) =
        match require_pair(report, RULE_CASE_MOTHERBOARD, case, "case", motherboard) {
            Some(pair) => pair,
            None => return,
        };

    let supported = match case.attr("supported_form_factors") {
        Some(s) => s,
        None => {
            return skip_attr(
                report,
                RULE_CASE_MOTHERBOARD,
                &case.name,
                "supported_form_factors",
            )
        }
    };
    let form_factor = match motherboard.attr("form_factor") {
        Some(s) => s,
        None => return skip_attr(report, RULE_CASE_MOTHERBOARD, &motherboard.name, "form_factor"),
    };

    let supported_set: Vec<&str> = supported
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if supported_set
        .iter()
        .any(|s| s.eq_ignore_ascii_case(form_factor))
    {
        report.insert(
            RULE_CASE_MOTHERBOARD,
            RuleStatus::Pass,
            format!("case supports {form_factor}"),
        );
    } else {
        report.insert(
            RULE_CASE_MOTHERBOARD,
            RuleStatus::Fail,
            format!("case supports [{supported}], not motherboard form factor {form_factor}"),
        );
    }
}

/// Both sides of a rule must be present; otherwise record Skipped and bail.
fn require_pair<'a>(
    report: &mut CompatibilityReport,
    rule: &str,
    left: Option<&'a ComponentCandidate>,
    left_category: &str,
    motherboard: Option<&'a ComponentCandidate>,
) -> Option<(&'a ComponentCandidate, &'a ComponentCandidate)> {
    match (left, motherboard) {
        (Some(l), Some(m)) => Some((l, m)),
        (None, _) => {
            report.insert(
                rule,
                RuleStatus::Skipped,
                format!("no {left_category} selected"),
            );
            None
        }
        (_, None) => {
            report.insert(rule, RuleStatus::Skipped, "no motherboard selected");
            None
        }
    }
}

fn skip_attr(report: &mut CompatibilityReport, rule: &str, component: &str, attribute: &str) {
    report.insert(
        rule,
        RuleStatus::Skipped,
        format!("{component} is missing attribute '{attribute}'"),
    );
}
