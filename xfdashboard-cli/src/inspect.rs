//! The subcommands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use xfdashboard_bindings::{Binding, BindingsPool, BindingsSources};
use xfdashboard_css::{Selector, SelectorRule, Stylesheet};

/// Rules of a selector, head first.
fn chain(selector: &Selector) -> Vec<&SelectorRule> {
    std::iter::successors(Some(selector.rule()), |rule| rule.parent()).collect()
}

fn rule_summary(rule: &SelectorRule) -> Value {
    json!({
        "segment": rule.segment().to_string(),
        "type": rule.type_name,
        "id": rule.id,
        "classes": rule.classes,
        "pseudo_classes": rule.pseudo_classes,
        "parent_mode": rule.parent_mode().as_ref(),
        "line": rule.line,
        "column": rule.column,
    })
}

fn selector_summary(text: &str, selector: &Selector) -> Value {
    json!({
        "input": text,
        "selector": selector.to_string(),
        "priority": selector.priority(),
        "chain": chain(selector).into_iter().map(rule_summary).collect::<Vec<_>>(),
    })
}

pub fn selectors(texts: &[String], as_json: bool) -> Result<()> {
    let parsed = texts
        .iter()
        .map(|text| {
            Selector::parse(text)
                .map(|selector| (text.as_str(), selector))
                .with_context(|| format!("invalid selector '{text}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    if as_json {
        let summaries: Vec<Value> =
            parsed.iter().map(|(text, selector)| selector_summary(text, selector)).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for (text, selector) in &parsed {
        println!("{}", selector.bold());
        if *text != selector.to_string() {
            println!("  {} {text}", "input:".dimmed());
        }
        for (depth, rule) in chain(selector).into_iter().enumerate() {
            println!(
                "  [{depth}] {} {}",
                rule.segment().to_string().cyan(),
                format!("({}:{}, {})", rule.line, rule.column, rule.parent_mode()).dimmed()
            );
        }
    }
    Ok(())
}

pub fn stylesheet(path: &Path, priority: i32) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let sheet = Stylesheet::parse(&text, &path.display().to_string(), priority)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    println!("{} {}", sheet.rules.len().bold(), "rules".bold());
    for rule in &sheet.rules {
        let selectors: Vec<String> = rule.selectors.iter().map(ToString::to_string).collect();
        println!("{} {{", selectors.join(", ").cyan());
        for declaration in &rule.declarations {
            println!("    {}: {};", declaration.name.green(), declaration.value);
        }
        println!("}}");
    }
    Ok(())
}

fn load_pool(files: &[PathBuf]) -> Result<BindingsPool> {
    let mut pool = BindingsPool::new();
    if files.is_empty() {
        let report = pool
            .load(&BindingsSources::from_environment())
            .context("failed to load bindings")?;
        for (path, count) in &report.loaded {
            tracing::info!(path = %path.display(), bindings = count, "loaded bindings file");
        }
        return Ok(pool);
    }

    for path in files {
        let count = pool
            .load_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        tracing::info!(path = %path.display(), bindings = count, "loaded bindings file");
    }
    Ok(pool)
}

pub fn bindings(files: &[PathBuf], as_json: bool) -> Result<()> {
    let pool = load_pool(files)?;
    let mut sorted: Vec<&Binding> = pool.iter().collect();
    sorted.sort_by_key(|binding| binding.identity());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
        return Ok(());
    }

    for binding in sorted {
        let class = binding.class_name.as_deref().unwrap_or("*");
        print!(
            "{:<32} {:<24} {:<8} {}",
            class.cyan(),
            binding.key_spec().to_string(),
            binding.event_type.to_string(),
            binding.action.green()
        );
        if let Some(target) = &binding.target {
            println!(" {} {target}", "@".dimmed());
        } else {
            println!();
        }
    }
    Ok(())
}
