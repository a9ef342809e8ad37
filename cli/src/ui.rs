// Terminal UI utilities
// Coloured status lines, package tables and interactive prompts.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use tabled::{settings::Style, Table};

use crate::domain::PackageRecord;

pub fn print_header(title: &str) {
    println!();
    println!(
        "{}",
        "╔════════════════════════════════════════════════════════════╗".bright_blue()
    );
    println!("{}", format!("║  {:<58}║", title).bright_blue());
    println!(
        "{}",
        "╚════════════════════════════════════════════════════════════╝".bright_blue()
    );
    println!();
}

pub fn print_success(message: &str) {
    println!("{}", format!("✅ {}", message).bright_green().bold());
}

pub fn print_error(message: &str) {
    eprintln!("{}", format!("❌ {}", message).bright_red().bold());
}

/// Render packages as a table with a header row
pub fn package_table(records: &[PackageRecord]) -> String {
    let mut table = Table::new(records);
    table.with(Style::psql());
    table.to_string()
}

pub fn print_packages(records: &[PackageRecord]) {
    println!("{}", package_table(records));
}

/// Interactive questions asked while running a command
pub trait Prompter {
    /// Yes/no question, defaulting to no
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Free-form answer; may be empty
    fn input(&self, question: &str) -> Result<String>;

    /// Pick one of `items`, returning its index
    fn select(&self, question: &str, items: &[String]) -> Result<usize>;

    /// Hidden input
    fn password(&self, question: &str) -> Result<String>;
}

/// Prompts on the controlling terminal
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(false)
            .interact()?)
    }

    fn input(&self, question: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()?)
    }

    fn select(&self, question: &str, items: &[String]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(question)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn password(&self, question: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty_password(true)
            .interact()?)
    }
}

/// Yes twice, or nothing happens
pub fn confirm_twice(prompter: &dyn Prompter, question: &str, insist: &str) -> Result<bool> {
    Ok(prompter.confirm(question)? && prompter.confirm(insist)?)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompter;
    use super::*;

    #[test]
    fn test_package_table_has_headers() {
        let table = package_table(&[PackageRecord {
            codename: "stable".into(),
            component: "main".into(),
            arch: "amd64".into(),
            name: "hello".into(),
            version: "2.10-2".into(),
        }]);
        let header = table.lines().next().unwrap();
        for column in ["codename", "component", "arch", "name", "version"] {
            assert!(header.contains(column), "missing {column} in {header}");
        }
        assert!(table.contains("2.10-2"));
    }

    #[test]
    fn test_confirm_twice_needs_both() {
        let yes_no = ScriptedPrompter::default().answer("y").answer("n");
        assert!(!confirm_twice(&yes_no, "Wipe?", "Really?").unwrap());

        let no = ScriptedPrompter::default().answer("n");
        assert!(!confirm_twice(&no, "Wipe?", "Really?").unwrap());
        assert_eq!(no.asked(), vec!["Wipe?"]);

        let yes_yes = ScriptedPrompter::default().answer("yes").answer("y");
        assert!(confirm_twice(&yes_yes, "Wipe?", "Really?").unwrap());
    }
}
