//! Interactive prompt flows as data
//!
//! Each command describes its questions as an ordered list of [`Step`]s and
//! `run_steps` interprets them against a [`Prompter`]. Keeping the terminal
//! behind a trait lets the cascading flows run in tests with a scripted
//! prompter instead of a tty.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use sonic_core::SelectItem;
use std::collections::HashMap;

/// One prompt in a flow
pub enum Step {
    Input {
        key: &'static str,
        message: &'static str,
        default: Option<&'static str>,
        allow_empty: bool,
    },
    Password {
        key: &'static str,
        message: &'static str,
        allow_empty: bool,
    },
    Select {
        key: &'static str,
        message: &'static str,
        choices: Vec<SelectItem>,
    },
    Confirm {
        key: &'static str,
        message: &'static str,
    },
}

impl Step {
    pub fn input(key: &'static str, message: &'static str) -> Self {
        Step::Input {
            key,
            message,
            default: None,
            allow_empty: false,
        }
    }

    pub fn input_with_default(
        key: &'static str,
        message: &'static str,
        default: &'static str,
    ) -> Self {
        Step::Input {
            key,
            message,
            default: Some(default),
            allow_empty: false,
        }
    }

    /// Input where a blank answer is a valid answer
    pub fn optional_input(key: &'static str, message: &'static str) -> Self {
        Step::Input {
            key,
            message,
            default: None,
            allow_empty: true,
        }
    }

    pub fn password(key: &'static str, message: &'static str) -> Self {
        Step::Password {
            key,
            message,
            allow_empty: false,
        }
    }

    pub fn optional_password(key: &'static str, message: &'static str) -> Self {
        Step::Password {
            key,
            message,
            allow_empty: true,
        }
    }

    pub fn select(key: &'static str, message: &'static str, choices: Vec<SelectItem>) -> Self {
        Step::Select {
            key,
            message,
            choices,
        }
    }

    pub fn confirm(key: &'static str, message: &'static str) -> Self {
        Step::Confirm { key, message }
    }
}

/// Collected answers, keyed by step key
#[derive(Debug, Default)]
pub struct Answers(HashMap<String, AnswerValue>);

#[derive(Debug, Clone)]
enum AnswerValue {
    Text(String),
    Flag(bool),
}

impl Answers {
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(AnswerValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Missing or non-boolean answers read as declined
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(AnswerValue::Flag(true)))
    }
}

/// Source of answers for a flow
pub trait Prompter {
    fn input(&mut self, message: &str, default: Option<&str>, allow_empty: bool) -> Result<String>;
    fn password(&mut self, message: &str, allow_empty: bool) -> Result<String>;
    /// Returns the `value` of the chosen item
    fn select(&mut self, message: &str, choices: &[SelectItem]) -> Result<String>;
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Interpret a step list, one prompt at a time, in order
pub fn run_steps(prompter: &mut impl Prompter, steps: &[Step]) -> Result<Answers> {
    let mut answers = Answers::default();
    for step in steps {
        match step {
            Step::Input {
                key,
                message,
                default,
                allow_empty,
            } => {
                let text = prompter.input(message, *default, *allow_empty)?;
                answers.0.insert(key.to_string(), AnswerValue::Text(text));
            }
            Step::Password {
                key,
                message,
                allow_empty,
            } => {
                let text = prompter.password(message, *allow_empty)?;
                answers.0.insert(key.to_string(), AnswerValue::Text(text));
            }
            Step::Select {
                key,
                message,
                choices,
            } => {
                let value = prompter.select(message, choices)?;
                answers.0.insert(key.to_string(), AnswerValue::Text(value));
            }
            Step::Confirm { key, message } => {
                let flag = prompter.confirm(message)?;
                answers.0.insert(key.to_string(), AnswerValue::Flag(flag));
            }
        }
    }
    Ok(answers)
}

/// Dialoguer-backed prompter used by the real CLI
pub struct TermPrompter {
    theme: ColorfulTheme,
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TermPrompter {
    fn input(&mut self, message: &str, default: Option<&str>, allow_empty: bool) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(allow_empty);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact()?)
    }

    fn password(&mut self, message: &str, allow_empty: bool) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty_password(allow_empty)
            .interact()?)
    }

    fn select(&mut self, message: &str, choices: &[SelectItem]) -> Result<String> {
        let labels: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(&labels)
            .default(0)
            .interact()?;
        Ok(choices[index].value.clone())
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()?)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Scripted, ScriptedPrompter};
    use super::*;

    #[test]
    fn test_run_steps_collects_answers_in_order() {
        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedPrompter::text("admin"),
            ScriptedPrompter::text("secret"),
            Scripted::Answer(true),
        ]);

        let answers = run_steps(
            &mut prompter,
            &[
                Step::input("username", "Enter your username"),
                Step::password("password", "Enter your password"),
                Step::confirm("confirm", "Proceed?"),
            ],
        )
        .unwrap();

        assert_eq!(answers.text("username"), Some("admin"));
        assert_eq!(answers.text("password"), Some("secret"));
        assert!(answers.flag("confirm"));
        assert!(prompter.is_exhausted());
    }

    #[test]
    fn test_select_resolves_label_to_value() {
        let choices = vec![
            SelectItem {
                name: "images".to_string(),
                value: "b1".to_string(),
            },
            SelectItem {
                name: "scripts".to_string(),
                value: "b2".to_string(),
            },
        ];

        let mut prompter = ScriptedPrompter::new(vec![ScriptedPrompter::pick("scripts")]);
        let answers =
            run_steps(&mut prompter, &[Step::select("bucket", "Choose a bucket", choices)])
                .unwrap();

        assert_eq!(answers.text("bucket"), Some("b2"));
    }

    #[test]
    fn test_missing_flag_reads_as_declined() {
        let answers = Answers::default();
        assert!(!answers.flag("confirm"));
    }

    #[test]
    fn test_unexpected_prompt_fails() {
        let mut prompter = ScriptedPrompter::new(vec![]);
        let result = run_steps(&mut prompter, &[Step::input("url", "Enter a url")]);
        assert!(result.is_err());
    }
}
