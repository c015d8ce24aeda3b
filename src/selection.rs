use anyhow::Result;
use inquire::{InquireError, Text};
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::BootstrapError;

/// Trait for reading answers from the user
/// This allows us to abstract away the interactive prompts for testing
pub trait Prompter {
    /// Ask for a line of text
    ///
    /// # Errors
    /// Returns an error if the input process fails or user cancels
    fn get_text_input(&self, prompt: &str) -> Result<String>;
}

/// Real implementation using inquire::Text for production use
pub struct RealPrompter;

impl Prompter for RealPrompter {
    fn get_text_input(&self, prompt: &str) -> Result<String> {
        match Text::new(prompt).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(BootstrapError::Usage("Prompt cancelled".to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Mock implementation for testing that replays predetermined answers in order
pub struct MockPrompter {
    responses: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
}

impl MockPrompter {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Prompts that were shown, in order
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Prompter for MockPrompter {
    fn get_text_input(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.responses.borrow_mut().pop_front() {
            Some(response) => Ok(response),
            None => anyhow::bail!("No mock response left for prompt '{}'", prompt),
        }
    }
}

/// Prints `options` as a 1-based numbered menu
pub fn print_menu<S: AsRef<str>>(options: &[S]) {
    for (index, option) in options.iter().enumerate() {
        println!("  {}) {}", index + 1, option.as_ref());
    }
}

/// Parses a 1-based menu choice into a 0-based index
///
/// # Errors
/// Returns an error if the input is not a number between 1 and `count`
pub fn parse_choice(input: &str, count: usize) -> std::result::Result<usize, String> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(choice) if (1..=count).contains(&choice) => Ok(choice - 1),
        _ => Err(format!(
            "'{}' is not a number between 1 and {}",
            trimmed, count
        )),
    }
}
